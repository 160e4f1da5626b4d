use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::error::RecvError;
use tokio_tungstenite::tungstenite::protocol::Message;
use tracing::{debug, error, info, warn};

use crate::engine::{Request, RequestSender, UpdateSender};
use crate::error::AppError;
use crate::protocol::{ServerMessage, UiEvent};

const ACCEPT_RETRY_DELAY: std::time::Duration = std::time::Duration::from_millis(100);

/// Binds the listen address. Bind errors go back to the caller, before any task is spawned.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, AppError> {
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, "WebSocket server listening");
    Ok(listener)
}

pub async fn start_websocket_server(
    listener: TcpListener,
    requests: RequestSender,
    updates: UpdateSender,
) {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                info!(%peer_addr, "new WebSocket connection");
                tokio::spawn(handle_connection(
                    stream,
                    peer_addr,
                    requests.clone(),
                    updates.clone(),
                ));
            }
            Err(e) => {
                warn!("Failed to accept connection: {}", e);
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
            }
        }
    }
}

async fn submit(requests: &RequestSender, event: UiEvent) -> Result<(), AppError> {
    let (request, reply) = Request::new(event);
    requests
        .send(request)
        .await
        .map_err(|_| AppError::ChannelClosed)?;
    reply.await.map_err(|_| AppError::ChannelClosed)?
}

fn encode(message: &ServerMessage) -> Option<Message> {
    match serde_json::to_string(message) {
        Ok(json) => Some(Message::Text(json)),
        Err(e) => {
            error!("Failed to encode message: {}", e);
            None
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    requests: RequestSender,
    updates: UpdateSender,
) {
    let ws_stream = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!(%peer_addr, "WebSocket handshake failed: {}", e);
            return;
        }
    };

    debug!(%peer_addr, "WebSocket handshake completed");

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let mut feed = updates.subscribe();
    drop(updates);

    loop {
        tokio::select! {
            msg = ws_receiver.next() => {
                let Some(msg) = msg else { break };
                match msg {
                    Ok(Message::Text(text)) => {
                        let response = match serde_json::from_str::<UiEvent>(&text) {
                            Ok(event) => {
                                debug!(%peer_addr, ?event, "received");
                                let result = submit(&requests, event).await;
                                if matches!(result, Err(AppError::ChannelClosed)) {
                                    break;
                                }
                                ServerMessage::ack(&result)
                            }
                            Err(e) => {
                                warn!(%peer_addr, "Failed to parse message: {}", e);
                                ServerMessage::Ack {
                                    success: false,
                                    message: Some(format!("Parse error: {}", e)),
                                }
                            }
                        };

                        if let Some(reply) = encode(&response) {
                            if let Err(e) = ws_sender.send(reply).await {
                                warn!(%peer_addr, "Failed to send WebSocket response: {}", e);
                                break;
                            }
                        }
                    }
                    Ok(Message::Close(_)) => {
                        info!(%peer_addr, "WebSocket connection closed by peer");
                        break;
                    }
                    Ok(Message::Ping(data)) => {
                        if let Err(e) = ws_sender.send(Message::Pong(data)).await {
                            warn!(%peer_addr, "Failed to send pong: {}", e);
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(%peer_addr, "WebSocket error: {}", e);
                        break;
                    }
                }
            }
            update = feed.recv() => {
                let message = match update {
                    Ok(message) => message,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(%peer_addr, skipped, "host fell behind, dropping updates");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                if let Some(frame) = encode(&message) {
                    if let Err(e) = ws_sender.send(frame).await {
                        warn!(%peer_addr, "Failed to push update: {}", e);
                        break;
                    }
                }
            }
        }
    }

    info!(%peer_addr, "WebSocket connection terminated");
}
