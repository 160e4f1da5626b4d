use notify_rust::Notification;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::engine::UpdateSender;
use crate::pomodoro::effects::Effect;
use crate::pomodoro::phase::Phase;
use crate::protocol::ServerMessage;

pub fn phase_message(to: Phase, minutes: u32) -> Option<String> {
    match to {
        Phase::Break => Some(format!(
            "Work session complete! Time for a {}-minute break.",
            minutes
        )),
        Phase::Work => Some(format!(
            "Break is over! Starting {}-minute work session.",
            minutes
        )),
        Phase::None => None,
    }
}

pub fn send_notification(message: &str) -> Result<(), Box<dyn std::error::Error>> {
    Notification::new()
        .summary("Pomodoro Clock")
        .body(message)
        .timeout(0) // No auto-dismiss
        .show()?;
    Ok(())
}

/// Posts a desktop notification for every phase change until the engine goes away.
pub async fn run_notifier(updates: UpdateSender) {
    let mut feed = updates.subscribe();
    drop(updates);

    loop {
        let effects = match feed.recv().await {
            Ok(ServerMessage::Effects { effects }) => effects,
            Ok(_) => continue,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "notifier lagged behind engine updates");
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        for effect in effects {
            let Effect::PhaseChanged { to, minutes, .. } = effect else {
                continue;
            };
            let Some(message) = phase_message(to, minutes) else {
                continue;
            };
            debug!(%to, "sending desktop notification");
            let result = tokio::task::spawn_blocking(move || {
                send_notification(&message).map_err(|e| e.to_string())
            })
            .await;
            match result {
                Ok(Err(e)) => warn!("Failed to send notification: {}", e),
                Err(e) => warn!("Notification task failed: {}", e),
                Ok(Ok(())) => {}
            }
        }
    }
}
