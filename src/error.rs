use thiserror::Error;

use crate::pomodoro::phase::Phase;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Unknown control: {0}")]
    UnknownControl(String),
    #[error("{phase} duration of {minutes} minutes is outside {min}..={max}")]
    DurationOutOfRange {
        phase: Phase,
        minutes: u32,
        min: u32,
        max: u32,
    },
    #[error("engine channel closed")]
    ChannelClosed,
}
