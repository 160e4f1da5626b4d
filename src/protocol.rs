use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::pomodoro::effects::Effect;
use crate::render::DrawCommand;

/// Clickable or draggable elements of the host page, keyed by DOM id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Start,
    Stop,
    WorkSlider,
    BreakSlider,
    WorkUp,
    WorkDown,
    BreakUp,
    BreakDown,
}

impl Control {
    pub const ALL: [Control; 8] = [
        Control::Start,
        Control::Stop,
        Control::WorkSlider,
        Control::BreakSlider,
        Control::WorkUp,
        Control::WorkDown,
        Control::BreakUp,
        Control::BreakDown,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Control::Start => "js-pom-start",
            Control::Stop => "js-pom-stop",
            Control::WorkSlider => "js-pom-work",
            Control::BreakSlider => "js-pom-break",
            Control::WorkUp => "js-pom-work-up",
            Control::WorkDown => "js-pom-work-down",
            Control::BreakUp => "js-pom-break-up",
            Control::BreakDown => "js-pom-break-down",
        }
    }
}

impl FromStr for Control {
    type Err = AppError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        Control::ALL
            .into_iter()
            .find(|control| control.id() == id)
            .ok_or_else(|| AppError::UnknownControl(id.to_string()))
    }
}

/// Message sent by the host page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// Page loaded; binds the canvas size.
    Ready { width: f64, height: f64 },
    Click { id: String },
    Slider { id: String, value: u32 },
}

/// Message pushed to every connected host page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Frame { commands: Vec<DrawCommand> },
    Effects { effects: Vec<Effect> },
    Ack {
        success: bool,
        message: Option<String>,
    },
}

impl ServerMessage {
    pub fn ack(result: &Result<(), AppError>) -> Self {
        match result {
            Ok(()) => ServerMessage::Ack {
                success: true,
                message: None,
            },
            Err(e) => ServerMessage::Ack {
                success: false,
                message: Some(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_ids_round_trip() {
        for control in Control::ALL {
            assert_eq!(control.id().parse::<Control>().unwrap(), control);
        }
        assert!(matches!(
            "js-pom-nope".parse::<Control>(),
            Err(AppError::UnknownControl(id)) if id == "js-pom-nope"
        ));
    }

    #[test]
    fn test_event_parsing() {
        let event: UiEvent = serde_json::from_str(r#"{"type":"click","id":"js-pom-start"}"#).unwrap();
        assert_eq!(
            event,
            UiEvent::Click {
                id: "js-pom-start".to_string()
            }
        );

        let event: UiEvent =
            serde_json::from_str(r#"{"type":"slider","id":"js-pom-break","value":12}"#).unwrap();
        assert_eq!(
            event,
            UiEvent::Slider {
                id: "js-pom-break".to_string(),
                value: 12
            }
        );

        assert!(serde_json::from_str::<UiEvent>(r#"{"type":"hover"}"#).is_err());
    }

    #[test]
    fn test_ack_serialization() {
        let json = serde_json::to_string(&ServerMessage::ack(&Ok(()))).unwrap();
        assert_eq!(json, r#"{"type":"ack","success":true,"message":null}"#);

        let failed = ServerMessage::ack(&Err(AppError::UnknownControl("x".into())));
        let json = serde_json::to_string(&failed).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("Unknown control: x"));
    }
}
