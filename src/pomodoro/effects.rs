use serde::Serialize;

use super::phase::Phase;

/// Presentation command emitted by the session state machine. Hosts decide how
/// to perform it (DOM update, stdout line, desktop notification).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    /// Visible status text (`js-pom-feedback`).
    Feedback { text: String },
    /// Screen-reader mirror (`js-pom-feedback-aria`).
    FeedbackAria { text: String },
    /// Body class for the active phase; `None` clears both phase classes.
    PhaseClass { class: Option<&'static str> },
    /// One second left in the current phase.
    PlaySound,
    /// Slider position and label text for a duration.
    DurationLabel {
        phase: Phase,
        minutes: u32,
        label: String,
    },
    /// The countdown rolled over into the next phase, which lasts `minutes`.
    PhaseChanged { from: Phase, to: Phase, minutes: u32 },
}

impl Effect {
    pub fn feedback(text: impl Into<String>) -> Self {
        Effect::Feedback { text: text.into() }
    }

    pub fn feedback_aria(text: impl Into<String>) -> Self {
        Effect::FeedbackAria { text: text.into() }
    }

    pub fn phase_class(phase: Phase) -> Self {
        Effect::PhaseClass {
            class: phase.body_class(),
        }
    }

    pub fn duration_label(phase: Phase, minutes: u32) -> Self {
        Effect::DurationLabel {
            phase,
            minutes,
            label: format!("[{} min.]", minutes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_serialization() {
        let json = serde_json::to_string(&Effect::duration_label(Phase::Work, 30)).unwrap();
        assert!(json.contains("\"kind\":\"duration_label\""));
        assert!(json.contains("\"phase\":\"work\""));
        assert!(json.contains("\"label\":\"[30 min.]\""));

        let json = serde_json::to_string(&Effect::phase_class(Phase::None)).unwrap();
        assert_eq!(json, r#"{"kind":"phase_class","class":null}"#);
    }
}
