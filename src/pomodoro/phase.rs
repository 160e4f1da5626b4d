use std::fmt;

use serde::{Deserialize, Serialize};

pub const POMODORO_WORK_MINUTES: u32 = 25; // Default Pomodoro work time
pub const POMODORO_BREAK_MINUTES: u32 = 5; // Default Pomodoro break time

pub const WORK_MINUTES_RANGE: (u32, u32) = (1, 60);
pub const BREAK_MINUTES_RANGE: (u32, u32) = (1, 20);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    None,
    Work,
    Break,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::None => "none",
            Phase::Work => "work",
            Phase::Break => "break",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Phase::None => "⏹",
            Phase::Work => "💼",
            Phase::Break => "☕",
        }
    }

    /// The phase that follows this one in the work/break cycle.
    pub fn next(&self) -> Phase {
        match self {
            Phase::None => Phase::None,
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }

    /// CSS class applied to the page body while the phase is active.
    pub fn body_class(&self) -> Option<&'static str> {
        match self {
            Phase::None => None,
            Phase::Work => Some("c-body--work"),
            Phase::Break => Some("c-body--break"),
        }
    }

    /// Inclusive slider bounds, in minutes.
    pub fn minutes_range(&self) -> Option<(u32, u32)> {
        match self {
            Phase::None => None,
            Phase::Work => Some(WORK_MINUTES_RANGE),
            Phase::Break => Some(BREAK_MINUTES_RANGE),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_alternates() {
        assert_eq!(Phase::Work.next(), Phase::Break);
        assert_eq!(Phase::Break.next(), Phase::Work);
        assert_eq!(Phase::None.next(), Phase::None);
    }

    #[test]
    fn test_body_class() {
        assert_eq!(Phase::None.body_class(), None);
        assert_eq!(Phase::Work.body_class(), Some("c-body--work"));
        assert_eq!(Phase::Break.body_class(), Some("c-body--break"));
    }

    #[test]
    fn test_serialization() {
        assert_eq!(serde_json::to_string(&Phase::Break).unwrap(), "\"break\"");
    }
}
