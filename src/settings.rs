use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::pomodoro::clock::duration_angle;
use crate::pomodoro::phase::{
    BREAK_MINUTES_RANGE, POMODORO_BREAK_MINUTES, POMODORO_WORK_MINUTES, Phase, WORK_MINUTES_RANGE,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shades {
    pub base: String,
    pub light: String,
    pub dark: String,
}

impl Shades {
    fn new(base: &str, light: &str, dark: &str) -> Self {
        Self {
            base: base.to_string(),
            light: light.to_string(),
            dark: dark.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonColors {
    pub pause: String,
    pub start: String,
    pub stop: String,
}

impl Default for ButtonColors {
    fn default() -> Self {
        Self {
            pause: "#7F6A40".into(),
            start: "#407F6A".into(),
            stop: "#C1272D".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandColors {
    pub minutes: String,
    pub seconds: String,
}

impl Default for HandColors {
    fn default() -> Self {
        Self {
            minutes: "#333".into(),
            seconds: "#C1272D".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub button: ButtonColors,
    pub hand: HandColors,
    pub tick: String,
    pub none: Shades,
    #[serde(rename = "break")]
    pub break_: Shades,
    pub work: Shades,
    pub paused: Shades,
    pub contrast: Shades,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            button: ButtonColors::default(),
            hand: HandColors::default(),
            tick: "#333".into(),
            none: Shades::new("#7FD4FF", "#DFF4FE", "#406A7F"),
            break_: Shades::new("#7FFFD4", "#DFFEF4", "#407F6A"),
            work: Shades::new("#FF6347", "#FED8D1", "#5F251B"),
            paused: Shades::new("#FFD47F", "#FEF4DF", "#7F6A40"),
            contrast: Shades::new("#FFD47F", "#FEF4DF", "#7F6A40"),
        }
    }
}

impl Palette {
    pub fn phase(&self, phase: Phase) -> &Shades {
        match phase {
            Phase::None => &self.none,
            Phase::Work => &self.work,
            Phase::Break => &self.break_,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Size {
    pub outer_radius: f64,
    pub outer_ring_thickness: f64,
    pub inner_ring_thickness: f64,
    pub tick_size: f64,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            outer_radius: 150.0,
            outer_ring_thickness: 20.0,
            inner_ring_thickness: 10.0,
            tick_size: 10.0,
        }
    }
}

impl Size {
    pub fn inner_radius(&self) -> f64 {
        self.outer_radius - self.outer_ring_thickness
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub work_time: u32,
    pub break_time: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            work_time: POMODORO_WORK_MINUTES * 60,
            break_time: POMODORO_BREAK_MINUTES * 60,
        }
    }
}

impl Defaults {
    pub fn work_time_angle(&self) -> f64 {
        duration_angle(self.work_time)
    }

    pub fn break_time_angle(&self) -> f64 {
        duration_angle(self.break_time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Intervals {
    pub display_ms: u64,
    pub logic_ms: u64,
    pub pause_ms: u64,
}

impl Default for Intervals {
    fn default() -> Self {
        Self {
            display_ms: 500,
            logic_ms: 1000,
            pause_ms: 1000,
        }
    }
}

/// Drawing surface bound by the host once it is ready.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(skip)]
    pub canvas: Option<Canvas>,
    pub color: Palette,
    pub default: Defaults,
    pub size: Size,
    pub interval: Intervals,
    pub sound_is_on: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas: None,
            color: Palette::default(),
            default: Defaults::default(),
            size: Size::default(),
            interval: Intervals::default(),
            sound_is_on: true,
        }
    }
}

impl Settings {
    /// Reads a JSON settings file. Sections missing from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&raw)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let size = &self.size;
        if size.outer_radius <= 0.0
            || size.outer_ring_thickness <= 0.0
            || size.inner_ring_thickness <= 0.0
            || size.tick_size <= 0.0
        {
            return Err(AppError::InvalidConfig(
                "size values must be positive".to_string(),
            ));
        }
        if size.inner_radius() <= size.tick_size {
            return Err(AppError::InvalidConfig(
                "outer_radius leaves no room for the dial".to_string(),
            ));
        }

        let interval = &self.interval;
        if interval.display_ms == 0 || interval.logic_ms == 0 || interval.pause_ms == 0 {
            return Err(AppError::InvalidConfig(
                "timer intervals must be non-zero".to_string(),
            ));
        }

        check_default_minutes("work_time", self.default.work_time, WORK_MINUTES_RANGE)?;
        check_default_minutes("break_time", self.default.break_time, BREAK_MINUTES_RANGE)?;
        Ok(())
    }
}

fn check_default_minutes(name: &str, seconds: u32, (min, max): (u32, u32)) -> Result<(), AppError> {
    if seconds % 60 != 0 || !(min..=max).contains(&(seconds / 60)) {
        return Err(AppError::InvalidConfig(format!(
            "default.{name} must be a whole number of minutes in {min}..={max}, got {seconds}s"
        )));
    }
    Ok(())
}
