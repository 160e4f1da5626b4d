use std::f64::consts::PI;

use chrono::Timelike;
use serde::Serialize;

pub fn deg_to_rad(degrees: f64) -> f64 {
    (PI / 180.0) * degrees
}

/// Angle swept on the dial by a span of `seconds`, one full turn per hour.
pub fn duration_angle(seconds: u32) -> f64 {
    deg_to_rad((f64::from(seconds) / 3600.0) * 360.0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

/// Wall-clock sample and the hand angles derived from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub angle: HandAngles,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32, second: u32) -> Self {
        let (h, m, s) = (f64::from(hour), f64::from(minute), f64::from(second));
        Self {
            hour,
            minute,
            second,
            angle: HandAngles {
                hour: (h * PI / 6.0) + (m * PI / (6.0 * 60.0)) + (s * PI / (360.0 * 60.0)),
                minute: minute_angle(minute, second),
                second: s * PI / 30.0,
            },
        }
    }

    pub fn sample<T: Timelike>(now: &T) -> Self {
        Self::new(now.hour(), now.minute(), now.second())
    }

    pub fn now() -> Self {
        Self::sample(&chrono::Local::now())
    }
}

fn minute_angle(minute: u32, second: u32) -> f64 {
    (f64::from(minute) * PI / 30.0) + (f64::from(second) * PI / (30.0 * 60.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use proptest::prelude::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_default_duration_angles() {
        assert!((duration_angle(1500) - 2.617_993_877_991_494_4).abs() < EPS);
        assert!((duration_angle(300) - 0.523_598_775_598_298_9).abs() < EPS);
    }

    #[test]
    fn test_hand_angles_at_quarter_past_three() {
        let time = ClockTime::sample(&NaiveTime::from_hms_opt(3, 15, 0).unwrap());
        assert!((time.angle.hour - (PI / 2.0 + PI / 24.0)).abs() < EPS);
        assert!((time.angle.minute - PI / 2.0).abs() < EPS);
        assert_eq!(time.angle.second, 0.0);
    }

    #[test]
    fn test_second_hand_half_turn() {
        let time = ClockTime::new(0, 0, 30);
        assert!((time.angle.second - PI).abs() < EPS);
    }

    proptest! {
        #[test]
        fn work_minutes_angle_matches_six_degrees_per_minute(minutes in 1u32..=60) {
            let angle = duration_angle(minutes * 60);
            prop_assert!((angle - deg_to_rad(f64::from(minutes) * 6.0)).abs() < EPS);
        }

        #[test]
        fn break_minutes_angle_matches_six_degrees_per_minute(minutes in 1u32..=20) {
            let angle = duration_angle(minutes * 60);
            prop_assert!((angle - deg_to_rad(f64::from(minutes) * 6.0)).abs() < EPS);
        }

        #[test]
        fn minute_hand_stays_on_dial(minute in 0u32..60, second in 0u32..60) {
            let time = ClockTime::new(12, minute, second);
            prop_assert!(time.angle.minute >= 0.0);
            prop_assert!(time.angle.minute < 2.0 * PI);
        }
    }
}
