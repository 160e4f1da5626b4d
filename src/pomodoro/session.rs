use serde::Serialize;
use tracing::{debug, info};

use super::clock::{ClockTime, duration_angle};
use super::effects::Effect;
use super::phase::Phase;
use crate::settings::Settings;

/// Mutable countdown state. Angles are radians on the hour dial.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Session {
    pub current: Phase,
    pub paused: bool,
    pub work_time: u32,
    pub work_time_angle: f64,
    pub break_time: u32,
    pub break_time_angle: f64,
    pub seconds_left: u32,
    pub seconds_passed: u32,
    pub started_at_angle: f64,
    pub paused_for_seconds: u32,
    pub paused_for_angle: f64,
}

impl Session {
    pub fn new(settings: &Settings) -> Self {
        Self {
            work_time: settings.default.work_time,
            work_time_angle: settings.default.work_time_angle(),
            break_time: settings.default.break_time,
            break_time_angle: settings.default.break_time_angle(),
            ..Self::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.current != Phase::None
    }

    pub fn duration(&self, phase: Phase) -> u32 {
        match phase {
            Phase::None => 0,
            Phase::Work => self.work_time,
            Phase::Break => self.break_time,
        }
    }

    pub fn duration_angle(&self, phase: Phase) -> f64 {
        match phase {
            Phase::None => 0.0,
            Phase::Work => self.work_time_angle,
            Phase::Break => self.break_time_angle,
        }
    }

    /// Sets a phase duration and keeps its angle in step.
    pub fn set_duration(&mut self, phase: Phase, seconds: u32) {
        match phase {
            Phase::None => {}
            Phase::Work => {
                self.work_time = seconds;
                self.work_time_angle = duration_angle(seconds);
            }
            Phase::Break => {
                self.break_time = seconds;
                self.break_time_angle = duration_angle(seconds);
            }
        }
    }

    /// Starts a work period from idle, otherwise toggles pause.
    pub fn start(&mut self, time: &ClockTime) -> Vec<Effect> {
        if !self.is_running() {
            self.seconds_left = self.work_time;
            self.seconds_passed = 0;
            self.current = Phase::Work;
            self.paused = false;
            self.started_at_angle = time.angle.minute;
            self.paused_for_seconds = 0;
            self.paused_for_angle = 0.0;

            info!(work_time = self.work_time, "pom started");
            return vec![Effect::feedback("In session")];
        }

        self.paused = !self.paused;
        if self.paused {
            info!(seconds_left = self.seconds_left, "pom paused");
            vec![Effect::feedback("Session is paused")]
        } else {
            info!(seconds_left = self.seconds_left, "pom resumed");
            Vec::new()
        }
    }

    pub fn stop(&mut self) -> Vec<Effect> {
        self.seconds_passed = 0;
        self.seconds_left = 0;
        self.current = Phase::None;
        self.paused = false;
        self.paused_for_seconds = 0;
        self.paused_for_angle = 0.0;
        self.started_at_angle = 0.0;

        info!("pom stopped");
        vec![Effect::feedback("Session stopped")]
    }

    /// Advances the pause accumulator by one second.
    pub fn pause_tick(&mut self) {
        self.paused_for_seconds += 1;
        self.paused_for_angle = duration_angle(self.paused_for_seconds);
    }

    /// One logic tick: counts down the active phase and flips it when it runs out.
    pub fn tick(&mut self, settings: &Settings, time: &ClockTime) -> Vec<Effect> {
        let mut effects = Vec::new();

        if !self.is_running() {
            effects.push(Effect::phase_class(Phase::None));
            return effects;
        }
        if self.paused {
            return effects;
        }

        self.seconds_passed += 1;
        self.seconds_left = self.seconds_left.saturating_sub(1);

        if self.seconds_left == 0 {
            let from = self.current;
            let to = from.next();
            self.started_at_angle = time.angle.minute;
            self.current = to;
            self.seconds_left = self.duration(to);
            // elapsed time counts from the start of the current phase
            self.seconds_passed = 0;

            info!(%from, %to, seconds_left = self.seconds_left, "phase changed");
            effects.push(Effect::feedback(match to {
                Phase::Break => "Take a Break!",
                _ => "Now focus you",
            }));
            effects.push(Effect::PhaseChanged {
                from,
                to,
                minutes: self.seconds_left / 60,
            });
        }

        if self.seconds_left == 1 {
            if settings.sound_is_on {
                debug!("one second left, playing sound");
                effects.push(Effect::PlaySound);
            }
        } else if self.seconds_left <= 5 {
            effects.push(Effect::feedback("Almost..."));
            effects.push(Effect::feedback_aria(format!(
                "{} seconds to go",
                self.seconds_left
            )));
        } else {
            effects.push(Effect::feedback_aria(format!(
                "{} minutes to go",
                self.seconds_left / 60
            )));
        }

        effects.push(Effect::phase_class(self.current));
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fresh() -> (Settings, Session, ClockTime) {
        let settings = Settings::default();
        let session = Session::new(&settings);
        (settings, session, ClockTime::new(10, 30, 0))
    }

    fn is_baseline(session: &Session) -> bool {
        session.current == Phase::None
            && session.seconds_left == 0
            && !session.paused
            && session.started_at_angle == 0.0
    }

    #[test]
    fn test_new_session_is_idle_with_defaults() {
        let (_, session, _) = fresh();
        assert!(is_baseline(&session));
        assert_eq!(session.work_time, 1500);
        assert_eq!(session.break_time, 300);
        assert_eq!(session.work_time_angle, duration_angle(1500));
    }

    #[test]
    fn test_start_from_idle_enters_work() {
        let (_, mut session, time) = fresh();
        let effects = session.start(&time);

        assert_eq!(session.current, Phase::Work);
        assert_eq!(session.seconds_left, session.work_time);
        assert_eq!(session.seconds_passed, 0);
        assert!(!session.paused);
        assert_eq!(session.started_at_angle, time.angle.minute);
        assert_eq!(effects, vec![Effect::feedback("In session")]);
    }

    #[test]
    fn test_start_while_running_toggles_pause() {
        let (_, mut session, time) = fresh();
        session.start(&time);

        let effects = session.start(&time);
        assert!(session.paused);
        assert_eq!(effects, vec![Effect::feedback("Session is paused")]);

        let effects = session.start(&time);
        assert!(!session.paused);
        assert!(effects.is_empty());
        assert_eq!(session.current, Phase::Work);
    }

    #[test]
    fn test_full_work_period_flips_to_break() {
        let (settings, mut session, time) = fresh();
        session.start(&time);

        for _ in 0..1499 {
            session.tick(&settings, &time);
        }
        assert_eq!(session.current, Phase::Work);
        assert_eq!(session.seconds_left, 1);

        let effects = session.tick(&settings, &time);
        assert_eq!(session.current, Phase::Break);
        assert_eq!(session.seconds_left, 300);
        assert_eq!(session.seconds_passed, 0);
        assert!(effects.contains(&Effect::feedback("Take a Break!")));
        assert!(effects.contains(&Effect::PhaseChanged {
            from: Phase::Work,
            to: Phase::Break,
            minutes: 5,
        }));
        assert_eq!(effects.last(), Some(&Effect::phase_class(Phase::Break)));
    }

    #[test]
    fn test_break_flips_back_to_work() {
        let (settings, mut session, _) = fresh();
        session.start(&ClockTime::new(9, 0, 0));
        let later = ClockTime::new(9, 25, 0);
        for _ in 0..1500 {
            session.tick(&settings, &later);
        }
        assert_eq!(session.started_at_angle, later.angle.minute);

        for _ in 0..300 {
            session.tick(&settings, &later);
        }
        assert_eq!(session.current, Phase::Work);
        assert_eq!(session.seconds_left, 1500);
    }

    #[test]
    fn test_sound_plays_with_one_second_left() {
        let (mut settings, mut session, time) = fresh();
        session.start(&time);
        session.seconds_left = 2;

        let effects = session.tick(&settings, &time);
        assert!(effects.contains(&Effect::PlaySound));

        settings.sound_is_on = false;
        session.seconds_left = 2;
        let effects = session.tick(&settings, &time);
        assert!(!effects.contains(&Effect::PlaySound));
    }

    #[test]
    fn test_feedback_text_while_counting_down() {
        let (settings, mut session, time) = fresh();
        session.start(&time);

        let effects = session.tick(&settings, &time);
        assert!(effects.contains(&Effect::feedback_aria("24 minutes to go")));

        session.seconds_left = 5;
        let effects = session.tick(&settings, &time);
        assert!(effects.contains(&Effect::feedback("Almost...")));
        assert!(effects.contains(&Effect::feedback_aria("4 seconds to go")));
    }

    #[test]
    fn test_idle_tick_only_clears_class() {
        let (settings, mut session, time) = fresh();
        let effects = session.tick(&settings, &time);
        assert_eq!(effects, vec![Effect::phase_class(Phase::None)]);
        assert!(is_baseline(&session));
    }

    #[test]
    fn test_pause_tick_accumulates_angle() {
        let (_, mut session, time) = fresh();
        session.start(&time);
        session.start(&time);
        for _ in 0..60 {
            session.pause_tick();
        }
        assert_eq!(session.paused_for_seconds, 60);
        assert_eq!(session.paused_for_angle, duration_angle(60));
    }

    #[test]
    fn test_zeroed_countdown_flips_on_next_tick() {
        let (settings, mut session, time) = fresh();
        session.start(&time);
        session.seconds_left = 0;
        session.tick(&settings, &time);
        assert_eq!(session.current, Phase::Break);
        assert_eq!(session.seconds_left, 300);
    }

    proptest! {
        #[test]
        fn pause_preserves_seconds_left(run in 0u32..1400, paused_for in 1u32..600) {
            let (settings, mut session, time) = fresh();
            session.start(&time);
            for _ in 0..run {
                session.tick(&settings, &time);
            }
            let before = session.seconds_left;

            session.start(&time);
            for _ in 0..paused_for {
                session.pause_tick();
                session.tick(&settings, &time);
            }
            session.start(&time);

            prop_assert!(!session.paused);
            prop_assert_eq!(session.seconds_left, before);
        }

        #[test]
        fn stop_always_returns_to_baseline(ticks in 0u32..4000, pause in any::<bool>()) {
            let (settings, mut session, time) = fresh();
            session.start(&time);
            for _ in 0..ticks {
                session.tick(&settings, &time);
            }
            if pause {
                session.start(&time);
                session.pause_tick();
            }

            session.stop();
            prop_assert!(is_baseline(&session));
            prop_assert_eq!(session.paused_for_seconds, 0);
            prop_assert_eq!(session.seconds_passed, 0);
        }
    }
}
