use tracing::debug;

use super::effects::Effect;
use super::phase::Phase;
use super::session::Session;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}

fn check_range(phase: Phase, minutes: u32) -> Result<(), AppError> {
    let (min, max) = phase
        .minutes_range()
        .ok_or_else(|| AppError::UnknownControl(format!("no duration for phase {phase}")))?;
    if !(min..=max).contains(&minutes) {
        return Err(AppError::DurationOutOfRange {
            phase,
            minutes,
            min,
            max,
        });
    }
    Ok(())
}

/// Slider moved to `minutes`. An active phase keeps the time already spent in it.
pub fn set_minutes(session: &mut Session, phase: Phase, minutes: u32) -> Result<Vec<Effect>, AppError> {
    check_range(phase, minutes)?;

    let previous = session.duration(phase);
    let updated = minutes * 60;
    session.set_duration(phase, updated);

    if session.current == phase && updated != previous {
        session.seconds_left = updated.saturating_sub(session.seconds_passed);
    }

    debug!(%phase, minutes, seconds_left = session.seconds_left, "duration set");
    Ok(vec![Effect::duration_label(phase, minutes)])
}

/// Up/down stepper. Moves the countdown by a minute only while one is in progress,
/// whichever phase it belongs to.
pub fn step_minutes(session: &mut Session, phase: Phase, step: Step) -> Result<Vec<Effect>, AppError> {
    let (min, max) = phase
        .minutes_range()
        .ok_or_else(|| AppError::UnknownControl(format!("no duration for phase {phase}")))?;
    let minutes = session.duration(phase) / 60;

    let minutes = match step {
        Step::Down if minutes > min => minutes - 1,
        Step::Up if minutes < max => minutes + 1,
        _ => return Ok(Vec::new()),
    };
    session.set_duration(phase, minutes * 60);

    if session.is_running() {
        session.seconds_left = match step {
            Step::Down => session.seconds_left.saturating_sub(60),
            Step::Up => session.seconds_left + 60,
        };
    }

    debug!(%phase, minutes, seconds_left = session.seconds_left, "duration stepped");
    Ok(vec![Effect::duration_label(phase, minutes)])
}
