//! Stdin/stdout host for running the clock without a browser.

use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use crate::engine::{Request, RequestSender, UpdateSender};
use crate::error::AppError;
use crate::pomodoro::effects::Effect;
use crate::protocol::{Control, ServerMessage, UiEvent};

pub const HELP: &str = "commands: start | stop | work up|down|<min> | break up|down|<min> | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(UiEvent),
    Help,
    Quit,
}

fn click(control: Control) -> Command {
    Command::Event(UiEvent::Click {
        id: control.id().to_string(),
    })
}

pub fn parse_command(line: &str) -> Result<Command, AppError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words.as_slice() {
        ["start" | "s" | "pause" | "p"] => click(Control::Start),
        ["stop" | "x"] => click(Control::Stop),
        ["help" | "?"] => Command::Help,
        ["quit" | "q" | "exit"] => Command::Quit,
        [target @ ("work" | "break"), arg] => {
            let (up, down, slider) = if *target == "work" {
                (Control::WorkUp, Control::WorkDown, Control::WorkSlider)
            } else {
                (Control::BreakUp, Control::BreakDown, Control::BreakSlider)
            };
            match *arg {
                "up" | "+" => click(up),
                "down" | "-" => click(down),
                minutes => {
                    let value = minutes
                        .parse::<u32>()
                        .map_err(|_| AppError::UnknownControl(line.trim().to_string()))?;
                    Command::Event(UiEvent::Slider {
                        id: slider.id().to_string(),
                        value,
                    })
                }
            }
        }
        _ => return Err(AppError::UnknownControl(line.trim().to_string())),
    };
    Ok(command)
}

/// Terminal rendition of an effect, if it has one.
pub fn describe(effect: &Effect) -> Option<String> {
    match effect {
        Effect::Feedback { text } => Some(text.clone()),
        Effect::DurationLabel { phase, label, .. } => Some(format!("{} {}", phase, label)),
        Effect::PhaseChanged { from, to, minutes } => Some(format!(
            "{} Switched from {} to {} mode ({} min)",
            to.emoji(),
            from.as_str().to_uppercase(),
            to.as_str().to_uppercase(),
            minutes
        )),
        Effect::PlaySound => Some("\x07".to_string()),
        Effect::FeedbackAria { .. } | Effect::PhaseClass { .. } => None,
    }
}

/// Reads commands from stdin until `quit` or end of input, then drops the request sender.
pub async fn read_commands(requests: RequestSender) -> Result<(), AppError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", HELP);

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let event = match parse_command(&line) {
            Ok(Command::Event(event)) => event,
            Ok(Command::Help) => {
                println!("{}", HELP);
                continue;
            }
            Ok(Command::Quit) => break,
            Err(e) => {
                println!("{} ({})", e, HELP);
                continue;
            }
        };

        let (request, reply) = Request::new(event);
        requests
            .send(request)
            .await
            .map_err(|_| AppError::ChannelClosed)?;
        if let Ok(Err(e)) = reply.await {
            println!("{}", e);
        }
    }

    Ok(())
}

/// Last status and remaining-time lines, so repeats from consecutive ticks print once.
#[derive(Debug, Default)]
pub struct LastLines {
    feedback: String,
    remaining: String,
}

impl LastLines {
    /// Lines to print for one batch of effects.
    pub fn lines(&mut self, effects: &[Effect]) -> Vec<String> {
        // a batch without status text ends a run of repeats
        if !effects.iter().any(|e| matches!(e, Effect::Feedback { .. })) {
            self.feedback.clear();
        }

        let mut lines = Vec::new();
        for effect in effects {
            let last = match effect {
                Effect::Feedback { text } => Some((&mut self.feedback, text)),
                Effect::FeedbackAria { text } => Some((&mut self.remaining, text)),
                _ => None,
            };
            match last {
                Some((last, text)) => {
                    if last != text {
                        last.clone_from(text);
                        lines.push(text.clone());
                    }
                }
                None => lines.extend(describe(effect)),
            }
        }
        lines
    }
}

/// Prints feedback lines as the engine emits them.
pub async fn print_updates(updates: UpdateSender) {
    let mut feed = updates.subscribe();
    drop(updates);
    let mut last = LastLines::default();

    loop {
        let effects = match feed.recv().await {
            Ok(ServerMessage::Effects { effects }) => effects,
            Ok(_) => continue,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "terminal lagged behind engine updates");
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        for line in last.lines(&effects) {
            println!("[{}] {}", Local::now().format("%H:%M:%S"), line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pomodoro::phase::Phase;

    #[test]
    fn test_parse_clicks() {
        assert_eq!(parse_command("start").unwrap(), click(Control::Start));
        assert_eq!(parse_command("  stop ").unwrap(), click(Control::Stop));
        assert_eq!(parse_command("work up").unwrap(), click(Control::WorkUp));
        assert_eq!(parse_command("break -").unwrap(), click(Control::BreakDown));
        assert_eq!(parse_command("q").unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_slider_value() {
        assert_eq!(
            parse_command("break 12").unwrap(),
            Command::Event(UiEvent::Slider {
                id: "js-pom-break".to_string(),
                value: 12
            })
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_command("work lots").is_err());
        assert!(parse_command("dance").is_err());
        assert!(parse_command("start now").is_err());
    }

    #[test]
    fn test_describe_effects() {
        assert_eq!(
            describe(&Effect::duration_label(Phase::Work, 25)).as_deref(),
            Some("work [25 min.]")
        );
        assert_eq!(describe(&Effect::phase_class(Phase::Work)), None);
        let switched = describe(&Effect::PhaseChanged {
            from: Phase::Work,
            to: Phase::Break,
            minutes: 5,
        })
        .unwrap();
        assert!(switched.ends_with("Switched from WORK to BREAK mode (5 min)"));
    }

    #[test]
    fn test_countdown_feedback_prints_once() {
        let mut last = LastLines::default();
        let mut printed = Vec::new();
        for left in (2..=5).rev() {
            printed.extend(last.lines(&[
                Effect::feedback("Almost..."),
                Effect::feedback_aria(format!("{} seconds to go", left)),
                Effect::phase_class(Phase::Work),
            ]));
        }

        assert_eq!(
            printed,
            vec![
                "Almost...",
                "5 seconds to go",
                "4 seconds to go",
                "3 seconds to go",
                "2 seconds to go",
            ]
        );
    }

    #[test]
    fn test_repeated_status_prints_again_after_other_ticks() {
        let mut last = LastLines::default();
        assert_eq!(last.lines(&[Effect::feedback("Session is paused")]).len(), 1);
        assert!(last.lines(&[Effect::feedback("Session is paused")]).is_empty());

        last.lines(&[Effect::feedback_aria("24 minutes to go")]);
        assert_eq!(
            last.lines(&[Effect::feedback("Session is paused")]),
            vec!["Session is paused"]
        );
        assert!(last.lines(&[Effect::feedback_aria("24 minutes to go")]).is_empty());
    }
}
