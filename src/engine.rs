use std::future::pending;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{Duration, Instant, Interval, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::pomodoro::adjust::{Step, set_minutes, step_minutes};
use crate::pomodoro::clock::ClockTime;
use crate::pomodoro::effects::Effect;
use crate::pomodoro::phase::Phase;
use crate::pomodoro::session::Session;
use crate::protocol::{Control, ServerMessage, UiEvent};
use crate::render::{self, Frame};
use crate::settings::{Canvas, Settings};

pub type RequestSender = mpsc::Sender<Request>;
pub type RequestReceiver = mpsc::Receiver<Request>;
pub type UpdateSender = broadcast::Sender<ServerMessage>;

const REQUEST_BUFFER: usize = 64;
const UPDATE_BUFFER: usize = 256;

pub fn create_request_channel() -> (RequestSender, RequestReceiver) {
    mpsc::channel(REQUEST_BUFFER)
}

pub fn create_update_channel() -> UpdateSender {
    broadcast::channel(UPDATE_BUFFER).0
}

/// A host event plus an optional slot for the outcome.
#[derive(Debug)]
pub struct Request {
    pub event: UiEvent,
    pub reply: Option<oneshot::Sender<Result<(), AppError>>>,
}

impl Request {
    pub fn new(event: UiEvent) -> (Self, oneshot::Receiver<Result<(), AppError>>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                event,
                reply: Some(tx),
            },
            rx,
        )
    }
}

/// Settings, session and last sampled time, owned in one place.
#[derive(Debug)]
pub struct Engine {
    settings: Settings,
    session: Session,
    time: ClockTime,
}

impl Engine {
    pub fn new(settings: Settings) -> Self {
        let session = Session::new(&settings);
        Self {
            settings,
            session,
            time: ClockTime::now(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn frame(&self) -> Frame {
        render::draw(&self.settings, &self.session, &self.time)
    }

    /// Display timer: resample the clock and redraw.
    pub fn display_tick(&mut self, time: ClockTime) -> Frame {
        self.time = time;
        self.frame()
    }

    pub fn logic_tick(&mut self) -> Vec<Effect> {
        self.session.tick(&self.settings, &self.time)
    }

    pub fn pause_tick(&mut self) {
        self.session.pause_tick();
    }

    /// Labels for both sliders, the body class and the current status.
    pub fn snapshot_effects(&self) -> Vec<Effect> {
        let status = match (self.session.current, self.session.paused) {
            (Phase::None, _) => "Ready",
            (_, true) => "Session is paused",
            _ => "In session",
        };
        vec![
            Effect::duration_label(Phase::Work, self.session.work_time / 60),
            Effect::duration_label(Phase::Break, self.session.break_time / 60),
            Effect::phase_class(self.session.current),
            Effect::feedback(status),
        ]
    }

    pub fn handle(&mut self, event: UiEvent) -> Result<Vec<Effect>, AppError> {
        match event {
            UiEvent::Ready { width, height } => {
                if width <= 0.0 || height <= 0.0 {
                    return Err(AppError::InvalidConfig(format!(
                        "canvas size {width}x{height} is not drawable"
                    )));
                }
                self.settings.canvas = Some(Canvas { width, height });
                info!(width, height, "canvas bound");
                Ok(self.snapshot_effects())
            }
            UiEvent::Click { id } => match id.parse::<Control>()? {
                Control::Start => Ok(self.session.start(&self.time)),
                Control::Stop => Ok(self.session.stop()),
                Control::WorkUp => step_minutes(&mut self.session, Phase::Work, Step::Up),
                Control::WorkDown => step_minutes(&mut self.session, Phase::Work, Step::Down),
                Control::BreakUp => step_minutes(&mut self.session, Phase::Break, Step::Up),
                Control::BreakDown => step_minutes(&mut self.session, Phase::Break, Step::Down),
                Control::WorkSlider | Control::BreakSlider => Ok(Vec::new()),
            },
            UiEvent::Slider { id, value } => match id.parse::<Control>()? {
                Control::WorkSlider => set_minutes(&mut self.session, Phase::Work, value),
                Control::BreakSlider => set_minutes(&mut self.session, Phase::Break, value),
                _ => Err(AppError::UnknownControl(id)),
            },
        }
    }
}

fn every(ms: u64) -> Interval {
    let period = Duration::from_millis(ms);
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    timer
}

async fn tick_armed(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => pending::<()>().await,
    }
}

fn publish_effects(updates: &UpdateSender, effects: Vec<Effect>) {
    if effects.is_empty() {
        return;
    }
    // No connected host is not an error
    let _ = updates.send(ServerMessage::Effects { effects });
}

fn publish_frame(updates: &UpdateSender, frame: Frame) {
    if frame.is_empty() {
        return;
    }
    let _ = updates.send(ServerMessage::Frame {
        commands: frame.commands,
    });
}

/// Drives the display, logic and pause timers and applies host requests, one at
/// a time, until every request sender is dropped. Returns the final engine.
pub async fn run(mut engine: Engine, mut requests: RequestReceiver, updates: UpdateSender) -> Engine {
    let intervals = engine.settings().interval;
    let mut display = every(intervals.display_ms);
    let mut logic = every(intervals.logic_ms);
    let mut pause: Option<Interval> = None;

    info!(
        display_ms = intervals.display_ms,
        logic_ms = intervals.logic_ms,
        "scheduler started"
    );

    loop {
        tokio::select! {
            _ = display.tick() => {
                let frame = engine.display_tick(ClockTime::now());
                publish_frame(&updates, frame);
            }
            _ = logic.tick() => {
                let effects = engine.logic_tick();
                publish_effects(&updates, effects);
            }
            _ = tick_armed(&mut pause) => engine.pause_tick(),
            request = requests.recv() => {
                let Some(request) = request else {
                    info!("request channel closed, scheduler exiting");
                    return engine;
                };
                debug!(event = ?request.event, "handling request");

                let result = engine.handle(request.event).map(|effects| {
                    publish_effects(&updates, effects);
                    publish_frame(&updates, engine.frame());
                });
                if let Err(ref e) = result {
                    warn!("Rejected request: {}", e);
                }
                if let Some(reply) = request.reply {
                    let _ = reply.send(result);
                }
            }
        }

        match (engine.session().paused, pause.is_some()) {
            (true, false) => pause = Some(every(intervals.pause_ms)),
            (false, true) => pause = None,
            _ => {}
        }
    }
}
