//! Clock face renderer.
//!
//! [`draw`] is a pure function of the settings, the session and the sampled
//! time. It never looks at anything else and keeps nothing between calls, so a
//! frame can be rebuilt at any moment (after an input event or on the display
//! timer) and compared in tests.

pub mod command;

use std::f64::consts::PI;

pub use command::{DrawCommand, Frame};

use crate::pomodoro::clock::{ClockTime, deg_to_rad};
use crate::pomodoro::phase::Phase;
use crate::pomodoro::session::Session;
use crate::settings::Settings;

const CONTROL_STEM: f64 = 30.0;
const CONTROL_OFFSET: f64 = 23.0;
const CONTROL_HEIGHT: f64 = 30.0;
const START_CONTROL_WIDTH: f64 = 15.0;
const STOP_CONTROL_WIDTH: f64 = 10.0;
const STOP_CONTROL_ROTATION_DEG: f64 = 30.0;

/// Paints the whole clock. Returns an empty frame when no canvas is bound.
pub fn draw(settings: &Settings, session: &Session, time: &ClockTime) -> Frame {
    let mut frame = Frame::default();
    let Some(canvas) = settings.canvas else {
        return frame;
    };

    let size = &settings.size;
    let color = &settings.color;
    let outer_radius = size.outer_radius;
    let inner_radius = size.inner_radius();
    let phase_shades = if session.paused {
        &color.paused
    } else {
        color.phase(session.current)
    };

    frame
        .push(DrawCommand::ClearRect {
            x: 0.0,
            y: 0.0,
            width: canvas.width,
            height: canvas.height,
        })
        .push(DrawCommand::Save)
        .push(DrawCommand::Translate {
            x: canvas.width / 2.0,
            y: canvas.height - (canvas.width / 2.0),
        })
        // 0 rad points at twelve o'clock from here on
        .rotate(-0.5 * PI);

    // Outer ring
    frame
        .push(DrawCommand::BeginPath)
        .line_width(size.outer_ring_thickness)
        .stroke_style(&phase_shades.base)
        .fill_style("#fff")
        .arc(outer_radius, 0.0, PI * 2.0)
        .push(DrawCommand::ClosePath)
        .push(DrawCommand::Fill)
        .push(DrawCommand::Stroke);

    // Start/pause control
    let start_fill = if session.current == Phase::None || session.paused {
        &color.phase(session.current).dark
    } else {
        &color.paused.dark
    };
    frame
        .push(DrawCommand::BeginPath)
        .line(outer_radius, outer_radius + CONTROL_STEM)
        .push(DrawCommand::Stroke)
        .push(DrawCommand::BeginPath)
        .fill_style(start_fill)
        .push(DrawCommand::FillRect {
            x: outer_radius + CONTROL_OFFSET,
            y: -CONTROL_HEIGHT / 2.0,
            width: START_CONTROL_WIDTH,
            height: CONTROL_HEIGHT,
        });

    // Stop control
    frame
        .push(DrawCommand::Save)
        .rotate(deg_to_rad(STOP_CONTROL_ROTATION_DEG))
        .push(DrawCommand::BeginPath)
        .line(outer_radius, outer_radius + CONTROL_OFFSET)
        .push(DrawCommand::Stroke)
        .push(DrawCommand::BeginPath)
        .fill_style(&color.button.stop)
        .push(DrawCommand::FillRect {
            x: outer_radius + CONTROL_OFFSET,
            y: -CONTROL_HEIGHT / 2.0,
            width: STOP_CONTROL_WIDTH,
            height: CONTROL_HEIGHT,
        })
        .push(DrawCommand::Restore);

    if session.is_running() {
        draw_periods(&mut frame, settings, session, inner_radius);
    }

    // Inner ring
    frame
        .push(DrawCommand::BeginPath)
        .line_width(size.inner_ring_thickness)
        .stroke_style(&phase_shades.dark)
        .arc(inner_radius + size.inner_ring_thickness / 2.0, 0.0, PI * 2.0)
        .push(DrawCommand::Stroke);

    draw_ticks(&mut frame, settings, inner_radius, 60, 1.0);
    draw_ticks(&mut frame, settings, inner_radius, 12, 2.0);
    draw_hands(&mut frame, settings, time, inner_radius);

    frame.push(DrawCommand::Restore);
    frame
}

/// Wedge for the running phase followed by a preview of the one after it.
fn draw_periods(frame: &mut Frame, settings: &Settings, session: &Session, radius: f64) {
    let active = session.current;
    let upcoming = active.next();
    let active_angle = session.duration_angle(active);
    let upcoming_angle = session.duration_angle(upcoming);

    frame
        .push(DrawCommand::Save)
        .rotate(session.started_at_angle + session.paused_for_angle);
    wedge(frame, radius, 0.0, active_angle, &settings.color.phase(active).light);
    wedge(
        frame,
        radius,
        active_angle,
        active_angle + upcoming_angle,
        &settings.color.phase(upcoming).light,
    );
    frame.push(DrawCommand::Restore);
}

fn wedge(frame: &mut Frame, radius: f64, from: f64, to: f64, color: &str) {
    frame
        .push(DrawCommand::BeginPath)
        .fill_style(color)
        .arc(radius, from, to)
        .push(DrawCommand::LineTo { x: 0.0, y: 0.0 })
        .push(DrawCommand::ClosePath)
        .push(DrawCommand::Fill);
}

fn draw_ticks(frame: &mut Frame, settings: &Settings, radius: f64, count: u32, width: f64) {
    frame
        .push(DrawCommand::LineCap { cap: "butt" })
        .line_width(width)
        .stroke_style(&settings.color.tick)
        .push(DrawCommand::BeginPath);

    let step = (2.0 * PI) / f64::from(count);
    for _ in 0..count {
        frame
            .rotate(step)
            .line(radius - settings.size.tick_size, radius);
    }
    frame.push(DrawCommand::Stroke);
}

fn draw_hands(frame: &mut Frame, settings: &Settings, time: &ClockTime, radius: f64) {
    let color = &settings.color;
    let hands = [
        (time.angle.hour, radius / 2.0, 6.0, &color.hand.minutes),
        (time.angle.minute, radius - settings.size.tick_size, 6.0, &color.hand.minutes),
        (time.angle.second, radius, 4.0, &color.hand.seconds),
    ];

    for (angle, length, width, stroke) in hands {
        frame
            .push(DrawCommand::Save)
            .rotate(angle)
            .push(DrawCommand::BeginPath)
            .line(0.0, length)
            .line_width(width)
            .stroke_style(stroke)
            .push(DrawCommand::Stroke)
            .push(DrawCommand::Restore);
    }

    // Centre cap and mount point
    frame
        .push(DrawCommand::BeginPath)
        .arc(10.0, 0.0, 2.0 * PI)
        .fill_style(&color.hand.seconds)
        .push(DrawCommand::Fill)
        .push(DrawCommand::BeginPath)
        .arc(5.0, 0.0, 2.0 * PI)
        .fill_style(&color.tick)
        .push(DrawCommand::Fill);
}
