use serde::Serialize;

/// One 2D canvas call. Field names follow the `CanvasRenderingContext2D` arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCommand {
    ClearRect { x: f64, y: f64, width: f64, height: f64 },
    Save,
    Restore,
    Translate { x: f64, y: f64 },
    Rotate { angle: f64 },
    BeginPath,
    ClosePath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Arc {
        x: f64,
        y: f64,
        radius: f64,
        #[serde(rename = "startAngle")]
        start_angle: f64,
        #[serde(rename = "endAngle")]
        end_angle: f64,
    },
    Fill,
    Stroke,
    FillRect { x: f64, y: f64, width: f64, height: f64 },
    StrokeStyle { color: String },
    FillStyle { color: String },
    LineWidth { width: f64 },
    LineCap { cap: &'static str },
}

/// Ordered drawing commands for one render.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub(crate) fn push(&mut self, command: DrawCommand) -> &mut Self {
        self.commands.push(command);
        self
    }

    pub(crate) fn arc(&mut self, radius: f64, start_angle: f64, end_angle: f64) -> &mut Self {
        self.push(DrawCommand::Arc {
            x: 0.0,
            y: 0.0,
            radius,
            start_angle,
            end_angle,
        })
    }

    pub(crate) fn line(&mut self, from: f64, to: f64) -> &mut Self {
        self.push(DrawCommand::MoveTo { x: from, y: 0.0 })
            .push(DrawCommand::LineTo { x: to, y: 0.0 })
    }

    pub(crate) fn rotate(&mut self, angle: f64) -> &mut Self {
        self.push(DrawCommand::Rotate { angle })
    }

    pub(crate) fn stroke_style(&mut self, color: &str) -> &mut Self {
        self.push(DrawCommand::StrokeStyle {
            color: color.to_string(),
        })
    }

    pub(crate) fn fill_style(&mut self, color: &str) -> &mut Self {
        self.push(DrawCommand::FillStyle {
            color: color.to_string(),
        })
    }

    pub(crate) fn line_width(&mut self, width: f64) -> &mut Self {
        self.push(DrawCommand::LineWidth { width })
    }
}
