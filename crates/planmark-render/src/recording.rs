//! Command-recording surface for headless rendering and tests.

use crate::surface::{DrawSurface, Stroke};
use kurbo::{Point, Rect};

/// One recorded drawing call, with owned copies of every argument.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear,
    Polyline {
        points: Vec<Point>,
        color: String,
        width: f64,
    },
    Rect {
        rect: Rect,
        color: String,
        width: f64,
    },
    Circle {
        center: Point,
        radius: f64,
        color: String,
        width: f64,
    },
    Text {
        anchor: Point,
        text: String,
        font_size: f64,
        color: String,
    },
}

/// A [`DrawSurface`] that records its calls instead of painting.
///
/// Lets the render pipeline be exercised without a graphics backend; the
/// recorded command list is also a convenient debug dump of a frame.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCmd>,
}

impl RecordingSurface {
    /// Create an empty recording surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// The commands recorded since creation or the last `clear`.
    /// `clear` itself is recorded, so a full frame starts with
    /// [`DrawCmd::Clear`].
    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    /// Take the recorded commands, leaving the surface empty.
    pub fn take(&mut self) -> Vec<DrawCmd> {
        std::mem::take(&mut self.commands)
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCmd::Clear);
    }

    fn draw_polyline(&mut self, points: &[Point], stroke: &Stroke) {
        self.commands.push(DrawCmd::Polyline {
            points: points.to_vec(),
            color: stroke.color.to_string(),
            width: stroke.width,
        });
    }

    fn draw_rect(&mut self, rect: Rect, stroke: &Stroke) {
        self.commands.push(DrawCmd::Rect {
            rect,
            color: stroke.color.to_string(),
            width: stroke.width,
        });
    }

    fn draw_circle(&mut self, center: Point, radius: f64, stroke: &Stroke) {
        self.commands.push(DrawCmd::Circle {
            center,
            radius,
            color: stroke.color.to_string(),
            width: stroke.width,
        });
    }

    fn draw_text(&mut self, anchor: Point, text: &str, font_size: f64, color: &str) {
        self.commands.push(DrawCmd::Text {
            anchor,
            text: text.to_string(),
            font_size,
            color: color.to_string(),
        });
    }
}
