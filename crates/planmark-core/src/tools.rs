//! Tool gesture handling.

use crate::annotation::{Annotation, AnnotationKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available markup tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Pen,
    Line,
    Rectangle,
    Circle,
    Text,
    Eraser,
}

impl ToolKind {
    /// Whether this tool runs a capture between pointer-down and
    /// pointer-up. Text and eraser act synchronously on pointer-down.
    pub fn captures(self) -> bool {
        matches!(
            self,
            ToolKind::Pen | ToolKind::Line | ToolKind::Rectangle | ToolKind::Circle
        )
    }
}

/// Style applied to newly committed annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    /// Stroke color, passed through to the model uninterpreted.
    pub color: String,
    /// Stroke width in document units.
    pub stroke_width: f64,
    /// Content for newly placed text labels.
    pub text_label: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            color: "#ff0000".to_string(),
            stroke_width: 2.0,
            text_label: "Text".to_string(),
        }
    }
}

/// Gesture state. The capturing variant carries its own payload so the
/// state machine is testable without a live drawing surface.
#[derive(Debug, Clone, Default)]
enum GestureState {
    #[default]
    Idle,
    Capturing {
        /// Anchor: the snapped document-space point of pointer-down.
        start: Point,
        /// Most recently observed snapped document-space point.
        current: Point,
        /// Accumulated samples, pen only.
        path: Vec<Point>,
    },
}

/// An uncommitted shape, drawn as a live preview during capture through
/// the same projection path as committed annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct Sketch {
    pub kind: AnnotationKind,
    pub points: Vec<Point>,
    pub color: String,
    pub stroke_width: f64,
}

/// Interprets pointer-down/move/up sequences for the active tool.
///
/// Single-pointer: a second pointer-down while capturing is ignored.
/// All points entering this type are already snapped document space.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Style for new annotations.
    pub settings: ToolSettings,
    state: GestureState,
}

impl ToolManager {
    /// Create a manager with the default tool and settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch tools. Any capture in progress is abandoned.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.state = GestureState::Idle;
    }

    /// Drop back to idle without committing (page switch).
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }

    /// Whether a capture is in progress.
    pub fn is_capturing(&self) -> bool {
        matches!(self.state, GestureState::Capturing { .. })
    }

    /// Begin a capture at a snapped document-space point. Returns false
    /// for tools that do not capture, and for re-entry while already
    /// capturing.
    pub fn begin(&mut self, point: Point) -> bool {
        if !self.current_tool.captures() || self.is_capturing() {
            return false;
        }
        let path = if self.current_tool == ToolKind::Pen {
            vec![point]
        } else {
            Vec::new()
        };
        self.state = GestureState::Capturing {
            start: point,
            current: point,
            path,
        };
        true
    }

    /// Feed a pointer-move sample. Pen appends to the path; shape tools
    /// track only the latest point. Returns true while capturing.
    pub fn update(&mut self, point: Point) -> bool {
        let GestureState::Capturing { current, path, .. } = &mut self.state else {
            return false;
        };
        *current = point;
        if self.current_tool == ToolKind::Pen {
            path.push(point);
        }
        true
    }

    /// End the capture at a snapped document-space point and commit.
    /// Degenerate captures (coincident endpoints after snapping) return
    /// None. The pen path commits as accumulated; the release point is
    /// not appended.
    pub fn finish(&mut self, point: Point) -> Option<Annotation> {
        if let GestureState::Capturing { current, .. } = &mut self.state {
            *current = point;
        }
        self.commit()
    }

    /// End the capture at the last observed position. Losing pointer
    /// capture, or releasing outside the surface, commits whatever was
    /// captured (or discards a degenerate capture) exactly like
    /// pointer-up; there is no separate abort path.
    pub fn cancel(&mut self) -> Option<Annotation> {
        self.commit()
    }

    fn commit(&mut self) -> Option<Annotation> {
        let GestureState::Capturing { start, current, path } =
            std::mem::take(&mut self.state)
        else {
            return None;
        };
        let s = &self.settings;
        let annotation = match self.current_tool {
            ToolKind::Pen if !path.is_empty() => {
                Some(Annotation::pen(path, s.color.clone(), s.stroke_width))
            }
            ToolKind::Line => Some(Annotation::line(
                start,
                current,
                s.color.clone(),
                s.stroke_width,
            )),
            ToolKind::Rectangle => Some(Annotation::rectangle(
                start,
                current,
                s.color.clone(),
                s.stroke_width,
            )),
            ToolKind::Circle => Some(Annotation::circle(
                start,
                current,
                s.color.clone(),
                s.stroke_width,
            )),
            _ => None,
        };
        annotation.filter(|a| !a.is_degenerate())
    }

    /// The uncommitted shape for preview rendering, if a capture is in
    /// progress.
    pub fn preview(&self) -> Option<Sketch> {
        let GestureState::Capturing { start, current, path } = &self.state else {
            return None;
        };
        let kind = match self.current_tool {
            ToolKind::Pen => AnnotationKind::Pen,
            ToolKind::Line => AnnotationKind::Line,
            ToolKind::Rectangle => AnnotationKind::Rectangle,
            ToolKind::Circle => AnnotationKind::Circle,
            _ => return None,
        };
        let points = if kind == AnnotationKind::Pen {
            path.clone()
        } else {
            vec![*start, *current]
        };
        Some(Sketch {
            kind,
            points,
            color: self.settings.color.clone(),
            stroke_width: self.settings.stroke_width,
        })
    }
}
