//! Annotation model: the persisted, document-space representation of markups.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Schema version written into every new annotation. The engine never
/// migrates older versions; that is a host concern.
pub const SCHEMA_VERSION: u32 = 1;

/// Unique identifier for annotations. Assigned at creation, never reused.
pub type AnnotationId = Uuid;

/// Kind of a committed markup.
///
/// The eraser is a tool, not a kind: it deletes annotations and never
/// creates one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    /// Freehand path, one point per captured sample.
    Pen,
    /// Straight segment between two points.
    Line,
    /// Axis-aligned rectangle spanned by two opposite corners.
    Rectangle,
    /// Circle given as center plus a point on the circumference.
    Circle,
    /// Text label anchored at a single point.
    Text,
}

impl AnnotationKind {
    /// Minimum number of points a committed annotation of this kind carries.
    pub fn min_points(self) -> usize {
        match self {
            AnnotationKind::Pen | AnnotationKind::Text => 1,
            AnnotationKind::Line | AnnotationKind::Rectangle | AnnotationKind::Circle => 2,
        }
    }
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// One committed markup object.
///
/// All coordinates are document space; screen coordinates never enter the
/// model. An annotation is immutable once committed — it changes only
/// through whole-model undo/redo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Opaque unique identifier.
    pub id: AnnotationId,
    /// Markup kind; fixes the interpretation of `points`.
    pub kind: AnnotationKind,
    /// Document-space coordinates, per-kind arity (see [`AnnotationKind`]).
    pub points: Vec<Point>,
    /// Stroke color, opaque to the model (hex or named).
    pub color: String,
    /// Stroke width in document units, rescaled by the render pipeline.
    pub stroke_width: f64,
    /// Label content, present for `Text` only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Creation time, Unix epoch milliseconds.
    pub created_at: u64,
    /// Model schema version at creation.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl Annotation {
    fn new(
        kind: AnnotationKind,
        points: Vec<Point>,
        color: String,
        stroke_width: f64,
        label: Option<String>,
    ) -> Self {
        debug_assert!(points.len() >= kind.min_points());
        Self {
            id: Uuid::new_v4(),
            kind,
            points,
            color,
            stroke_width,
            label,
            created_at: now_millis(),
            schema_version: SCHEMA_VERSION,
        }
    }

    /// Freehand path through the captured samples (at least one).
    pub fn pen(points: Vec<Point>, color: impl Into<String>, stroke_width: f64) -> Self {
        Self::new(AnnotationKind::Pen, points, color.into(), stroke_width, None)
    }

    /// Straight segment from `start` to `end`.
    pub fn line(start: Point, end: Point, color: impl Into<String>, stroke_width: f64) -> Self {
        Self::new(
            AnnotationKind::Line,
            vec![start, end],
            color.into(),
            stroke_width,
            None,
        )
    }

    /// Axis-aligned rectangle spanned by two opposite corners, in either order.
    pub fn rectangle(a: Point, b: Point, color: impl Into<String>, stroke_width: f64) -> Self {
        Self::new(
            AnnotationKind::Rectangle,
            vec![a, b],
            color.into(),
            stroke_width,
            None,
        )
    }

    /// Circle centered at `center` passing through `rim`.
    pub fn circle(center: Point, rim: Point, color: impl Into<String>, stroke_width: f64) -> Self {
        Self::new(
            AnnotationKind::Circle,
            vec![center, rim],
            color.into(),
            stroke_width,
            None,
        )
    }

    /// Text label anchored at `anchor`.
    pub fn text(
        anchor: Point,
        label: impl Into<String>,
        color: impl Into<String>,
        stroke_width: f64,
    ) -> Self {
        Self::new(
            AnnotationKind::Text,
            vec![anchor],
            color.into(),
            stroke_width,
            Some(label.into()),
        )
    }

    /// Two-point kinds whose endpoints coincide carry no visible geometry
    /// and are never committed.
    pub fn is_degenerate(&self) -> bool {
        match self.kind {
            AnnotationKind::Line | AnnotationKind::Rectangle | AnnotationKind::Circle => {
                self.points.len() < 2 || self.points[0] == self.points[1]
            }
            AnnotationKind::Pen | AnnotationKind::Text => self.points.is_empty(),
        }
    }

    /// Axis-aligned bounding box in document coordinates.
    pub fn bounds(&self) -> Rect {
        match self.kind {
            AnnotationKind::Circle => {
                let center = self.points[0];
                let radius = center.distance(self.points[1]);
                Rect::new(
                    center.x - radius,
                    center.y - radius,
                    center.x + radius,
                    center.y + radius,
                )
            }
            _ => {
                let mut iter = self.points.iter();
                let first = match iter.next() {
                    Some(p) => *p,
                    None => return Rect::ZERO,
                };
                iter.fold(Rect::from_points(first, first), |r, p| {
                    r.union_pt(*p)
                })
            }
        }
    }

    /// Test whether a document-space point falls on this markup's stroke,
    /// within `tolerance` (plus half the stroke width).
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let reach = tolerance + self.stroke_width / 2.0;
        match self.kind {
            AnnotationKind::Pen | AnnotationKind::Line => {
                point_to_polyline_dist(point, &self.points) <= reach
            }
            AnnotationKind::Rectangle => {
                let r = Rect::from_points(self.points[0], self.points[1]);
                let corners = [
                    Point::new(r.x0, r.y0),
                    Point::new(r.x1, r.y0),
                    Point::new(r.x1, r.y1),
                    Point::new(r.x0, r.y1),
                    Point::new(r.x0, r.y0),
                ];
                point_to_polyline_dist(point, &corners) <= reach
            }
            AnnotationKind::Circle => {
                let center = self.points[0];
                let radius = center.distance(self.points[1]);
                (point.distance(center) - radius).abs() <= reach
            }
            AnnotationKind::Text => point.distance(self.points[0]) <= reach,
        }
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = kurbo::Vec2::new(b.x - a.x, b.y - a.y);
    let pv = kurbo::Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    point.distance(proj)
}

/// Minimum distance from a point to a polyline. A single-point polyline
/// degenerates to point distance.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => point.distance(*only),
        _ => points
            .windows(2)
            .map(|w| point_to_segment_dist(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}
