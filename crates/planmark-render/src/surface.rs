//! Overlay surface capability trait.

use kurbo::{Point, Rect};

/// Stroke parameters for a single drawing call. The width is already in
/// screen pixels; the color string passes through from the model
/// uninterpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke<'a> {
    pub color: &'a str,
    pub width: f64,
}

/// Minimal capability interface for the overlay surface.
///
/// All coordinates are screen space; the render pipeline has already
/// projected document coordinates through the viewport. Implementations
/// draw outlines only (no fill) and should treat a polyline of fewer than
/// two points as empty.
pub trait DrawSurface {
    /// Erase the whole overlay.
    fn clear(&mut self);

    /// Stroke connected segments through the given points. Used for pen
    /// paths and straight lines.
    fn draw_polyline(&mut self, points: &[Point], stroke: &Stroke);

    /// Stroke an axis-aligned rectangle outline.
    fn draw_rect(&mut self, rect: Rect, stroke: &Stroke);

    /// Stroke a circle outline.
    fn draw_circle(&mut self, center: Point, radius: f64, stroke: &Stroke);

    /// Render a text label with its top-left anchor at `anchor`.
    fn draw_text(&mut self, anchor: Point, text: &str, font_size: f64, color: &str);
}
