//! Viewport descriptor for screen/document conversions.

use kurbo::{Affine, Point, Vec2};

/// Pan/zoom state of the currently rendered page.
///
/// Supplied by the host whenever the page is panned, zoomed, or resized.
/// The engine only consumes it: every incoming pointer position is mapped
/// into document coordinates through `to_doc`, and the render pipeline
/// maps stored document coordinates back with `to_screen`. The two
/// conversions are exact inverses up to floating-point rounding.
///
/// "Not ready" (page still loading or being measured) is represented by
/// the absence of a descriptor; see [`crate::AnnotationEngine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Translation of the document origin, in screen pixels.
    pub offset: Vec2,
    /// Scale from document units to screen pixels. Always finite and
    /// positive; the host clamps its own zoom range before producing a
    /// descriptor.
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// Create a descriptor from a pan offset and zoom factor.
    pub fn new(offset: Vec2, zoom: f64) -> Self {
        debug_assert!(zoom.is_finite() && zoom > 0.0, "invalid zoom {zoom}");
        Self { offset, zoom }
    }

    /// The affine mapping document coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// The affine mapping screen coordinates to document coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to document coordinates.
    pub fn to_doc(&self, screen: Point) -> Point {
        self.inverse_transform() * screen
    }

    /// Convert a document point to screen coordinates.
    pub fn to_screen(&self, doc: Point) -> Point {
        self.transform() * doc
    }
}
