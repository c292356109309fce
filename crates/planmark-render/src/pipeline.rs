//! Render pipeline: projects stored annotations onto the overlay.

use crate::surface::{DrawSurface, Stroke};
use kurbo::Rect;
use planmark_core::annotation::{Annotation, AnnotationKind};
use planmark_core::tools::Sketch;
use planmark_core::viewport::Viewport;

/// Base text size in document points; scaled by the zoom factor at draw
/// time like every stroke width.
pub const BASE_TEXT_SIZE: f64 = 16.0;

/// Clear the overlay and redraw every annotation, back to front, followed
/// by the uncommitted capture preview, if any.
///
/// Both committed annotations and the preview run through the same
/// projection path, so an in-progress stroke lands exactly where its
/// committed form will. Idempotent: repeated calls with unchanged inputs
/// produce the same frame and mutate nothing but the surface.
pub fn render_overlay(
    surface: &mut dyn DrawSurface,
    annotations: &[Annotation],
    preview: Option<&Sketch>,
    viewport: &Viewport,
) {
    surface.clear();
    for a in annotations {
        draw_markup(
            surface,
            a.kind,
            &a.points,
            &a.color,
            a.stroke_width,
            a.label.as_deref(),
            viewport,
        );
    }
    if let Some(s) = preview {
        draw_markup(
            surface,
            s.kind,
            &s.points,
            &s.color,
            s.stroke_width,
            None,
            viewport,
        );
    }
    log::trace!(
        "overlay redraw: {} annotations, preview: {}",
        annotations.len(),
        preview.is_some()
    );
}

fn draw_markup(
    surface: &mut dyn DrawSurface,
    kind: AnnotationKind,
    points: &[kurbo::Point],
    color: &str,
    stroke_width: f64,
    label: Option<&str>,
    viewport: &Viewport,
) {
    // Stroke width is stored in document units; the on-screen width
    // tracks the zoom so thickness stays constant relative to the page.
    let stroke = Stroke {
        color,
        width: stroke_width * viewport.zoom,
    };
    match kind {
        AnnotationKind::Pen | AnnotationKind::Line => {
            let projected: Vec<_> = points.iter().map(|p| viewport.to_screen(*p)).collect();
            surface.draw_polyline(&projected, &stroke);
        }
        AnnotationKind::Rectangle => {
            let [a, b, ..] = points else { return };
            // Componentwise min/max, so the rectangle draws correctly
            // whichever corner the drag started from.
            let rect = Rect::from_points(viewport.to_screen(*a), viewport.to_screen(*b));
            surface.draw_rect(rect, &stroke);
        }
        AnnotationKind::Circle => {
            let [center, rim, ..] = points else { return };
            let center = viewport.to_screen(*center);
            // Radius is recomputed from the current projection on every
            // redraw, never cached, so it stays correct under zoom.
            let radius = center.distance(viewport.to_screen(*rim));
            surface.draw_circle(center, radius, &stroke);
        }
        AnnotationKind::Text => {
            let [anchor, ..] = points else { return };
            surface.draw_text(
                viewport.to_screen(*anchor),
                label.unwrap_or(""),
                BASE_TEXT_SIZE * viewport.zoom,
                color,
            );
        }
    }
}
