//! Engine facade: wires viewport, snapping, gestures, and the document.

use crate::annotation::Annotation;
use crate::document::AnnotationDocument;
use crate::snap::GridSnap;
use crate::tools::{Sketch, ToolKind, ToolManager, ToolSettings};
use crate::viewport::Viewport;
use kurbo::Point;

/// Eraser hit tolerance in document points when grid snapping is off.
const DEFAULT_ERASER_TOLERANCE: f64 = 8.0;

/// The annotation engine for a single rendered page.
///
/// Single-threaded and synchronous: every pointer event completes its
/// state transition before returning, so a host save callback issued
/// afterwards can never observe a half-applied mutation. Pointer event
/// methods return true when the overlay needs a redraw.
///
/// The engine holds the viewport descriptor as an `Option`: while the
/// host has not supplied one (page still loading or being measured),
/// every pointer event is dropped rather than mapped wrongly.
#[derive(Debug, Clone, Default)]
pub struct AnnotationEngine {
    document: AnnotationDocument,
    tools: ToolManager,
    snap: GridSnap,
    viewport: Option<Viewport>,
}

impl AnnotationEngine {
    /// Create an engine with an empty document and no viewport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine restored from previously persisted annotations.
    pub fn with_annotations(annotations: Vec<Annotation>) -> Self {
        Self {
            document: AnnotationDocument::from_annotations(annotations),
            ..Self::default()
        }
    }

    /// The live annotation list, for rendering and host serialization.
    pub fn annotations(&self) -> &[Annotation] {
        self.document.annotations()
    }

    /// The underlying document (history queries, JSON envelope).
    pub fn document(&self) -> &AnnotationDocument {
        &self.document
    }

    /// The current viewport descriptor, if ready.
    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    /// Install or update the viewport descriptor.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    /// Mark the viewport not ready; subsequent pointer events are dropped.
    pub fn clear_viewport(&mut self) {
        self.viewport = None;
    }

    /// The active tool.
    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    /// Select a tool; any capture in progress is abandoned.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tools.set_tool(tool);
    }

    /// Style for newly committed annotations.
    pub fn settings(&self) -> &ToolSettings {
        &self.tools.settings
    }

    /// Mutable style for newly committed annotations.
    pub fn settings_mut(&mut self) -> &mut ToolSettings {
        &mut self.tools.settings
    }

    /// The grid snapping configuration.
    pub fn snap(&self) -> &GridSnap {
        &self.snap
    }

    /// Replace the grid snapping configuration.
    pub fn set_snap(&mut self, snap: GridSnap) {
        self.snap = snap;
    }

    /// The uncommitted capture for preview rendering, if any.
    pub fn preview(&self) -> Option<Sketch> {
        self.tools.preview()
    }

    /// Map a screen point to snapped document space, or None while the
    /// viewport is not ready.
    fn doc_point(&self, screen: Point) -> Option<Point> {
        let viewport = self.viewport.as_ref()?;
        Some(self.snap.snap(viewport.to_doc(screen)))
    }

    fn eraser_tolerance(&self) -> f64 {
        if self.snap.enabled {
            // A snapped click is within half a cell of the intended point.
            self.snap.spacing / 2.0
        } else {
            DEFAULT_ERASER_TOLERANCE
        }
    }

    /// Pointer pressed on the overlay, in screen coordinates.
    pub fn pointer_down(&mut self, screen: Point) -> bool {
        if self.tools.is_capturing() {
            // Single-pointer state machine: a second touch is ignored.
            return false;
        }
        let Some(point) = self.doc_point(screen) else {
            log::trace!("pointer_down dropped: viewport not ready");
            return false;
        };

        match self.tools.current_tool {
            ToolKind::Text => {
                let s = self.settings();
                let annotation = Annotation::text(
                    point,
                    s.text_label.clone(),
                    s.color.clone(),
                    s.stroke_width,
                );
                log::debug!("placed text label at ({:.1}, {:.1})", point.x, point.y);
                self.document.add(annotation);
                true
            }
            ToolKind::Eraser => {
                let tolerance = self.eraser_tolerance();
                match self.document.annotation_at(point, tolerance) {
                    Some(id) => {
                        log::debug!("erased annotation {id}");
                        self.document.remove(id)
                    }
                    None => false,
                }
            }
            _ => self.tools.begin(point),
        }
    }

    /// Pointer moved while pressed, in screen coordinates.
    pub fn pointer_move(&mut self, screen: Point) -> bool {
        let Some(point) = self.doc_point(screen) else {
            log::trace!("pointer_move dropped: viewport not ready");
            return false;
        };
        self.tools.update(point)
    }

    /// Pointer released, in screen coordinates. Commits the capture, or
    /// discards it when degenerate. Returns true when the overlay needs
    /// a redraw (a commit, or a preview that must be erased).
    pub fn pointer_up(&mut self, screen: Point) -> bool {
        if !self.tools.is_capturing() {
            return false;
        }
        let committed = match self.doc_point(screen) {
            Some(point) => self.tools.finish(point),
            // Viewport went away mid-gesture: commit at the last mapped
            // position, same as a lost capture.
            None => self.tools.cancel(),
        };
        self.commit(committed)
    }

    /// Pointer capture lost (release outside the surface, focus loss).
    /// Identical to pointer-up at the last observed position.
    pub fn pointer_cancel(&mut self) -> bool {
        if !self.tools.is_capturing() {
            return false;
        }
        let committed = self.tools.cancel();
        self.commit(committed)
    }

    fn commit(&mut self, annotation: Option<Annotation>) -> bool {
        match annotation {
            Some(a) => {
                log::debug!("committed {:?} annotation ({} points)", a.kind, a.points.len());
                self.document.add(a);
            }
            None => log::debug!("discarded degenerate capture"),
        }
        // Either way the preview overlay is stale.
        true
    }

    /// Undo the last mutation. No-op on empty history.
    pub fn undo(&mut self) -> bool {
        self.document.undo()
    }

    /// Redo the last undone mutation. No-op on empty history.
    pub fn redo(&mut self) -> bool {
        self.document.redo()
    }

    /// Remove every annotation (undoable).
    pub fn clear_all(&mut self) -> bool {
        self.document.clear_all();
        true
    }

    /// Page or document switch: replace the live list, clear both history
    /// stacks, and drop any capture in progress.
    pub fn load_page(&mut self, annotations: Vec<Annotation>) {
        self.tools.reset();
        self.document.replace_all(annotations);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationKind;
    use kurbo::Vec2;

    /// Engine with a unit viewport and a fine 50-point grid, so the
    /// screen coordinates used below land exactly on grid intersections.
    fn engine() -> AnnotationEngine {
        let mut e = AnnotationEngine::new();
        e.set_viewport(Viewport::new(Vec2::ZERO, 1.0));
        e.set_snap(GridSnap::new(50.0, true));
        e
    }

    #[test]
    fn test_pen_gesture_end_to_end() {
        let mut e = engine();
        assert!(e.pointer_down(Point::new(100.0, 100.0)));
        assert!(e.pointer_move(Point::new(150.0, 100.0)));
        assert!(e.pointer_move(Point::new(150.0, 150.0)));
        assert!(e.pointer_up(Point::new(150.0, 150.0)));

        assert_eq!(e.annotations().len(), 1);
        let a = &e.annotations()[0];
        assert_eq!(a.kind, AnnotationKind::Pen);
        assert_eq!(
            a.points,
            vec![
                Point::new(100.0, 100.0),
                Point::new(150.0, 100.0),
                Point::new(150.0, 150.0),
            ]
        );
        assert!(e.document().can_undo());
        assert!(!e.document().can_redo());
        // Exactly one history entry: the commit.
        assert!(e.undo());
        assert!(e.annotations().is_empty());
        assert!(!e.undo());
    }

    #[test]
    fn test_rectangle_corner_independence() {
        let mut e = engine();
        e.set_tool(ToolKind::Rectangle);

        e.pointer_down(Point::new(100.0, 100.0));
        e.pointer_up(Point::new(250.0, 200.0));

        e.pointer_down(Point::new(250.0, 200.0));
        e.pointer_up(Point::new(100.0, 100.0));

        let [a, b] = e.annotations() else { panic!("expected two rectangles") };
        assert_eq!(a.bounds(), b.bounds());
    }

    #[test]
    fn test_degenerate_after_snap_is_discarded() {
        let mut e = engine();
        e.set_tool(ToolKind::Line);
        // Distinct screen points that snap to the same grid intersection.
        e.pointer_down(Point::new(98.0, 102.0));
        assert!(e.pointer_up(Point::new(104.0, 97.0)));
        assert!(e.annotations().is_empty());
        assert!(!e.document().can_undo());
    }

    #[test]
    fn test_text_commits_on_pointer_down() {
        let mut e = engine();
        e.set_tool(ToolKind::Text);
        e.settings_mut().text_label = "RFI-12".to_string();
        assert!(e.pointer_down(Point::new(100.0, 200.0)));

        let a = &e.annotations()[0];
        assert_eq!(a.kind, AnnotationKind::Text);
        assert_eq!(a.label.as_deref(), Some("RFI-12"));
        assert_eq!(a.points, vec![Point::new(100.0, 200.0)]);
        // No capture: pointer-up after placement changes nothing.
        assert!(!e.pointer_up(Point::new(100.0, 200.0)));
        assert_eq!(e.annotations().len(), 1);
    }

    #[test]
    fn test_eraser_removes_topmost_hit() {
        let mut e = engine();
        e.set_tool(ToolKind::Line);
        e.pointer_down(Point::new(0.0, 0.0));
        e.pointer_up(Point::new(200.0, 0.0));
        e.pointer_down(Point::new(0.0, 0.0));
        e.pointer_up(Point::new(200.0, 0.0));
        assert_eq!(e.annotations().len(), 2);
        let top_id = e.annotations()[1].id;

        e.set_tool(ToolKind::Eraser);
        assert!(e.pointer_down(Point::new(100.0, 0.0)));
        assert_eq!(e.annotations().len(), 1);
        assert!(e.annotations().iter().all(|a| a.id != top_id));

        // A miss deletes nothing.
        assert!(!e.pointer_down(Point::new(1000.0, 1000.0)));
        assert_eq!(e.annotations().len(), 1);
    }

    #[test]
    fn test_events_dropped_while_viewport_not_ready() {
        let mut e = AnnotationEngine::new();
        e.set_snap(GridSnap::disabled());
        assert!(!e.pointer_down(Point::new(10.0, 10.0)));
        assert!(!e.pointer_move(Point::new(20.0, 20.0)));
        assert!(!e.pointer_up(Point::new(20.0, 20.0)));
        assert!(e.annotations().is_empty());
    }

    #[test]
    fn test_viewport_lost_mid_gesture_commits_last_position() {
        let mut e = engine();
        e.set_snap(GridSnap::disabled());
        e.pointer_down(Point::new(0.0, 0.0));
        e.pointer_move(Point::new(50.0, 50.0));
        e.clear_viewport();
        assert!(e.pointer_up(Point::new(999.0, 999.0)));

        let a = &e.annotations()[0];
        assert_eq!(a.points.last(), Some(&Point::new(50.0, 50.0)));
    }

    #[test]
    fn test_pointer_cancel_matches_pointer_up() {
        let mut e = engine();
        e.set_tool(ToolKind::Circle);
        e.pointer_down(Point::new(100.0, 100.0));
        e.pointer_move(Point::new(200.0, 100.0));
        assert!(e.pointer_cancel());

        let a = &e.annotations()[0];
        assert_eq!(a.kind, AnnotationKind::Circle);
        assert_eq!(a.points, vec![Point::new(100.0, 100.0), Point::new(200.0, 100.0)]);
        assert!(!e.pointer_cancel());
    }

    #[test]
    fn test_second_pointer_down_is_rejected() {
        let mut e = engine();
        e.pointer_down(Point::new(0.0, 0.0));
        assert!(!e.pointer_down(Point::new(500.0, 500.0)));
        e.pointer_up(Point::new(50.0, 0.0));
        assert_eq!(e.annotations().len(), 1);
    }

    #[test]
    fn test_points_snap_uniformly() {
        let mut e = engine();
        e.pointer_down(Point::new(13.0, 22.0));
        e.pointer_move(Point::new(61.0, 47.0));
        e.pointer_up(Point::new(61.0, 47.0));

        let a = &e.annotations()[0];
        assert_eq!(a.points, vec![Point::new(0.0, 0.0), Point::new(50.0, 50.0)]);
    }

    #[test]
    fn test_zoomed_viewport_maps_into_document_space() {
        let mut e = AnnotationEngine::new();
        e.set_viewport(Viewport::new(Vec2::new(10.0, 10.0), 2.0));
        e.set_snap(GridSnap::disabled());
        e.set_tool(ToolKind::Line);
        e.pointer_down(Point::new(10.0, 10.0));
        e.pointer_up(Point::new(110.0, 60.0));

        let a = &e.annotations()[0];
        assert_eq!(a.points, vec![Point::new(0.0, 0.0), Point::new(50.0, 25.0)]);
    }

    #[test]
    fn test_redo_invalidated_by_new_mutation() {
        let mut e = engine();
        e.set_tool(ToolKind::Text);
        e.pointer_down(Point::new(0.0, 0.0));
        assert!(e.undo());
        assert!(e.document().can_redo());

        e.pointer_down(Point::new(50.0, 50.0));
        assert!(!e.redo());
        assert_eq!(e.annotations().len(), 1);
    }

    #[test]
    fn test_load_page_fully_resets() {
        let mut e = engine();
        e.pointer_down(Point::new(0.0, 0.0));
        e.pointer_move(Point::new(50.0, 0.0));
        // Capture still in progress when the host switches pages.
        let restored = vec![Annotation::text(
            Point::new(72.0, 72.0),
            "carried over",
            "#0000ff",
            2.0,
        )];
        e.load_page(restored.clone());

        assert_eq!(e.annotations(), &restored[..]);
        assert!(!e.document().can_undo());
        assert!(!e.document().can_redo());
        assert!(e.preview().is_none());
        // The interrupted gesture's release must not commit anything.
        assert!(!e.pointer_up(Point::new(50.0, 50.0)));
        assert_eq!(e.annotations().len(), 1);
    }

    #[test]
    fn test_clear_all_is_undoable() {
        let mut e = engine();
        e.set_tool(ToolKind::Text);
        e.pointer_down(Point::new(0.0, 0.0));
        e.pointer_down(Point::new(50.0, 50.0));
        assert!(e.clear_all());
        assert!(e.annotations().is_empty());
        assert!(e.undo());
        assert_eq!(e.annotations().len(), 2);
    }
}
