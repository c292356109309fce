//! Annotation list and snapshot-based undo/redo history.

use crate::annotation::{Annotation, AnnotationId, SCHEMA_VERSION};
use kurbo::Point;
use serde::de::Error as _;
use serde::Serialize;

/// Maximum number of undo snapshots to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// The live annotation list for one page, plus its history.
///
/// Insertion order is z-order, back to front. History is kept as full-list
/// snapshots: O(n) per undo step but trivially correct — any mutation that
/// is not itself an undo/redo pushes the pre-mutation list onto the undo
/// stack and clears the redo stack.
#[derive(Debug, Clone, Default)]
pub struct AnnotationDocument {
    annotations: Vec<Annotation>,
    undo_stack: Vec<Vec<Annotation>>,
    redo_stack: Vec<Vec<Annotation>>,
}

impl AnnotationDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from previously persisted annotations, with
    /// empty history.
    pub fn from_annotations(annotations: Vec<Annotation>) -> Self {
        Self {
            annotations,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// The live annotation list, back to front.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Number of live annotations.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Whether the live list is empty.
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Push the pre-mutation state onto the undo stack.
    fn checkpoint(&mut self) {
        self.undo_stack.push(self.annotations.clone());
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Append a committed annotation.
    pub fn add(&mut self, annotation: Annotation) {
        self.checkpoint();
        self.annotations.push(annotation);
    }

    /// Delete the annotation with the given id. Returns false (and records
    /// no history entry) if no annotation matches.
    pub fn remove(&mut self, id: AnnotationId) -> bool {
        let Some(idx) = self.annotations.iter().position(|a| a.id == id) else {
            return false;
        };
        self.checkpoint();
        self.annotations.remove(idx);
        true
    }

    /// Empty the live list.
    pub fn clear_all(&mut self) {
        self.checkpoint();
        self.annotations.clear();
    }

    /// Undo the last mutation. Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack
            .push(std::mem::replace(&mut self.annotations, snapshot));
        true
    }

    /// Redo the last undone mutation. Returns false if there is nothing
    /// to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack
            .push(std::mem::replace(&mut self.annotations, snapshot));
        true
    }

    /// Whether undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Topmost annotation within `tolerance` of a document-space point,
    /// front to back.
    pub fn annotation_at(&self, point: Point, tolerance: f64) -> Option<AnnotationId> {
        self.annotations
            .iter()
            .rev()
            .find(|a| a.hit_test(point, tolerance))
            .map(|a| a.id)
    }

    /// Replace the live list wholesale (page or document switch). Both
    /// history stacks are cleared.
    pub fn replace_all(&mut self, annotations: Vec<Annotation>) {
        self.annotations = annotations;
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Serialize the live list to the persistence envelope.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        annotations_to_json(&self.annotations)
    }

    /// Restore a document from a persistence envelope, with empty history.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::from_annotations(annotations_from_json(json)?))
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    schema_version: u32,
    annotations: &'a [Annotation],
}

/// Serialize an annotation list to the JSON persistence envelope.
pub fn annotations_to_json(annotations: &[Annotation]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Envelope {
        schema_version: SCHEMA_VERSION,
        annotations,
    })
}

/// Parse a persistence envelope, skipping entries this engine cannot
/// decode (a newer schema's kinds, for instance) so older engines stay
/// usable against newer data. Surrounding valid annotations are kept
/// untouched and in order.
pub fn annotations_from_json(json: &str) -> Result<Vec<Annotation>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let entries = value
        .get("annotations")
        .and_then(|v| v.as_array())
        .ok_or_else(|| serde_json::Error::custom("missing 'annotations' array"))?;

    let mut annotations = Vec::with_capacity(entries.len());
    for entry in entries {
        match serde_json::from_value::<Annotation>(entry.clone()) {
            Ok(a) if a.points.len() >= a.kind.min_points() => annotations.push(a),
            Ok(a) => log::warn!(
                "skipping {:?} annotation {} on restore: too few points",
                a.kind,
                a.id
            ),
            Err(e) => log::warn!("skipping unreadable annotation on restore: {e}"),
        }
    }
    Ok(annotations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x: f64) -> Annotation {
        Annotation::line(Point::new(x, 0.0), Point::new(x, 72.0), "#ff0000", 2.0)
    }

    #[test]
    fn test_add_and_remove() {
        let mut doc = AnnotationDocument::new();
        let a = line(0.0);
        let id = a.id;
        doc.add(a);
        assert_eq!(doc.len(), 1);
        assert!(doc.remove(id));
        assert!(doc.is_empty());
        assert!(!doc.remove(id));
    }

    #[test]
    fn test_undo_redo_restores_exact_list() {
        let mut doc = AnnotationDocument::new();
        doc.add(line(0.0));
        doc.add(line(72.0));
        let before = doc.annotations().to_vec();

        assert!(doc.undo());
        assert_eq!(doc.len(), 1);
        assert!(doc.redo());
        assert_eq!(doc.annotations(), &before[..]);
    }

    #[test]
    fn test_undo_once_per_operation_round_trip() {
        let mut doc = AnnotationDocument::new();
        doc.add(line(0.0));
        let initial = doc.annotations().to_vec();

        // Sequence of three mutations, one of them a no-op-looking clear.
        let removed = doc.annotations()[0].id;
        doc.add(line(72.0));
        doc.remove(removed);
        doc.clear_all();
        let after = doc.annotations().to_vec();

        for _ in 0..3 {
            assert!(doc.undo());
        }
        assert_eq!(doc.annotations(), &initial[..]);

        for _ in 0..3 {
            assert!(doc.redo());
        }
        assert_eq!(doc.annotations(), &after[..]);
    }

    #[test]
    fn test_mutation_after_undo_clears_redo() {
        let mut doc = AnnotationDocument::new();
        doc.add(line(0.0));
        assert!(doc.undo());
        assert!(doc.can_redo());

        doc.add(line(72.0));
        assert!(!doc.can_redo());
        assert!(!doc.redo());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_history_underflow_is_noop() {
        let mut doc = AnnotationDocument::new();
        assert!(!doc.undo());
        assert!(!doc.redo());
        doc.add(line(0.0));
        assert!(doc.undo());
        // Past the oldest snapshot: safe no-op, state intact.
        assert!(!doc.undo());
        assert!(doc.is_empty());
        assert!(doc.can_redo());
    }

    #[test]
    fn test_clear_all_on_empty_still_undoes_cleanly() {
        let mut doc = AnnotationDocument::new();
        doc.clear_all();
        assert!(doc.undo());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_history_cap() {
        let mut doc = AnnotationDocument::new();
        for i in 0..(MAX_UNDO_HISTORY + 10) {
            doc.add(line(i as f64));
        }
        let mut undone = 0;
        while doc.undo() {
            undone += 1;
        }
        assert_eq!(undone, MAX_UNDO_HISTORY);
        assert_eq!(doc.len(), 10);
    }

    #[test]
    fn test_annotation_at_prefers_topmost() {
        let mut doc = AnnotationDocument::new();
        let bottom = line(0.0);
        let top = line(0.0);
        let top_id = top.id;
        doc.add(bottom);
        doc.add(top);

        let hit = doc.annotation_at(Point::new(0.0, 36.0), 4.0);
        assert_eq!(hit, Some(top_id));
        assert_eq!(doc.annotation_at(Point::new(500.0, 500.0), 4.0), None);
    }

    #[test]
    fn test_replace_all_clears_history() {
        let mut doc = AnnotationDocument::new();
        doc.add(line(0.0));
        doc.undo();
        doc.replace_all(vec![line(72.0), line(144.0)]);
        assert_eq!(doc.len(), 2);
        assert!(!doc.can_undo());
        assert!(!doc.can_redo());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut doc = AnnotationDocument::new();
        doc.add(line(0.0));
        doc.add(Annotation::text(
            Point::new(72.0, 72.0),
            "Note",
            "#0000ff",
            2.0,
        ));

        let json = doc.to_json().unwrap();
        let restored = AnnotationDocument::from_json(&json).unwrap();
        assert_eq!(restored.annotations(), doc.annotations());
        assert!(!restored.can_undo());
    }

    #[test]
    fn test_restore_skips_unknown_kind() {
        let json = r##"{
            "schema_version": 2,
            "annotations": [
                {
                    "id": "7f2c1f6e-5b7a-4b5e-9a40-0d6c2f9f3b11",
                    "kind": "pen",
                    "points": [{"x": 0.0, "y": 0.0}, {"x": 72.0, "y": 0.0}],
                    "color": "#ff0000",
                    "stroke_width": 2.0,
                    "created_at": 1700000000000,
                    "schema_version": 1
                },
                {
                    "id": "9a1b2c3d-4e5f-4a6b-8c7d-112233445566",
                    "kind": "stamp",
                    "points": [{"x": 10.0, "y": 10.0}],
                    "color": "#00ff00",
                    "stroke_width": 1.0,
                    "created_at": 1700000000001,
                    "schema_version": 2
                },
                {
                    "id": "0c9d8e7f-6a5b-4c3d-a21e-665544332211",
                    "kind": "text",
                    "points": [{"x": 144.0, "y": 144.0}],
                    "color": "#0000ff",
                    "stroke_width": 2.0,
                    "label": "Keep me",
                    "created_at": 1700000000002,
                    "schema_version": 1
                }
            ]
        }"##;

        let annotations = annotations_from_json(json).unwrap();
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].kind, crate::AnnotationKind::Pen);
        assert_eq!(annotations[1].label.as_deref(), Some("Keep me"));
    }

    #[test]
    fn test_restore_rejects_missing_array() {
        assert!(annotations_from_json(r#"{"schema_version": 1}"#).is_err());
    }
}
