//! Annotation storage for an analysis session.
//!
//! The store owns the damage annotations of every image in the session, in
//! insertion order, together with the single selection pointer.

use web_time::{SystemTime, UNIX_EPOCH};

use crate::geometry::Point;
use crate::model::{AnnotationId, AnnotationPatch, DamageAnnotation};

/// Ordered collection of damage annotations with a single selection.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    /// All annotations in insertion order.
    annotations: Vec<DamageAnnotation>,
    /// Last id handed out, so same-millisecond inserts stay unique.
    last_id: AnnotationId,
    /// Currently selected annotation ID.
    selected_id: Option<AnnotationId>,
    /// Dirty flag - set when annotations or selection changes.
    /// Used to avoid re-rendering the overlay on every tick.
    dirty: bool,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self {
            dirty: true,
            ..Default::default()
        }
    }

    /// Build a store from existing records, keeping their ids.
    pub fn from_annotations(annotations: Vec<DamageAnnotation>) -> Self {
        let last_id = annotations.iter().map(|a| a.id).max().unwrap_or(0);
        Self {
            annotations,
            last_id,
            selected_id: None,
            dirty: true,
        }
    }

    /// Check if the store has been modified since last clear_dirty().
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag. Call after re-rendering.
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    #[inline]
    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Timestamp-based id, bumped past the previous one on collision.
    fn next_id(&mut self) -> AnnotationId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        match self.last_id.checked_add(1) {
            Some(next) => {
                let id = now.max(next);
                self.last_id = id;
                id
            }
            None => {
                // Ids are exhausted at the top; reuse the lowest free one.
                let id = (1..)
                    .find(|id| self.get(*id).is_none())
                    .unwrap_or_default();
                log::warn!("Annotation ids exhausted, reusing free id {}", id);
                id
            }
        }
    }

    /// Append an annotation and return its newly assigned ID.
    ///
    /// Only the id is touched; cost and confidences are kept as given.
    pub fn add(&mut self, mut annotation: DamageAnnotation) -> AnnotationId {
        let id = self.next_id();
        annotation.id = id;
        log::debug!(
            "Added annotation {} '{}' on image '{}'",
            id,
            annotation.damage_type,
            annotation.image_id
        );
        self.annotations.push(annotation);
        self.mark_dirty();
        id
    }

    /// Apply a partial update. Returns false if the id is unknown or the
    /// patch changes nothing.
    pub fn update(&mut self, id: AnnotationId, patch: &AnnotationPatch) -> bool {
        let Some(slot) = self.annotations.iter_mut().find(|a| a.id == id) else {
            log::trace!("Ignoring update for unknown annotation {}", id);
            return false;
        };

        let next = patch.applied_to(slot);
        if next == *slot {
            return false;
        }
        *slot = next;
        log::debug!("Updated annotation {}", id);
        self.mark_dirty();
        true
    }

    /// Remove an annotation by ID, clearing the selection if it pointed there.
    pub fn remove(&mut self, id: AnnotationId) -> Option<DamageAnnotation> {
        let index = self.annotations.iter().position(|a| a.id == id)?;
        let removed = self.annotations.remove(index);
        if self.selected_id == Some(id) {
            self.selected_id = None;
        }
        log::debug!("Removed annotation {}", id);
        self.mark_dirty();
        Some(removed)
    }

    /// Select an annotation, or clear the selection with `None`.
    ///
    /// Selecting the already selected annotation deselects it. Unknown ids
    /// are ignored.
    pub fn select(&mut self, id: Option<AnnotationId>) {
        let next = match id {
            Some(id) if self.selected_id == Some(id) => None,
            Some(id) if self.get(id).is_none() => {
                log::trace!("Ignoring selection of unknown annotation {}", id);
                return;
            }
            other => other,
        };
        if self.selected_id != next {
            self.selected_id = next;
            self.mark_dirty();
        }
    }

    /// Get the selected annotation ID.
    pub fn selected(&self) -> Option<AnnotationId> {
        self.selected_id
    }

    pub fn selected_annotation(&self) -> Option<&DamageAnnotation> {
        self.selected_id.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: AnnotationId) -> Option<&DamageAnnotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    /// All annotations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &DamageAnnotation> {
        self.annotations.iter()
    }

    /// Annotations drawn on one image, in insertion order.
    pub fn filter_by_image<'a>(
        &'a self,
        image_id: &'a str,
    ) -> impl Iterator<Item = &'a DamageAnnotation> + 'a {
        self.annotations.iter().filter(move |a| a.image_id == image_id)
    }

    /// Find the top-most annotation on `image_id` containing the point.
    /// Later annotations are drawn above earlier ones.
    pub fn hit_test(&self, image_id: &str, point: Point) -> Option<AnnotationId> {
        self.annotations
            .iter()
            .rev()
            .find(|a| a.image_id == image_id && a.position.contains(point))
            .map(|a| a.id)
    }

    /// Owned copy of every annotation, detached from the store.
    pub fn snapshot(&self) -> Vec<DamageAnnotation> {
        self.annotations.clone()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::model::{Severity, seeded_annotations};

    fn drawn(image: &str, x: f32) -> DamageAnnotation {
        DamageAnnotation::drawn(image, Rect::new(x, 10.0, 20.0, 20.0))
    }

    #[test]
    fn test_add_assigns_unique_ids() {
        let mut store = AnnotationStore::new();
        let ids: Vec<_> = (0..20).map(|i| store.add(drawn("img", i as f32))).collect();

        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
        assert_eq!(store.len(), 20);
    }

    #[test]
    fn test_add_keeps_values() {
        let mut store = AnnotationStore::new();
        let mut ann = drawn("img", 0.0);
        ann.estimated_cost = -3.0;
        let id = store.add(ann);
        assert_eq!(store.get(id).map(|a| a.estimated_cost), Some(-3.0));
    }

    #[test]
    fn test_from_annotations_continues_above_max_id() {
        let mut store = AnnotationStore::from_annotations(seeded_annotations("img"));
        let id = store.add(drawn("img", 0.0));
        assert!(id > 4);
        assert_eq!(store.get(1).map(|a| a.estimated_cost), Some(950.0));
    }

    #[test]
    fn test_add_after_max_id_does_not_overflow() {
        let mut top = drawn("img", 0.0);
        top.id = AnnotationId::MAX;
        let mut store = AnnotationStore::from_annotations(vec![top]);

        let a = store.add(drawn("img", 10.0));
        let b = store.add(drawn("img", 20.0));
        assert_ne!(a, b);
        assert_ne!(a, AnnotationId::MAX);
        assert_ne!(b, AnnotationId::MAX);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = AnnotationStore::from_annotations(seeded_annotations("img"));
        store.clear_dirty();
        let patch = AnnotationPatch {
            notes: Some("x".to_string()),
            ..Default::default()
        };
        assert!(!store.update(999, &patch));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_update_replaces_record() {
        let mut store = AnnotationStore::new();
        let id = store.add(drawn("img", 0.0));
        let patch = AnnotationPatch {
            severity: Some(Severity::High),
            estimated_cost: Some(800.0),
            ..Default::default()
        };
        assert!(store.update(id, &patch));
        let ann = store.get(id).expect("annotation");
        assert_eq!(ann.severity, Severity::High);
        assert_eq!(ann.estimated_cost, 800.0);
        assert_eq!(ann.id, id);

        // Same values again changes nothing
        assert!(!store.update(id, &patch));
    }

    #[test]
    fn test_update_does_not_cascade() {
        let mut store = AnnotationStore::from_annotations(seeded_annotations("img"));
        let before: Vec<_> = store.iter().filter(|a| a.id != 2).cloned().collect();
        store.update(
            2,
            &AnnotationPatch {
                severity: Some(Severity::Low),
                estimated_cost: Some(1.0),
                ..Default::default()
            },
        );
        let after: Vec<_> = store.iter().filter(|a| a.id != 2).cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut store = AnnotationStore::new();
        let a = store.add(drawn("img", 0.0));
        let b = store.add(drawn("img", 30.0));

        store.select(Some(a));
        store.remove(b);
        assert_eq!(store.selected(), Some(a));

        store.remove(a);
        assert_eq!(store.selected(), None);
        assert!(store.remove(a).is_none());
    }

    #[test]
    fn test_select_toggles() {
        let mut store = AnnotationStore::new();
        let a = store.add(drawn("img", 0.0));
        let b = store.add(drawn("img", 30.0));

        store.select(Some(a));
        assert_eq!(store.selected(), Some(a));
        store.select(Some(b));
        assert_eq!(store.selected(), Some(b));
        store.select(Some(b));
        assert_eq!(store.selected(), None);

        store.select(Some(12345));
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_filter_by_image_preserves_order() {
        let mut store = AnnotationStore::new();
        let a = store.add(drawn("front", 0.0));
        store.add(drawn("rear", 10.0));
        let c = store.add(drawn("front", 20.0));

        let ids: Vec<_> = store.filter_by_image("front").map(|a| a.id).collect();
        assert_eq!(ids, vec![a, c]);
        // Restartable
        assert_eq!(store.filter_by_image("front").count(), 2);
        assert_eq!(store.filter_by_image("side").count(), 0);
    }

    #[test]
    fn test_hit_test_prefers_latest() {
        let mut store = AnnotationStore::new();
        store.add(DamageAnnotation::drawn("img", Rect::new(0.0, 0.0, 50.0, 50.0)));
        let top = store.add(DamageAnnotation::drawn("img", Rect::new(20.0, 20.0, 50.0, 50.0)));

        assert_eq!(store.hit_test("img", Point::new(30.0, 30.0)), Some(top));
        assert_eq!(store.hit_test("other", Point::new(30.0, 30.0)), None);
        assert_eq!(store.hit_test("img", Point::new(90.0, 90.0)), None);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut store = AnnotationStore::from_annotations(seeded_annotations("img"));
        let snapshot = store.snapshot();
        store.remove(1);
        assert_eq!(snapshot.len(), 4);
        assert_eq!(store.len(), 3);
    }
}
