//! Ordered element storage.
//!
//! The sequence order of [`ElementStore`] is the z-order: a later index is
//! drawn on top of an earlier one. Layer lists consume it reversed, so the
//! top of a list is the last element.

use serde::{Deserialize, Serialize};

use crate::{Element, ElementDraft, ElementId, ElementPatch};

/// Drop position reported by a layers list drag.
///
/// The labels are relative to the *list*, which is drawn reversed, so they
/// act inverted on the stored sequence. See [`ElementStore::reorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderPosition {
    /// Dropped before the target row.
    Before,
    /// Dropped after the target row.
    After,
}

/// Ordered collection of elements, owning the z-order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementStore {
    elements: Vec<Element>,
}

impl ElementStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element on top of the z-order and return its new id.
    ///
    /// Baseline defaults are applied to every base flag and shape field the
    /// draft leaves unset.
    pub fn create(&mut self, draft: ElementDraft) -> ElementId {
        let id = ElementId::new();
        let element = draft.into_element(id);
        tracing::debug!(
            "Created {:?} element {id} at ({}, {}) {}x{}",
            element.element_type(),
            element.x,
            element.y,
            element.width,
            element.height
        );
        self.elements.push(element);
        id
    }

    /// Merge a partial update into the element with this id.
    ///
    /// Returns `false` (and does nothing) if the id is unknown.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        match self.get_mut(id) {
            Some(element) => {
                element.apply(patch);
                true
            }
            None => {
                tracing::debug!("Update ignored, element not found: {id}");
                false
            }
        }
    }

    /// Flip visibility. Returns the new value, or `None` if the id is unknown.
    pub fn toggle_visibility(&mut self, id: ElementId) -> Option<bool> {
        let element = self.get_mut(id)?;
        element.is_visible = !element.is_visible;
        Some(element.is_visible)
    }

    /// Flip the lock. Returns the new value, or `None` if the id is unknown.
    pub fn toggle_lock(&mut self, id: ElementId) -> Option<bool> {
        let element = self.get_mut(id)?;
        element.is_locked = !element.is_locked;
        Some(element.is_locked)
    }

    /// Move `dragged` relative to `target`.
    ///
    /// The dragged element is taken out of the sequence and reinserted:
    ///
    /// | target      | position | reinserted at                 |
    /// |-------------|----------|-------------------------------|
    /// | `None`      | `Before` | end (top of z-order)          |
    /// | `None`      | `After`  | start (bottom of z-order)     |
    /// | found at i  | `Before` | i + 1 (just after the target) |
    /// | found at i  | `After`  | i (just before the target)    |
    /// | not found   | either   | its original index            |
    ///
    /// An unknown `dragged` id leaves the store untouched.
    pub fn reorder(
        &mut self,
        dragged: ElementId,
        target: Option<ElementId>,
        position: ReorderPosition,
    ) {
        let Some(dragged_index) = self.index_of(dragged) else {
            tracing::debug!("Reorder ignored, dragged element not found: {dragged}");
            return;
        };
        let item = self.elements.remove(dragged_index);

        let Some(target) = target else {
            match position {
                ReorderPosition::Before => self.elements.push(item),
                ReorderPosition::After => self.elements.insert(0, item),
            }
            return;
        };

        match self.index_of(target) {
            Some(target_index) => match position {
                ReorderPosition::Before => self.elements.insert(target_index + 1, item),
                ReorderPosition::After => self.elements.insert(target_index, item),
            },
            None => {
                tracing::debug!("Reorder target not found: {target}");
                self.elements.insert(dragged_index, item);
            }
        }
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Position of an element in z-order.
    #[must_use]
    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    /// Check whether an id resolves.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    /// All elements in z-order (bottom first).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.elements.iter()
    }

    /// All elements as a slice in z-order.
    #[must_use]
    pub fn as_slice(&self) -> &[Element] {
        &self.elements
    }

    /// Elements in layers-list order (top of z-order first).
    pub fn layers(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().rev()
    }

    /// Ids in z-order.
    #[must_use]
    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(|e| e.id).collect()
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Remove every element (new project).
    pub fn clear(&mut self) {
        self.elements.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementKind, ElementType};

    fn circle() -> ElementDraft {
        ElementDraft::new(
            ElementKind::Circle {
                background_color: "#ff0000".to_string(),
                stroke_color: None,
                stroke_width: None,
            },
            0.0,
            0.0,
            40.0,
            40.0,
        )
    }

    fn store_with(n: usize) -> (ElementStore, Vec<ElementId>) {
        let mut store = ElementStore::new();
        let ids = (0..n).map(|_| store.create(circle())).collect();
        (store, ids)
    }

    #[test]
    fn test_create_appends_on_top() {
        let (store, ids) = store_with(3);
        assert_eq!(store.ids(), ids);
        assert_eq!(store.iter().last().map(|e| e.id), Some(ids[2]));
        assert_eq!(store.layers().next().map(|e| e.id), Some(ids[2]));
    }

    #[test]
    fn test_ids_are_unique() {
        let (store, ids) = store_with(50);
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), store.len());
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let (mut store, _) = store_with(1);
        let before = store.as_slice().to_vec();
        assert!(!store.update(ElementId::new(), &ElementPatch::position(5.0, 5.0)));
        assert_eq!(store.as_slice(), before.as_slice());
    }

    #[test]
    fn test_update_merges_fields() {
        let (mut store, ids) = store_with(1);
        assert!(store.update(ids[0], &ElementPatch::position(12.0, 34.0)));
        let element = store.get(ids[0]).expect("element exists");
        assert!((element.x - 12.0).abs() < f32::EPSILON);
        assert!((element.y - 34.0).abs() < f32::EPSILON);
        assert_eq!(element.element_type(), ElementType::Circle);
    }

    #[test]
    fn test_toggles() {
        let (mut store, ids) = store_with(1);
        assert_eq!(store.toggle_visibility(ids[0]), Some(false));
        assert_eq!(store.toggle_visibility(ids[0]), Some(true));
        assert_eq!(store.toggle_lock(ids[0]), Some(true));
        assert_eq!(store.toggle_lock(ElementId::new()), None);
    }

    #[test]
    fn test_reorder_without_target() {
        let (mut store, ids) = store_with(3);
        store.reorder(ids[0], None, ReorderPosition::Before);
        assert_eq!(store.ids(), vec![ids[1], ids[2], ids[0]]);

        store.reorder(ids[0], None, ReorderPosition::After);
        assert_eq!(store.ids(), vec![ids[0], ids[1], ids[2]]);
    }

    #[test]
    fn test_reorder_with_target() {
        let (mut store, ids) = store_with(2);
        let (a, b) = (ids[0], ids[1]);

        store.reorder(b, Some(a), ReorderPosition::Before);
        assert_eq!(store.ids(), vec![a, b]);

        store.reorder(b, Some(a), ReorderPosition::After);
        assert_eq!(store.ids(), vec![b, a]);
    }

    #[test]
    fn test_reorder_middle_target() {
        let (mut store, ids) = store_with(4);
        store.reorder(ids[3], Some(ids[1]), ReorderPosition::Before);
        assert_eq!(store.ids(), vec![ids[0], ids[1], ids[3], ids[2]]);
    }

    #[test]
    fn test_reorder_missing_target_keeps_order() {
        let (mut store, ids) = store_with(3);
        store.reorder(ids[1], Some(ElementId::new()), ReorderPosition::Before);
        assert_eq!(store.ids(), ids);
    }

    #[test]
    fn test_reorder_missing_dragged_is_noop() {
        let (mut store, ids) = store_with(3);
        store.reorder(ElementId::new(), None, ReorderPosition::After);
        assert_eq!(store.ids(), ids);
    }

    #[test]
    fn test_clear() {
        let (mut store, _) = store_with(2);
        store.clear();
        assert!(store.is_empty());
    }
}
