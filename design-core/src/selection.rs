//! Single-element selection.

use serde::{Deserialize, Serialize};

use crate::{ElementId, ElementStore};

/// Tracks at most one selected element.
///
/// Every selection change goes through [`Selection::select`], which refuses
/// unknown and locked elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    selected: Option<ElementId>,
}

impl Selection {
    /// Request a selection change. Returns the resulting selection.
    ///
    /// `None`, an unknown id and a locked element all clear the selection.
    pub fn select(&mut self, id: Option<ElementId>, store: &ElementStore) -> Option<ElementId> {
        self.selected = id.filter(|id| match store.get(*id) {
            Some(element) if !element.is_locked => true,
            Some(_) => {
                tracing::debug!("Refusing to select locked element {id}");
                false
            }
            None => {
                tracing::debug!("Refusing to select unknown element {id}");
                false
            }
        });
        self.selected
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// The selected id, if any.
    #[must_use]
    pub const fn get(&self) -> Option<ElementId> {
        self.selected
    }

    /// Check whether `id` is the selected element.
    #[must_use]
    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected == Some(id)
    }

    /// Check whether nothing is selected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.selected.is_none()
    }

    /// Drop the selection if it no longer resolves to an unlocked element.
    ///
    /// Returns `true` if the selection was cleared.
    pub fn revalidate(&mut self, store: &ElementStore) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        if store.get(id).is_some_and(|e| !e.is_locked) {
            return false;
        }
        self.selected = None;
        true
    }
}
