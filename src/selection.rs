//! Ordered set of selected element ids.
//!
//! Insertion order is kept so "the first selected element" is well defined
//! (inserting an image over a shape uses it). The selection only references
//! elements; `DocStore` prunes it whenever elements disappear.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::element::ElementId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with exactly `id`.
    pub fn select_only(&mut self, id: ElementId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Add `id` if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, id: ElementId) -> bool {
        if self.remove(&id) {
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    /// Remove `id`. Returns `true` if it was selected.
    pub fn remove(&mut self, id: &ElementId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|sel| sel != id);
        self.ids.len() != before
    }

    /// Keep only ids for which `keep` returns true.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&ElementId) -> bool,
    {
        self.ids.retain(keep);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.ids.contains(id)
    }

    /// The earliest-selected id still in the set.
    #[must_use]
    pub fn first(&self) -> Option<ElementId> {
        self.ids.first().copied()
    }

    #[must_use]
    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
