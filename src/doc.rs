//! Document store: the element sequence, selection, and undo history of one design.
//!
//! DESIGN
//! ======
//! `DocStore` is the only thing that mutates a design. Content operations
//! (add, update, delete, move, resize, reorder) change the element sequence
//! and record a snapshot in [`History`]; view state (selection, background,
//! active tool, design name) changes without touching history. Every change
//! bumps a revision counter published on a `watch` channel so a renderer can
//! repaint without polling.
//!
//! Geometry passed to `update_element` and `move_element` is applied as-is:
//! keeping boxes inside the canvas is the interaction controller's job.
//!
//! ERROR HANDLING
//! ==============
//! Operations on an id that is not in the document are silent no-ops that
//! return `false` and record nothing.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::consts::{DEFAULT_BACKGROUND, DEFAULT_DESIGN_NAME};
use crate::element::{Element, ElementId, ElementPatch};
use crate::history::{History, Snapshot};
use crate::input::Tool;
use crate::selection::Selection;
use crate::services::persistence::SavedDesign;

/// In-memory state of the design being edited.
pub struct DocStore {
    elements: Vec<Element>,
    selection: Selection,
    background_color: String,
    active_tool: Tool,
    design_name: String,
    history: History,
    min_size: f64,
    changes: watch::Sender<u64>,
}

impl DocStore {
    /// Create an empty document with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Create an empty document using the size floor and history limit from `config`.
    #[must_use]
    pub fn with_config(config: &EngineConfig) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            elements: Vec::new(),
            selection: Selection::new(),
            background_color: DEFAULT_BACKGROUND.to_owned(),
            active_tool: Tool::default(),
            design_name: DEFAULT_DESIGN_NAME.to_owned(),
            history: History::with_limit(Vec::new(), config.history_limit),
            min_size: config.min_element_size,
            changes,
        }
    }

    // --- Content mutations (undo-tracked) ---

    /// Append `element` on top of the stack and make it the sole selection.
    ///
    /// An element whose id already exists in the document is given a fresh id.
    pub fn add_element(&mut self, mut element: Element) -> ElementId {
        if self.contains(&element.id) {
            let fresh = Uuid::new_v4();
            warn!(duplicate = %element.id, %fresh, "element id already in document; reassigned");
            element.id = fresh;
        }
        let id = element.id;
        debug!(%id, kind = element.body.type_name(), "element added");
        self.elements.push(element);
        self.selection.select_only(id);
        self.sync_selected_flags();
        self.commit();
        id
    }

    /// Merge `patch` into the element with `id`.
    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        let Some(element) = self.element_mut(id) else {
            return false;
        };
        patch.apply_to(element);
        self.commit();
        true
    }

    /// Remove the element with `id` and drop it from the selection.
    pub fn delete_element(&mut self, id: &ElementId) -> bool {
        let before = self.elements.len();
        self.elements.retain(|el| el.id != *id);
        if self.elements.len() == before {
            return false;
        }
        debug!(%id, "element deleted");
        self.selection.remove(id);
        self.commit();
        true
    }

    /// Remove every selected element. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        let before = self.elements.len();
        let selection = &self.selection;
        self.elements.retain(|el| !selection.contains(&el.id));
        let removed = before - self.elements.len();
        self.selection.clear();
        debug!(removed, "selected elements deleted");
        self.commit();
        removed
    }

    /// Translate an element by `(dx, dy)`.
    pub fn move_element(&mut self, id: &ElementId, dx: f64, dy: f64) -> bool {
        let Some(element) = self.element_mut(id) else {
            return false;
        };
        element.x += dx;
        element.y += dy;
        self.commit();
        true
    }

    /// Set an element's size, floored at the minimum element size.
    pub fn resize_element(&mut self, id: &ElementId, width: f64, height: f64) -> bool {
        let min = self.min_size;
        let Some(element) = self.element_mut(id) else {
            return false;
        };
        element.width = width.max(min);
        element.height = height.max(min);
        self.commit();
        true
    }

    /// Move an element to the top of the paint order.
    pub fn reorder_to_front(&mut self, id: &ElementId) -> bool {
        let last = self.elements.len().saturating_sub(1);
        self.reorder(id, |_| last)
    }

    /// Move an element to the bottom of the paint order.
    pub fn reorder_to_back(&mut self, id: &ElementId) -> bool {
        self.reorder(id, |_| 0)
    }

    /// Move an element one step toward the top.
    pub fn reorder_up(&mut self, id: &ElementId) -> bool {
        let last = self.elements.len().saturating_sub(1);
        self.reorder(id, |index| (index + 1).min(last))
    }

    /// Move an element one step toward the bottom.
    pub fn reorder_down(&mut self, id: &ElementId) -> bool {
        self.reorder(id, |index| index.saturating_sub(1))
    }

    fn reorder<F>(&mut self, id: &ElementId, target: F) -> bool
    where
        F: FnOnce(usize) -> usize,
    {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let to = target(index);
        if to == index {
            return false;
        }
        let element = self.elements.remove(index);
        self.elements.insert(to, element);
        debug!(%id, from = index, to, "element reordered");
        self.commit();
        true
    }

    // --- History ---

    /// Restore the previous snapshot. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.elements = snapshot.clone();
        debug!(past = self.history.past_len(), future = self.history.future_len(), "undo");
        self.restore_selection();
        true
    }

    /// Re-apply the next snapshot. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.elements = snapshot.clone();
        debug!(past = self.history.past_len(), future = self.history.future_len(), "redo");
        self.restore_selection();
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Selection (not undo-tracked) ---

    /// Select `id`. With `multi_select` the id's membership is toggled;
    /// otherwise it replaces the selection. Unknown ids are ignored.
    pub fn select_element(&mut self, id: &ElementId, multi_select: bool) -> bool {
        if !self.contains(id) {
            return false;
        }
        if multi_select {
            self.selection.toggle(*id);
        } else {
            self.selection.select_only(*id);
        }
        self.sync_selected_flags();
        self.notify();
        true
    }

    pub fn clear_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.selection.clear();
        self.sync_selected_flags();
        self.notify();
    }

    // --- View state (not undo-tracked) ---

    pub fn set_background_color(&mut self, color: impl Into<String>) {
        self.background_color = color.into();
        self.notify();
    }

    pub fn set_active_tool(&mut self, tool: Tool) {
        if self.active_tool != tool {
            self.active_tool = tool;
            self.notify();
        }
    }

    pub fn set_design_name(&mut self, name: impl Into<String>) {
        self.design_name = name.into();
        self.notify();
    }

    /// Reset the design name to the default.
    pub fn clear_design_name(&mut self) {
        self.set_design_name(DEFAULT_DESIGN_NAME);
    }

    // --- Whole-document operations ---

    /// Empty the document for a new design: no elements, no selection,
    /// default background, fresh history.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.selection.clear();
        self.background_color = DEFAULT_BACKGROUND.to_owned();
        self.history.reset(Vec::new());
        debug!("document cleared");
        self.notify();
    }

    /// Replace the document with a saved design. Selection is cleared and
    /// history restarts from the loaded elements.
    pub fn load_design(&mut self, design: SavedDesign) {
        let mut elements = design.elements;
        for el in &mut elements {
            el.selected = false;
        }
        let mut seen = std::collections::HashSet::with_capacity(elements.len());
        for el in &mut elements {
            if !seen.insert(el.id) {
                let fresh = Uuid::new_v4();
                warn!(duplicate = %el.id, %fresh, "duplicate element id in saved design; reassigned");
                el.id = fresh;
                seen.insert(fresh);
            }
        }
        debug!(count = elements.len(), "design loaded into document");
        self.history.reset(elements.clone());
        self.elements = elements;
        self.background_color = design.canvas_background_color;
        self.selection.clear();
        self.notify();
    }

    /// Capture the saveable part of the document: elements (selection flags
    /// cleared) and background color, stamped with the current time.
    #[must_use]
    pub fn to_saved(&self) -> SavedDesign {
        SavedDesign::new(self.content_snapshot(), self.background_color.clone())
    }

    // --- Queries ---

    /// Elements in paint order, bottom first.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == *id)
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.index_of(id).is_some()
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected elements in selection order.
    #[must_use]
    pub fn selected_elements(&self) -> Vec<&Element> {
        self.selection.ids().iter().filter_map(|id| self.element(id)).collect()
    }

    #[must_use]
    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    #[must_use]
    pub fn active_tool(&self) -> Tool {
        self.active_tool
    }

    #[must_use]
    pub fn design_name(&self) -> &str {
        &self.design_name
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Current change revision; increases on every visible change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.changes.borrow()
    }

    /// Subscribe to change notifications. The receiver observes the latest revision.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    // --- Internals ---

    fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|el| el.id == *id)
    }

    fn element_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| el.id == *id)
    }

    /// Elements with selection flags cleared; the unit stored in history and on disk.
    fn content_snapshot(&self) -> Snapshot {
        self.elements
            .iter()
            .map(|el| Element { selected: false, ..el.clone() })
            .collect()
    }

    fn sync_selected_flags(&mut self) {
        for el in &mut self.elements {
            el.selected = self.selection.contains(&el.id);
        }
    }

    /// After elements were swapped for a history snapshot, drop selected ids
    /// that no longer exist and re-mark the survivors.
    fn restore_selection(&mut self) {
        let elements = &self.elements;
        self.selection.retain(|id| elements.iter().any(|el| el.id == *id));
        self.sync_selected_flags();
        self.notify();
    }

    /// Record the current elements in history and notify subscribers.
    fn commit(&mut self) {
        let snapshot = self.content_snapshot();
        self.history.record(snapshot);
        self.notify();
    }

    fn notify(&self) {
        self.changes.send_modify(|rev| *rev += 1);
    }
}

impl Default for DocStore {
    fn default() -> Self {
        Self::new()
    }
}
