//! Interaction controller: turns pointer events into document mutations.
//!
//! DESIGN
//! ======
//! The controller keeps gesture state ([`InputState`]) separate from the
//! document. While a drag or resize is in progress the new geometry lives only
//! in the gesture's `preview`, which the renderer paints in place of the
//! stored box. The document is touched once, at pointer-up, so a gesture is a
//! single undo step and high-frequency pointer moves never churn history.
//!
//! The controller does not own the document; every handler borrows the
//! session's [`DocStore`] for the duration of the event.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::debug;

use crate::config::EngineConfig;
use crate::doc::DocStore;
use crate::element::{Element, ElementId, ElementPatch};
use crate::geometry::{CanvasBounds, Point, Rect, apply_resize_handle, clamp_position};
use crate::hit::{Hit, HitPart, HitSlop, hit_test};
use crate::input::{InputState, Modifiers, Tool};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A new element was added to the document.
    ElementCreated(ElementId),
    /// An element's geometry was committed to the document.
    ElementUpdated { id: ElementId },
    /// The selection changed.
    SelectionChanged,
    /// The host should open its text editor for this element.
    EditTextRequested { id: ElementId },
    /// The host should pick an image and insert it.
    ImageRequested { at: Point },
    /// The gesture's element disappeared; nothing was committed.
    GestureAborted { id: ElementId },
    /// Something visible changed.
    RenderNeeded,
}

/// Pointer gesture state machine for one canvas.
#[derive(Debug, Clone)]
pub struct InteractionController {
    input: InputState,
    canvas: CanvasBounds,
    min_size: f64,
    slop: HitSlop,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl InteractionController {
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            input: InputState::Idle,
            canvas: config.canvas,
            min_size: config.min_element_size,
            slop: HitSlop { padding: config.selection_padding, handle_size: config.handle_size },
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> &InputState {
        &self.input
    }

    /// The in-flight geometry of the element under an active gesture.
    #[must_use]
    pub fn preview(&self) -> Option<(ElementId, Rect)> {
        self.input.preview()
    }

    #[must_use]
    pub fn canvas(&self) -> CanvasBounds {
        self.canvas
    }

    // --- Input events ---

    /// Start a gesture or handle a tap.
    ///
    /// Resize handles of selected elements are checked first, then the padded
    /// bodies of selected elements; anything else is a canvas tap handled by
    /// the active tool. Dropping an unfinished gesture always yields
    /// `RenderNeeded`.
    pub fn on_pointer_down(&mut self, doc: &mut DocStore, pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let dropped = !self.input.is_idle();
        if dropped {
            debug!("pointer down during active gesture; previous gesture dropped");
            self.input = InputState::Idle;
        }

        let mut actions = self.begin(doc, pt, modifiers);
        if dropped && !actions.contains(&Action::RenderNeeded) {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn begin(&mut self, doc: &mut DocStore, pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let hit = hit_test(pt, doc, self.slop);
        match hit {
            Some(Hit { element_id, part: HitPart::ResizeHandle(handle), .. }) => {
                let Some(start) = doc.element(&element_id).map(Element::bounds) else {
                    return Vec::new();
                };
                self.input = InputState::Resizing { id: element_id, handle, start_pointer: pt, start, preview: start };
                vec![Action::RenderNeeded]
            }
            Some(Hit { element_id, part: HitPart::Body, selected: true }) => {
                if modifiers.multi_select {
                    doc.select_element(&element_id, true);
                    return vec![Action::SelectionChanged, Action::RenderNeeded];
                }
                let Some(start) = doc.element(&element_id).map(Element::bounds) else {
                    return Vec::new();
                };
                self.input = InputState::Dragging { id: element_id, start_pointer: pt, start, preview: start };
                Vec::new()
            }
            other => self.on_canvas_tap(doc, pt, other.map(|h| h.element_id), modifiers),
        }
    }

    /// Update the preview of the active gesture.
    pub fn on_pointer_move(&mut self, doc: &DocStore, pt: Point) -> Vec<Action> {
        match self.track(doc, pt) {
            Tracked::Idle | Tracked::Unchanged => Vec::new(),
            Tracked::Changed => vec![Action::RenderNeeded],
            Tracked::Aborted(id) => vec![Action::GestureAborted { id }, Action::RenderNeeded],
        }
    }

    /// Finish the active gesture and commit its geometry as one document update.
    ///
    /// A gesture that ends where it started commits nothing.
    pub fn on_pointer_up(&mut self, doc: &mut DocStore, pt: Point) -> Vec<Action> {
        if let Tracked::Aborted(id) = self.track(doc, pt) {
            return vec![Action::GestureAborted { id }, Action::RenderNeeded];
        }

        let (id, start, preview, patch) = match std::mem::take(&mut self.input) {
            InputState::Idle => return Vec::new(),
            InputState::Dragging { id, start, preview, .. } => {
                (id, start, preview, ElementPatch::position(preview.x, preview.y))
            }
            InputState::Resizing { id, start, preview, .. } => (id, start, preview, ElementPatch::geometry(preview)),
        };

        if preview == start {
            return Vec::new();
        }
        if !doc.update_element(&id, &patch) {
            debug!(%id, "gesture target vanished before commit");
            return vec![Action::GestureAborted { id }, Action::RenderNeeded];
        }
        debug!(%id, x = preview.x, y = preview.y, w = preview.width, h = preview.height, "gesture committed");
        vec![Action::ElementUpdated { id }, Action::RenderNeeded]
    }

    /// Abandon the active gesture without committing.
    pub fn cancel(&mut self) -> Vec<Action> {
        if self.input.is_idle() {
            return Vec::new();
        }
        self.input = InputState::Idle;
        vec![Action::RenderNeeded]
    }

    // --- Internals ---

    fn on_canvas_tap(
        &mut self,
        doc: &mut DocStore,
        pt: Point,
        hit: Option<ElementId>,
        modifiers: Modifiers,
    ) -> Vec<Action> {
        let tool = doc.active_tool();
        if let Some(kind) = tool.shape_kind() {
            let mut element = Element::default_shape(kind, pt, self.min_size);
            element.set_bounds(clamp_position(element.bounds(), self.canvas));
            let id = doc.add_element(element);
            doc.set_active_tool(Tool::Select);
            return vec![Action::ElementCreated(id), Action::RenderNeeded];
        }

        match tool {
            Tool::Text => {
                let mut element = Element::default_text(pt);
                element.set_bounds(clamp_position(element.bounds(), self.canvas));
                let id = doc.add_element(element);
                doc.set_active_tool(Tool::Select);
                vec![Action::ElementCreated(id), Action::EditTextRequested { id }, Action::RenderNeeded]
            }
            Tool::Image => vec![Action::ImageRequested { at: pt }],
            _ => {
                if let Some(id) = hit {
                    doc.select_element(&id, modifiers.multi_select);
                    vec![Action::SelectionChanged, Action::RenderNeeded]
                } else if !doc.selection().is_empty() {
                    doc.clear_selection();
                    vec![Action::SelectionChanged, Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Move the active gesture's preview to follow `pt`.
    fn track(&mut self, doc: &DocStore, pt: Point) -> Tracked {
        let (canvas, min_size) = (self.canvas, self.min_size);
        let (id, next, current) = match &mut self.input {
            InputState::Idle => return Tracked::Idle,
            InputState::Dragging { id, start_pointer, start, preview } => {
                let (dx, dy) = pt.delta_from(*start_pointer);
                (*id, clamp_position(start.translate(dx, dy), canvas), preview)
            }
            InputState::Resizing { id, handle, start_pointer, start, preview } => {
                let (dx, dy) = pt.delta_from(*start_pointer);
                (*id, apply_resize_handle(*handle, *start, dx, dy, canvas, min_size), preview)
            }
        };

        if !doc.contains(&id) {
            debug!(%id, "gesture target deleted; aborting");
            self.input = InputState::Idle;
            return Tracked::Aborted(id);
        }
        if *current == next {
            return Tracked::Unchanged;
        }
        *current = next;
        Tracked::Changed
    }
}

/// Outcome of following the pointer during a gesture.
enum Tracked {
    Idle,
    Unchanged,
    Changed,
    Aborted(ElementId),
}
