//! Input model: tools, pointer modifiers, and the gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `InputState` is the gesture being tracked between pointer-down and
//! pointer-up; each active variant carries the starting geometry and the
//! transient preview the renderer draws until the gesture is committed.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::element::{ElementId, ShapeKind};
use crate::geometry::{Point, Rect, ResizeHandle};

/// Which toolbox tool is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Select, drag, and resize existing elements (default).
    #[default]
    Select,
    Rectangle,
    Circle,
    Ellipse,
    Triangle,
    Line,
    Star,
    /// Place a text block.
    Text,
    /// Ask the host for an image to insert.
    Image,
}

impl Tool {
    /// The shape this tool creates, if it is a shape tool.
    #[must_use]
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Self::Rectangle => Some(ShapeKind::Rectangle),
            Self::Circle => Some(ShapeKind::Circle),
            Self::Ellipse => Some(ShapeKind::Ellipse),
            Self::Triangle => Some(ShapeKind::Triangle),
            Self::Line => Some(ShapeKind::Line),
            Self::Star => Some(ShapeKind::Star),
            Self::Select | Self::Text | Self::Image => None,
        }
    }

    /// Whether tapping the canvas with this tool creates an element.
    #[must_use]
    pub fn creates_element(self) -> bool {
        self.shape_kind().is_some() || self == Self::Text
    }
}

impl From<ShapeKind> for Tool {
    fn from(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Rectangle => Self::Rectangle,
            ShapeKind::Circle => Self::Circle,
            ShapeKind::Ellipse => Self::Ellipse,
            ShapeKind::Triangle => Self::Triangle,
            ShapeKind::Line => Self::Line,
            ShapeKind::Star => Self::Star,
        }
    }
}

/// Modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Toggle membership instead of replacing the selection.
    pub multi_select: bool,
}

/// Internal state for the gesture state machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A selected element is being moved.
    Dragging {
        /// Element being dragged.
        id: ElementId,
        /// Pointer position at pointer-down.
        start_pointer: Point,
        /// Element box at pointer-down.
        start: Rect,
        /// Clamped box under the pointer right now; not yet in the document.
        preview: Rect,
    },
    /// A selected element is being resized by one of its handles.
    Resizing {
        /// Element being resized.
        id: ElementId,
        /// Handle grabbed at pointer-down.
        handle: ResizeHandle,
        /// Pointer position at pointer-down.
        start_pointer: Point,
        /// Element box at pointer-down.
        start: Rect,
        /// Resized box under the pointer right now; not yet in the document.
        preview: Rect,
    },
}

impl InputState {
    /// The element and box being previewed by an active gesture.
    #[must_use]
    pub fn preview(&self) -> Option<(ElementId, Rect)> {
        match self {
            Self::Idle => None,
            Self::Dragging { id, preview, .. } | Self::Resizing { id, preview, .. } => Some((*id, *preview)),
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
