//! Geometry primitives and the pure functions that keep element boxes valid.
//!
//! Everything here is expressed in canvas coordinates: origin at the top-left
//! corner of the drawing surface, x growing right, y growing down. The two
//! functions the rest of the crate leans on are [`clamp_position`], which
//! slides a box back inside the canvas, and [`apply_resize_handle`], which
//! turns a handle drag into a new box with the opposite side held fixed.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A point in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `origin` to `self`.
    #[must_use]
    pub fn delta_from(self, origin: Point) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }
}

/// Axis-aligned bounding box of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// A box of the given size centred on `center`.
    #[must_use]
    pub fn centered_at(center: Point, width: f64, height: f64) -> Self {
        Self { x: center.x - width / 2.0, y: center.y - height / 2.0, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.right() && pt.y >= self.y && pt.y <= self.bottom()
    }

    /// Grow the box by `margin` on every side.
    #[must_use]
    pub fn inflate(&self, margin: f64) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }

    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy, ..*self }
    }

    /// Whether the box lies entirely within `canvas`.
    #[must_use]
    pub fn is_within(&self, canvas: CanvasBounds) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= canvas.width && self.bottom() <= canvas.height
    }
}

/// Size of the drawing surface. The canvas spans `[0, width] × [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasBounds {
    pub width: f64,
    pub height: f64,
}

impl CanvasBounds {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for CanvasBounds {
    fn default() -> Self {
        Self { width: crate::consts::DEFAULT_CANVAS_WIDTH, height: crate::consts::DEFAULT_CANVAS_HEIGHT }
    }
}

/// One of the eight resize handles drawn around a selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl ResizeHandle {
    /// Every handle, corners before edges so corner hits win where they overlap.
    pub const ALL: [ResizeHandle; 8] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomRight,
        Self::BottomLeft,
        Self::Top,
        Self::Right,
        Self::Bottom,
        Self::Left,
    ];

    /// Whether dragging this handle moves the left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::Left | Self::BottomLeft)
    }

    /// Whether dragging this handle moves the right edge.
    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::TopRight | Self::Right | Self::BottomRight)
    }

    /// Whether dragging this handle moves the top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::Top | Self::TopRight)
    }

    /// Whether dragging this handle moves the bottom edge.
    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::BottomLeft | Self::Bottom | Self::BottomRight)
    }

    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight | Self::BottomRight | Self::BottomLeft)
    }

    /// Where the handle sits on `rect`: a corner, or the midpoint of an edge.
    #[must_use]
    pub fn position(self, rect: &Rect) -> Point {
        let cx = rect.x + rect.width / 2.0;
        let cy = rect.y + rect.height / 2.0;
        match self {
            Self::TopLeft => Point::new(rect.x, rect.y),
            Self::Top => Point::new(cx, rect.y),
            Self::TopRight => Point::new(rect.right(), rect.y),
            Self::Right => Point::new(rect.right(), cy),
            Self::BottomRight => Point::new(rect.right(), rect.bottom()),
            Self::Bottom => Point::new(cx, rect.bottom()),
            Self::BottomLeft => Point::new(rect.x, rect.bottom()),
            Self::Left => Point::new(rect.x, cy),
        }
    }
}

/// Slide `rect` so it lies fully inside `canvas`, keeping its size.
///
/// A box wider or taller than the canvas is pinned to the top-left edge on
/// that axis.
#[must_use]
pub fn clamp_position(rect: Rect, canvas: CanvasBounds) -> Rect {
    Rect {
        x: rect.x.min(canvas.width - rect.width).max(0.0),
        y: rect.y.min(canvas.height - rect.height).max(0.0),
        ..rect
    }
}

/// Resize `start` by dragging `handle` a cumulative `(dx, dy)`.
///
/// The edges opposite the handle stay where they were. Dragged edges are
/// clamped to the canvas, then each dimension is floored at `min_size`. When
/// the floor cannot be met without moving the fixed edge, the floor wins and
/// the box is slid back inside the canvas.
#[must_use]
pub fn apply_resize_handle(
    handle: ResizeHandle,
    start: Rect,
    dx: f64,
    dy: f64,
    canvas: CanvasBounds,
    min_size: f64,
) -> Rect {
    let mut left = start.x;
    let mut top = start.y;
    let mut right = start.right();
    let mut bottom = start.bottom();

    if handle.moves_left() {
        left = (left + dx).clamp(0.0, canvas.width);
    }
    if handle.moves_right() {
        right = (right + dx).clamp(0.0, canvas.width);
    }
    if handle.moves_top() {
        top = (top + dy).clamp(0.0, canvas.height);
    }
    if handle.moves_bottom() {
        bottom = (bottom + dy).clamp(0.0, canvas.height);
    }

    if right - left < min_size {
        if handle.moves_left() {
            left = right - min_size;
        } else {
            right = left + min_size;
        }
    }
    if bottom - top < min_size {
        if handle.moves_top() {
            top = bottom - min_size;
        } else {
            bottom = top + min_size;
        }
    }

    clamp_position(Rect::new(left, top, right - left, bottom - top), canvas)
}
