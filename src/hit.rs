#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::TEXT_WIDTH_FACTOR;
use crate::doc::DocStore;
use crate::element::{Element, ElementBody, ElementId};
use crate::geometry::{Point, Rect, ResizeHandle};

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeHandle),
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub element_id: ElementId,
    pub part: HitPart,
    /// Whether the element was selected when it was hit.
    pub selected: bool,
}

/// Hit-test tolerances.
#[derive(Debug, Clone, Copy)]
pub struct HitSlop {
    /// Margin around bodies.
    pub padding: f64,
    /// Half-extent of handle hit boxes.
    pub handle_size: f64,
}

/// The area around `handle` that grabs it.
///
/// Corners get a square centred on the corner; edges get a strip along the
/// whole edge, between the corners.
#[must_use]
pub fn handle_hit_box(handle: ResizeHandle, rect: &Rect, size: f64) -> Rect {
    let span = size * 2.0;
    match handle {
        ResizeHandle::Top => Rect::new(rect.x, rect.y - size, rect.width, span),
        ResizeHandle::Bottom => Rect::new(rect.x, rect.bottom() - size, rect.width, span),
        ResizeHandle::Left => Rect::new(rect.x - size, rect.y, span, rect.height),
        ResizeHandle::Right => Rect::new(rect.right() - size, rect.y, span, rect.height),
        corner => {
            let at = corner.position(rect);
            Rect::new(at.x - size, at.y - size, span, span)
        }
    }
}

/// The handle of `rect` under `pt`, corners taking priority over edges.
#[must_use]
pub fn handle_at(pt: Point, rect: &Rect, size: f64) -> Option<ResizeHandle> {
    ResizeHandle::ALL
        .into_iter()
        .find(|&handle| handle_hit_box(handle, rect, size).contains(pt))
}

/// The tappable box of an element before padding.
///
/// Text boxes are widened to the estimated rendered width of their content,
/// since a short stored box would otherwise make long text hard to grab.
#[must_use]
pub fn body_box(element: &Element) -> Rect {
    let bounds = element.bounds();
    match &element.body {
        ElementBody::Text(text) => {
            #[allow(clippy::cast_precision_loss)]
            let chars = text.content.chars().count().max(1) as f64;
            let estimated = text.font_size * TEXT_WIDTH_FACTOR * chars;
            Rect { width: bounds.width.max(estimated), height: bounds.height.max(text.font_size), ..bounds }
        }
        _ => bounds,
    }
}

/// Test which element (if any) is under `pt`.
///
/// Priority: resize handles of selected elements, then padded bodies of
/// selected elements, then the topmost padded body of any element.
#[must_use]
pub fn hit_test(pt: Point, doc: &DocStore, slop: HitSlop) -> Option<Hit> {
    let selected: Vec<&Element> = doc
        .elements()
        .iter()
        .rev()
        .filter(|el| doc.selection().contains(&el.id))
        .collect();

    for el in &selected {
        if let Some(handle) = handle_at(pt, &el.bounds(), slop.handle_size) {
            return Some(Hit { element_id: el.id, part: HitPart::ResizeHandle(handle), selected: true });
        }
    }

    for el in &selected {
        if body_box(el).inflate(slop.padding).contains(pt) {
            return Some(Hit { element_id: el.id, part: HitPart::Body, selected: true });
        }
    }

    topmost_at(pt, doc, slop.padding).map(|el| Hit { element_id: el.id, part: HitPart::Body, selected: false })
}

/// The topmost element whose padded body contains `pt`.
#[must_use]
pub fn topmost_at<'a>(pt: Point, doc: &'a DocStore, padding: f64) -> Option<&'a Element> {
    doc.elements()
        .iter()
        .rev()
        .find(|el| body_box(el).inflate(padding).contains(pt))
}
