#![allow(clippy::float_cmp)]

use super::*;
use crate::element::{ElementBody, ShapeKind};
use crate::geometry::ResizeHandle;

// =============================================================
// Helpers
// =============================================================

fn setup() -> (InteractionController, DocStore) {
    (InteractionController::default(), DocStore::new())
}

fn add_rect(doc: &mut DocStore, x: f64, y: f64, w: f64, h: f64) -> ElementId {
    doc.add_element(Element::shape(ShapeKind::Rectangle, Rect::new(x, y, w, h), "#FF6B6B"))
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn no_modifiers() -> Modifiers {
    Modifiers::default()
}

fn multi() -> Modifiers {
    Modifiers { multi_select: true }
}

fn bounds(doc: &DocStore, id: &ElementId) -> Rect {
    doc.element(id).unwrap().bounds()
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

// =============================================================
// Resizing
// =============================================================

#[test]
fn bottom_right_resize_scenario() {
    let (mut ctl, mut doc) = setup();
    let id = add_rect(&mut doc, 50.0, 50.0, 100.0, 50.0);

    ctl.on_pointer_down(&mut doc, pt(150.0, 100.0), no_modifiers());
    assert!(matches!(ctl.state(), InputState::Resizing { handle: ResizeHandle::BottomRight, .. }));
    ctl.on_pointer_move(&doc, pt(170.0, 110.0));
    let actions = ctl.on_pointer_up(&mut doc, pt(170.0, 110.0));

    assert_eq!(bounds(&doc, &id), Rect::new(50.0, 50.0, 120.0, 60.0));
    assert!(has_action(&actions, |a| *a == Action::ElementUpdated { id }));
    assert!(ctl.state().is_idle());
}

#[test]
fn resize_previews_without_touching_document() {
    let (mut ctl, mut doc) = setup();
    let id = add_rect(&mut doc, 50.0, 50.0, 100.0, 50.0);

    ctl.on_pointer_down(&mut doc, pt(150.0, 100.0), no_modifiers());
    let actions = ctl.on_pointer_move(&doc, pt(200.0, 150.0));

    assert!(has_action(&actions, |a| matches!(a, Action::RenderNeeded)));
    assert_eq!(ctl.preview(), Some((id, Rect::new(50.0, 50.0, 150.0, 100.0))));
    assert_eq!(bounds(&doc, &id), Rect::new(50.0, 50.0, 100.0, 50.0));
}

#[test]
fn resize_gesture_is_one_history_step() {
    let (mut ctl, mut doc) = setup();
    let id = add_rect(&mut doc, 50.0, 50.0, 100.0, 50.0);
    let before = doc.history().past_len();

    ctl.on_pointer_down(&mut doc, pt(150.0, 100.0), no_modifiers());
    for step in 1..=20 {
        ctl.on_pointer_move(&doc, pt(150.0 + f64::from(step), 100.0 + f64::from(step)));
    }
    ctl.on_pointer_up(&mut doc, pt(170.0, 120.0));

    assert_eq!(doc.history().past_len(), before + 1);
    assert!(doc.undo());
    assert_eq!(bounds(&doc, &id), Rect::new(50.0, 50.0, 100.0, 50.0));
}

#[test]
fn top_left_resize_keeps_opposite_corner() {
    let (mut ctl, mut doc) = setup();
    let id = add_rect(&mut doc, 50.0, 50.0, 100.0, 50.0);

    ctl.on_pointer_down(&mut doc, pt(50.0, 50.0), no_modifiers());
    ctl.on_pointer_up(&mut doc, pt(40.0, 30.0));

    assert_eq!(bounds(&doc, &id), Rect::new(40.0, 30.0, 110.0, 70.0));
}

#[test]
fn resize_is_floored_and_clamped() {
    let (mut ctl, mut doc) = setup();
    let id = add_rect(&mut doc, 300.0, 500.0, 50.0, 50.0);

    ctl.on_pointer_down(&mut doc, pt(350.0, 550.0), no_modifiers());
    ctl.on_pointer_up(&mut doc, pt(1000.0, 1000.0));
    let r = bounds(&doc, &id);
    assert_eq!(r, Rect::new(300.0, 500.0, 90.0, 90.0));

    ctl.on_pointer_down(&mut doc, pt(390.0, 590.0), no_modifiers());
    ctl.on_pointer_up(&mut doc, pt(-500.0, -500.0));
    let r = bounds(&doc, &id);
    assert_eq!((r.width, r.height), (10.0, 10.0));
    assert!(r.is_within(ctl.canvas()));
}

// =============================================================
// Dragging
// =============================================================

#[test]
fn drag_selected_body_moves_on_release() {
    let (mut ctl, mut doc) = setup();
    let id = add_rect(&mut doc, 50.0, 50.0, 100.0, 50.0);

    let down = ctl.on_pointer_down(&mut doc, pt(100.0, 75.0), no_modifiers());
    assert!(down.is_empty());
    assert!(matches!(ctl.state(), InputState::Dragging { .. }));

    ctl.on_pointer_move(&doc, pt(130.0, 95.0));
    assert_eq!(bounds(&doc, &id), Rect::new(50.0, 50.0, 100.0, 50.0));
    assert_eq!(ctl.preview(), Some((id, Rect::new(80.0, 70.0, 100.0, 50.0))));

    ctl.on_pointer_up(&mut doc, pt(130.0, 95.0));
    assert_eq!(bounds(&doc, &id), Rect::new(80.0, 70.0, 100.0, 50.0));
    assert!(ctl.preview().is_none());
}

#[test]
fn drag_is_clamped_to_canvas() {
    let (mut ctl, mut doc) = setup();
    let id = add_rect(&mut doc, 50.0, 50.0, 100.0, 50.0);

    ctl.on_pointer_down(&mut doc, pt(100.0, 75.0), no_modifiers());
    ctl.on_pointer_up(&mut doc, pt(-400.0, 2000.0));

    let r = bounds(&doc, &id);
    assert_eq!(r, Rect::new(0.0, 540.0, 100.0, 50.0));
    assert!(r.is_within(ctl.canvas()));
}

#[test]
fn release_without_moving_commits_nothing() {
    let (mut ctl, mut doc) = setup();
    add_rect(&mut doc, 50.0, 50.0, 100.0, 50.0);
    let before = doc.history().past_len();

    ctl.on_pointer_down(&mut doc, pt(100.0, 75.0), no_modifiers());
    let actions = ctl.on_pointer_up(&mut doc, pt(100.0, 75.0));

    assert!(actions.is_empty());
    assert_eq!(doc.history().past_len(), before);
}

#[test]
fn delete_mid_drag_aborts_without_commit() {
    let (mut ctl, mut doc) = setup();
    let id = add_rect(&mut doc, 50.0, 50.0, 100.0, 50.0);

    ctl.on_pointer_down(&mut doc, pt(100.0, 75.0), no_modifiers());
    ctl.on_pointer_move(&doc, pt(120.0, 75.0));
    doc.delete_element(&id);
    let past = doc.history().past_len();

    let actions = ctl.on_pointer_move(&doc, pt(140.0, 75.0));
    assert!(has_action(&actions, |a| *a == Action::GestureAborted { id }));
    assert!(ctl.state().is_idle());

    let actions = ctl.on_pointer_up(&mut doc, pt(140.0, 75.0));
    assert!(actions.is_empty());
    assert_eq!(doc.history().past_len(), past);
}

#[test]
fn delete_before_release_aborts() {
    let (mut ctl, mut doc) = setup();
    let id = add_rect(&mut doc, 50.0, 50.0, 100.0, 50.0);

    ctl.on_pointer_down(&mut doc, pt(100.0, 75.0), no_modifiers());
    doc.delete_element(&id);
    let actions = ctl.on_pointer_up(&mut doc, pt(140.0, 75.0));

    assert!(has_action(&actions, |a| *a == Action::GestureAborted { id }));
    assert!(doc.element(&id).is_none());
}

#[test]
fn cancel_discards_preview() {
    let (mut ctl, mut doc) = setup();
    let id = add_rect(&mut doc, 50.0, 50.0, 100.0, 50.0);

    ctl.on_pointer_down(&mut doc, pt(100.0, 75.0), no_modifiers());
    ctl.on_pointer_move(&doc, pt(150.0, 75.0));
    assert_eq!(ctl.cancel(), vec![Action::RenderNeeded]);
    assert!(ctl.on_pointer_up(&mut doc, pt(150.0, 75.0)).is_empty());
    assert_eq!(bounds(&doc, &id), Rect::new(50.0, 50.0, 100.0, 50.0));
    assert!(ctl.cancel().is_empty());
}

// =============================================================
// Canvas taps
// =============================================================

#[test]
fn tap_unselected_element_selects_it() {
    let (mut ctl, mut doc) = setup();
    let a = add_rect(&mut doc, 0.0, 0.0, 50.0, 50.0);
    let b = add_rect(&mut doc, 200.0, 200.0, 50.0, 50.0);
    assert_eq!(doc.selection().ids(), &[b]);

    let actions = ctl.on_pointer_down(&mut doc, pt(25.0, 25.0), no_modifiers());
    assert!(has_action(&actions, |a| *a == Action::SelectionChanged));
    assert_eq!(doc.selection().ids(), &[a]);
    assert!(ctl.state().is_idle());
}

#[test]
fn tap_with_multi_select_toggles() {
    let (mut ctl, mut doc) = setup();
    let a = add_rect(&mut doc, 0.0, 0.0, 50.0, 50.0);
    let b = add_rect(&mut doc, 200.0, 200.0, 50.0, 50.0);

    ctl.on_pointer_down(&mut doc, pt(25.0, 25.0), multi());
    assert_eq!(doc.selection().ids(), &[b, a]);

    ctl.on_pointer_down(&mut doc, pt(225.0, 225.0), multi());
    assert_eq!(doc.selection().ids(), &[a]);
}

#[test]
fn tap_background_clears_selection() {
    let (mut ctl, mut doc) = setup();
    add_rect(&mut doc, 0.0, 0.0, 50.0, 50.0);

    let actions = ctl.on_pointer_down(&mut doc, pt(300.0, 400.0), no_modifiers());
    assert!(has_action(&actions, |a| *a == Action::SelectionChanged));
    assert!(doc.selection().is_empty());

    let actions = ctl.on_pointer_down(&mut doc, pt(300.0, 400.0), no_modifiers());
    assert!(actions.is_empty());
}

#[test]
fn shape_tool_tap_creates_and_returns_to_select() {
    let (mut ctl, mut doc) = setup();
    doc.set_active_tool(Tool::Rectangle);

    let actions = ctl.on_pointer_down(&mut doc, pt(200.0, 200.0), no_modifiers());
    let Some(Action::ElementCreated(id)) = actions.first().cloned() else {
        panic!("expected ElementCreated, got {actions:?}");
    };
    assert_eq!(bounds(&doc, &id), Rect::new(150.0, 175.0, 100.0, 50.0));
    assert_eq!(doc.selection().ids(), &[id]);
    assert_eq!(doc.active_tool(), Tool::Select);
}

#[test]
fn created_shape_is_clamped_into_canvas() {
    let (mut ctl, mut doc) = setup();
    doc.set_active_tool(Tool::Star);

    let actions = ctl.on_pointer_down(&mut doc, pt(5.0, 5.0), no_modifiers());
    let Some(Action::ElementCreated(id)) = actions.first().cloned() else {
        panic!("expected ElementCreated");
    };
    assert_eq!(bounds(&doc, &id), Rect::new(0.0, 0.0, 80.0, 70.0));
}

#[test]
fn every_shape_tool_creates_its_kind() {
    for kind in [
        ShapeKind::Rectangle,
        ShapeKind::Circle,
        ShapeKind::Ellipse,
        ShapeKind::Triangle,
        ShapeKind::Line,
        ShapeKind::Star,
    ] {
        let (mut ctl, mut doc) = setup();
        doc.set_active_tool(Tool::from(kind));
        ctl.on_pointer_down(&mut doc, pt(200.0, 300.0), no_modifiers());
        let el = &doc.elements()[0];
        assert_eq!(el.shape_kind(), Some(kind));
        assert!(el.width >= 10.0 && el.height >= 10.0);
    }
}

#[test]
fn text_tool_requests_editor() {
    let (mut ctl, mut doc) = setup();
    doc.set_active_tool(Tool::Text);

    let actions = ctl.on_pointer_down(&mut doc, pt(200.0, 200.0), no_modifiers());
    let id = doc.elements()[0].id;
    assert!(matches!(doc.elements()[0].body, ElementBody::Text(_)));
    assert!(has_action(&actions, |a| *a == Action::EditTextRequested { id }));
    assert_eq!(doc.active_tool(), Tool::Select);
}

#[test]
fn image_tool_asks_host() {
    let (mut ctl, mut doc) = setup();
    doc.set_active_tool(Tool::Image);

    let actions = ctl.on_pointer_down(&mut doc, pt(10.0, 20.0), no_modifiers());
    assert_eq!(actions, vec![Action::ImageRequested { at: pt(10.0, 20.0) }]);
    assert!(doc.is_empty());
}

#[test]
fn creation_tool_still_drags_selected_element() {
    let (mut ctl, mut doc) = setup();
    let id = add_rect(&mut doc, 50.0, 50.0, 100.0, 50.0);
    doc.set_active_tool(Tool::Circle);

    ctl.on_pointer_down(&mut doc, pt(100.0, 75.0), no_modifiers());
    assert!(matches!(ctl.state(), InputState::Dragging { id: dragged, .. } if *dragged == id));
    assert_eq!(doc.len(), 1);
}

#[test]
fn multi_select_tap_on_selected_body_deselects() {
    let (mut ctl, mut doc) = setup();
    let id = add_rect(&mut doc, 50.0, 50.0, 100.0, 50.0);

    ctl.on_pointer_down(&mut doc, pt(100.0, 75.0), multi());
    assert!(!doc.selection().contains(&id));
    assert!(ctl.state().is_idle());
}

#[test]
fn second_pointer_down_drops_gesture() {
    let (mut ctl, mut doc) = setup();
    let id = add_rect(&mut doc, 50.0, 50.0, 100.0, 50.0);

    ctl.on_pointer_down(&mut doc, pt(100.0, 75.0), no_modifiers());
    ctl.on_pointer_move(&doc, pt(120.0, 75.0));
    let actions = ctl.on_pointer_down(&mut doc, pt(300.0, 500.0), no_modifiers());

    assert!(ctl.state().is_idle());
    assert!(has_action(&actions, |a| *a == Action::RenderNeeded));
    assert_eq!(bounds(&doc, &id), Rect::new(50.0, 50.0, 100.0, 50.0));
}

#[test]
fn regrab_during_drag_renders_dropped_preview() {
    let (mut ctl, mut doc) = setup();
    let id = add_rect(&mut doc, 50.0, 50.0, 100.0, 50.0);

    assert!(ctl.on_pointer_down(&mut doc, pt(100.0, 75.0), no_modifiers()).is_empty());
    ctl.on_pointer_move(&doc, pt(130.0, 75.0));
    assert_eq!(ctl.preview(), Some((id, Rect::new(80.0, 50.0, 100.0, 50.0))));

    let actions = ctl.on_pointer_down(&mut doc, pt(100.0, 75.0), no_modifiers());
    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert_eq!(ctl.preview(), Some((id, Rect::new(50.0, 50.0, 100.0, 50.0))));
    assert_eq!(bounds(&doc, &id), Rect::new(50.0, 50.0, 100.0, 50.0));
}
