#![allow(clippy::float_cmp)]

use super::*;

fn attrs(width: Option<f64>, height: Option<f64>) -> TransformAttrs {
    TransformAttrs { x: 1.0, y: 2.0, rotation: 30.0, width, height }
}

// =============================================================
// Tool
// =============================================================

#[test]
fn tool_default_is_polygon() {
    assert_eq!(Tool::default(), Tool::Polygon);
}

#[test]
fn tool_wire_names() {
    assert_eq!(serde_json::to_value(Tool::Panel).unwrap(), serde_json::json!("panel"));
    let tool: Tool = serde_json::from_str("\"select\"").unwrap();
    assert_eq!(tool, Tool::Select);
}

// =============================================================
// Modifiers / keys
// =============================================================

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift && !m.ctrl && !m.alt && !m.meta);
    assert!(!m.command());
}

#[test]
fn command_is_ctrl_or_meta() {
    assert!(Modifiers { ctrl: true, ..Modifiers::default() }.command());
    assert!(Modifiers { meta: true, ..Modifiers::default() }.command());
    assert!(!Modifiers { shift: true, alt: true, ..Modifiers::default() }.command());
}

#[test]
fn modifiers_missing_fields_default() {
    let m: Modifiers = serde_json::from_str(r#"{"shift":true}"#).unwrap();
    assert_eq!(m, Modifiers { shift: true, ..Modifiers::default() });
}

#[test]
fn key_match_ignores_case() {
    assert!(Key("Z".into()).is("z"));
    assert!(Key("Escape".into()).is("escape"));
    assert!(!Key("Enter".into()).is("Escape"));
}

// =============================================================
// TransformAttrs
// =============================================================

#[test]
fn transform_without_size_is_valid() {
    assert!(attrs(None, None).is_valid());
}

#[test]
fn transform_with_tiny_edge_is_invalid() {
    assert!(!attrs(Some(4.9), None).is_valid());
    assert!(!attrs(None, Some(1.0)).is_valid());
    assert!(attrs(Some(MIN_PANEL_EDGE_PX), Some(50.0)).is_valid());
}

#[test]
fn transform_with_non_finite_values_is_invalid() {
    assert!(!TransformAttrs { rotation: f64::NAN, ..attrs(None, None) }.is_valid());
    assert!(!TransformAttrs { x: f64::INFINITY, ..attrs(None, None) }.is_valid());
    assert!(!attrs(Some(f64::NAN), None).is_valid());
}

// =============================================================
// Gesture wire format
// =============================================================

#[test]
fn gesture_click_parses() {
    let g: Gesture = serde_json::from_str(r#"{"kind":"click","position":{"x":3,"y":4}}"#).unwrap();
    assert_eq!(g, Gesture::Click { position: Point::new(3.0, 4.0) });
}

#[test]
fn gesture_drag_end_parses() {
    let g: Gesture =
        serde_json::from_str(r#"{"kind":"dragEnd","target":2,"position":{"x":10.5,"y":-1}}"#).unwrap();
    assert_eq!(g, Gesture::DragEnd { target: 2, position: Point::new(10.5, -1.0) });
}

#[test]
fn gesture_transform_end_parses_optional_size() {
    let g: Gesture = serde_json::from_str(
        r#"{"kind":"transformEnd","target":0,"attrs":{"x":1,"y":2,"rotation":45,"width":20}}"#,
    )
    .unwrap();
    let Gesture::TransformEnd { target, attrs } = g else {
        panic!("expected transformEnd, got {g:?}");
    };
    assert_eq!(target, 0);
    assert_eq!(attrs.rotation, 45.0);
    assert_eq!(attrs.width, Some(20.0));
    assert_eq!(attrs.height, None);
}

#[test]
fn gesture_unknown_kind_is_rejected() {
    let parsed = serde_json::from_str::<Gesture>(r#"{"kind":"doubleTap","position":{"x":0,"y":0}}"#);
    assert!(parsed.is_err());
}

// =============================================================
// InputState
// =============================================================

#[test]
fn input_state_default_is_idle() {
    assert_eq!(InputState::default(), InputState::Idle);
}
