use serde_json::json;

use super::*;

fn parse(value: serde_json::Value) -> Command {
    serde_json::from_value(value).unwrap()
}

#[test]
fn unit_commands_parse_from_op_alone() {
    assert_eq!(parse(json!({"op": "undo"})), Command::Undo);
    assert_eq!(parse(json!({"op": "finishPolygon"})), Command::FinishPolygon);
    assert_eq!(parse(json!({"op": "removeSelected"})), Command::RemoveSelected);
}

#[test]
fn add_vertex_parses_position() {
    let cmd = parse(json!({"op": "addVertex", "position": {"x": 10, "y": 20.5}}));
    assert_eq!(cmd, Command::AddVertex { position: Point::new(10.0, 20.5) });
}

#[test]
fn select_panel_uses_camel_case_field() {
    let cmd = parse(json!({"op": "selectPanel", "modelName": "SunMax 400"}));
    assert_eq!(cmd, Command::SelectPanel { model_name: "SunMax 400".to_owned() });
}

#[test]
fn transform_rectangle_parses_all_fields() {
    let cmd = parse(json!({"op": "transformRectangle", "index": 3, "x": 1, "y": 2, "rotation": 0.5}));
    assert_eq!(cmd, Command::TransformRectangle { index: 3, x: 1.0, y: 2.0, rotation: 0.5 });
}

#[test]
fn key_modifiers_default_when_absent() {
    let cmd = parse(json!({"op": "key", "key": "Delete"}));
    assert_eq!(cmd, Command::Key { key: Key("Delete".to_owned()), modifiers: Modifiers::default() });
}

#[test]
fn gesture_nests_its_own_tag() {
    let cmd = parse(json!({
        "op": "gesture",
        "gesture": {"kind": "dragEnd", "target": 1, "position": {"x": 4, "y": 5}}
    }));
    assert_eq!(
        cmd,
        Command::Gesture { gesture: Gesture::DragEnd { target: 1, position: Point::new(4.0, 5.0) } }
    );
}

#[test]
fn set_image_bounds_are_optional() {
    let cmd = parse(json!({"op": "setImage", "image": {"width": 640, "height": 480}}));
    let Command::SetImage { image } = cmd else {
        panic!("expected setImage");
    };
    assert_eq!((image.width, image.height), (640, 480));
    assert!(image.bounds.is_none());
}

#[test]
fn unknown_op_is_rejected() {
    assert!(serde_json::from_value::<Command>(json!({"op": "explode"})).is_err());
    assert!(serde_json::from_value::<Command>(json!({"position": {"x": 1, "y": 1}})).is_err());
}

#[test]
fn op_matches_wire_tag() {
    let commands = [
        Command::Undo,
        Command::SetTool { tool: Tool::Select },
        Command::MoveRectangle { index: 0, x: 1.0, y: 2.0 },
        Command::PointerUp { position: Point::new(0.0, 0.0), button: Button::Primary, modifiers: Modifiers::default() },
    ];
    for cmd in commands {
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["op"], cmd.op());
    }
}
