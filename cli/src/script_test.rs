use std::io::Cursor;

use layout::catalog::{Dimension, PanelCatalog, PanelSpec};

use super::*;

const PANEL: &str = "Test 400";

fn engine() -> EngineCore {
    let catalog = PanelCatalog::new(vec![PanelSpec {
        model_name: PANEL.to_owned(),
        power_wattage: 400.0,
        dimension: Dimension { length: 65.0, width: 39.0 },
        efficiency: 0.2,
    }])
    .unwrap();
    EngineCore::new(catalog, LayoutSettings::default())
}

fn square() -> Vec<Point> {
    vec![
        Point::new(10.0, 10.0),
        Point::new(210.0, 10.0),
        Point::new(210.0, 210.0),
        Point::new(10.0, 210.0),
    ]
}

#[test]
fn parse_polygon_reads_point_array() {
    let points = parse_polygon(r#"[{"x":0,"y":0},{"x":4,"y":0},{"x":4,"y":3}]"#).unwrap();
    assert_eq!(points[2], Point::new(4.0, 3.0));
}

#[test]
fn parse_polygon_rejects_two_points() {
    let err = parse_polygon(r#"[{"x":0,"y":0},{"x":4,"y":0}]"#).unwrap_err();
    assert!(matches!(err, CliError::TooFewVertices(2)));
}

#[test]
fn parse_polygon_rejects_bad_json() {
    assert!(matches!(parse_polygon("[{").unwrap_err(), CliError::InvalidJson(_)));
}

#[test]
fn plan_tiles_outline() {
    let mut engine = engine();
    plan(&mut engine, &square(), PANEL).unwrap();
    assert_eq!(engine.doc.state().polygons.len(), 1);
    assert!(engine.doc.panel_count() > 0);
    assert_eq!(engine.metrics().map(|m| m.panel_count), Some(engine.doc.panel_count()));
}

#[test]
fn plan_unknown_panel_fails_on_first_step() {
    let mut engine = engine();
    let err = plan(&mut engine, &square(), "Nope").unwrap_err();
    assert!(matches!(
        err,
        CliError::Rejected { line: 1, op: "selectPanel", reason: Ignored::UnknownPanel }
    ));
}

#[test]
fn replay_skips_blank_and_comment_lines() {
    let script = "\n# outline\n{\"op\":\"addVertex\",\"position\":{\"x\":1,\"y\":1}}\n\n{\"op\":\"redo\"}\n";
    let mut engine = engine();
    let summary = replay(&mut engine, Cursor::new(script), false).unwrap();
    assert_eq!(summary.applied, 1);
    assert_eq!(summary.ignored, vec![(5, Ignored::AtNewest)]);
    assert_eq!(engine.doc.state().points.len(), 1);
}

#[test]
fn strict_replay_stops_at_ignored_command() {
    let script = "{\"op\":\"undo\"}\n{\"op\":\"addVertex\",\"position\":{\"x\":1,\"y\":1}}\n";
    let mut engine = engine();
    let err = replay(&mut engine, Cursor::new(script), true).unwrap_err();
    assert!(matches!(err, CliError::Rejected { line: 1, op: "undo", .. }));
    assert!(engine.doc.state().points.is_empty());
}

#[test]
fn replay_reports_line_of_bad_command() {
    let script = "{\"op\":\"cancel\"}\n{\"op\":\"fly\"}\n";
    let err = replay(&mut engine(), Cursor::new(script), false).unwrap_err();
    assert!(matches!(err, CliError::Script { line: 2, .. }));
}

#[test]
fn metrics_report_needs_a_panel() {
    let err = render(&engine(), Report::Metrics).unwrap_err();
    assert!(matches!(err, CliError::NoPanelSelected));
}

#[test]
fn overlay_report_lists_polygon() {
    let mut engine = engine();
    plan(&mut engine, &square(), PANEL).unwrap();
    let rendered: serde_json::Value = serde_json::from_str(&render(&engine, Report::Overlay).unwrap()).unwrap();
    assert_eq!(rendered["polygons"].as_array().map(Vec::len), Some(1));
}

#[test]
fn negative_gap_is_rejected() {
    assert!(matches!(settings(-5.0, None).unwrap_err(), CliError::InvalidGap(_)));
    assert!(matches!(settings(f64::NAN, None).unwrap_err(), CliError::InvalidGap(_)));
}

#[test]
fn valid_gap_builds_settings() {
    let s = settings(0.0, Some(20)).unwrap();
    assert_eq!(s.history_limit, Some(20));
}
