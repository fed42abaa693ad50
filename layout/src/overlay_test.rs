#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::PanelChoice;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn footprint() -> Footprint {
    Footprint::new(20.0, 10.0)
}

fn choice() -> PanelChoice {
    PanelChoice { model_name: "P".to_owned(), footprint: footprint() }
}

#[test]
fn empty_document_has_empty_overlay() {
    let overlay = Overlay::build(&LayoutDoc::default(), None, None);
    assert!(overlay.polygons.is_empty());
    assert!(overlay.drawing.is_empty());
    assert!(overlay.panels.is_empty());
    assert!(overlay.pending.is_none());
}

#[test]
fn finished_square_carries_sides_area_and_panels() {
    let mut doc = LayoutDoc::default();
    for p in [pt(0.0, 0.0), pt(100.0, 0.0), pt(100.0, 100.0), pt(0.0, 100.0)] {
        let _ = doc.add_vertex(p);
    }
    let _ = doc.finish_polygon(&choice());
    let _ = doc.select(3);

    let overlay = Overlay::build(&doc, Some(footprint()), Some(Bounds::new(0.0, 0.0, 640.0, 480.0)));
    assert_eq!(overlay.polygons.len(), 1);
    assert_eq!(overlay.polygons[0].area, 10_000.0);
    assert_eq!(overlay.polygons[0].side_lengths, vec![100.0; 4]);
    assert_eq!(overlay.panels.len(), 8);
    assert!(overlay.panels[3].selected);
    assert_eq!(overlay.panels.iter().filter(|p| p.selected).count(), 1);
    assert_eq!(overlay.image, Some(Bounds::new(0.0, 0.0, 640.0, 480.0)));
}

#[test]
fn in_progress_outline_is_an_open_polyline() {
    let mut doc = LayoutDoc::default();
    let _ = doc.add_vertex(pt(1.0, 1.0));
    let _ = doc.add_vertex(pt(5.0, 1.0));
    let overlay = Overlay::build(&doc, None, None);
    assert_eq!(overlay.drawing, vec![pt(1.0, 1.0), pt(5.0, 1.0)]);
    assert!(overlay.polygons.is_empty());
}

#[test]
fn pending_placement_ghost_is_centred() {
    let mut doc = LayoutDoc::default();
    let _ = doc.begin_placement();
    let _ = doc.set_pending_position(pt(50.0, 50.0));

    let overlay = Overlay::build(&doc, Some(footprint()), None);
    let ghost = overlay.pending.unwrap();
    assert_eq!(ghost[0], pt(40.0, 45.0));
    assert_eq!(ghost[2], pt(60.0, 55.0));

    assert!(Overlay::build(&doc, None, None).pending.is_none());
}

#[test]
fn rotated_panel_corners_follow_rotation() {
    let mut doc = LayoutDoc::default();
    let _ = doc.begin_placement();
    let _ = doc.set_pending_position(pt(50.0, 50.0));
    let _ = doc.confirm_placement(&choice());
    let _ = doc.transform_rectangle(0, 0.0, 0.0, std::f64::consts::PI);

    let overlay = Overlay::build(&doc, None, None);
    let far = overlay.panels[0].corners[2];
    assert!((far.x + 20.0).abs() < 1e-9);
    assert!((far.y + 10.0).abs() < 1e-9);
    assert!((overlay.panels[0].rotation_degrees - 180.0).abs() < 1e-9);
}

#[test]
fn overlay_serializes_camel_case() {
    let mut doc = LayoutDoc::default();
    let _ = doc.add_vertex(pt(1.0, 1.0));
    let json = serde_json::to_value(Overlay::build(&doc, None, None)).unwrap();
    assert!(json.get("drawing").is_some());
    assert!(json.get("image").is_none());
    assert!(json.get("pending").is_none());
}
