#![allow(clippy::float_cmp)]

use super::*;

fn spec(name: &str, length: f64, width: f64) -> PanelSpec {
    PanelSpec {
        model_name: name.into(),
        power_wattage: 400.0,
        dimension: Dimension { length, width },
        efficiency: 0.2,
    }
}

// =============================================================
// Footprint conversion
// =============================================================

#[test]
fn inches_to_px_uses_fixed_scale() {
    assert!((inches_to_px(100.0) - 25.4).abs() < 1e-12);
    assert_eq!(inches_to_px(0.0), 0.0);
}

#[test]
fn footprint_from_dimension() {
    let fp = spec("A", 65.0, 39.0).footprint();
    assert!((fp.length - 16.51).abs() < 1e-9);
    assert!((fp.width - 9.906).abs() < 1e-9);
}

#[test]
fn power_kw() {
    assert_eq!(spec("A", 1.0, 1.0).power_kw(), 0.4);
}

// =============================================================
// JSON shapes
// =============================================================

#[test]
fn parse_bare_array() {
    let text = r#"[
        {"modelName": "Sun 400", "powerWattage": 400, "dimension": {"length": 65, "width": 39}, "efficiency": 0.21}
    ]"#;
    let catalog = PanelCatalog::from_json(text).unwrap();
    assert_eq!(catalog.len(), 1);
    let panel = catalog.find("Sun 400").unwrap();
    assert_eq!(panel.power_wattage, 400.0);
    assert_eq!(panel.efficiency, 0.21);
}

#[test]
fn parse_envelope_with_upstream_fields() {
    let text = r#"{
        "panels": [
            {"_id": "x1", "modelName": "Mono 370", "powerWattage": 370,
             "dimension": {"length": 70.1, "width": 40.9}, "panelEfficiency": 19.5,
             "createdBy": "dealer", "panelImages": []}
        ],
        "totalCount": 1,
        "pages": null
    }"#;
    let catalog = PanelCatalog::from_json(text).unwrap();
    let panel = catalog.find("Mono 370").unwrap();
    assert_eq!(panel.efficiency, 19.5);
    assert_eq!(panel.dimension.width, 40.9);
}

#[test]
fn missing_efficiency_defaults_to_zero() {
    let text = r#"[{"modelName": "Bare", "powerWattage": 300, "dimension": {"length": 60, "width": 30}}]"#;
    let catalog = PanelCatalog::from_json(text).unwrap();
    assert_eq!(catalog.find("Bare").unwrap().efficiency, 0.0);
}

#[test]
fn malformed_json_is_rejected() {
    assert!(matches!(PanelCatalog::from_json("{not json"), Err(CatalogError::Json(_))));
    assert!(matches!(PanelCatalog::from_json(r#"{"panels": 3}"#), Err(CatalogError::Json(_))));
}

#[test]
fn serialize_uses_camel_case() {
    let json = serde_json::to_value(spec("A", 1.0, 2.0)).unwrap();
    assert_eq!(json["modelName"], "A");
    assert_eq!(json["powerWattage"], 400.0);
    assert_eq!(json["dimension"]["width"], 2.0);
}

// =============================================================
// Validation
// =============================================================

#[test]
fn zero_dimension_rejected() {
    let err = PanelCatalog::new(vec![spec("Flat", 0.0, 10.0)]).unwrap_err();
    assert!(matches!(err, CatalogError::InvalidDimension { ref model } if model == "Flat"));
}

#[test]
fn negative_wattage_rejected() {
    let mut p = spec("Neg", 10.0, 10.0);
    p.power_wattage = -1.0;
    assert!(matches!(PanelCatalog::new(vec![p]), Err(CatalogError::InvalidWattage { .. })));
}

#[test]
fn duplicate_model_rejected() {
    let err = PanelCatalog::new(vec![spec("Dup", 1.0, 1.0), spec("Dup", 2.0, 2.0)]).unwrap_err();
    assert_eq!(err.to_string(), "duplicate panel model 'Dup'");
}

#[test]
fn find_unknown_model_is_none() {
    let catalog = PanelCatalog::new(vec![spec("A", 1.0, 1.0)]).unwrap();
    assert!(catalog.find("B").is_none());
    assert!(catalog.find("a").is_none());
}

#[test]
fn empty_catalog() {
    let catalog = PanelCatalog::from_json("[]").unwrap();
    assert!(catalog.is_empty());
    assert!(catalog.panels().is_empty());
}
