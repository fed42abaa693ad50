//! Geometric overlay handed to an external renderer or image exporter.
//!
//! The overlay is a flat description of everything drawn on top of the roof
//! image: finished outlines with their edge lengths, the outline being
//! traced, every panel as its four drawn corners, and the ghost of a pending
//! placement. It carries no styling.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use serde::Serialize;

use crate::doc::LayoutDoc;
use crate::geom::{self, Bounds, Point};
use crate::planner::Footprint;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonOverlay {
    pub vertices: Vec<Point>,
    pub side_lengths: Vec<f64>,
    pub area: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelOverlay {
    pub index: usize,
    /// Drawn corners, clockwise from the rotation origin.
    pub corners: [Point; 4],
    pub rotation_degrees: f64,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Bounds>,
    pub polygons: Vec<PolygonOverlay>,
    /// Open polyline of the outline being traced.
    pub drawing: Vec<Point>,
    pub panels: Vec<PanelOverlay>,
    /// Corners of the panel a confirmed placement would create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<[Point; 4]>,
}

impl Overlay {
    /// Flatten `doc` for drawing. `footprint` sizes the pending-placement
    /// ghost; without one no ghost is drawn.
    #[must_use]
    pub fn build(doc: &LayoutDoc, footprint: Option<Footprint>, image: Option<Bounds>) -> Self {
        let state = doc.state();
        let polygons = state
            .polygons
            .iter()
            .zip(&state.side_lengths)
            .map(|(poly, sides)| PolygonOverlay {
                vertices: poly.vertices().to_vec(),
                side_lengths: sides.clone(),
                area: geom::polygon_area(poly.vertices()),
            })
            .collect();
        let panels = state
            .rectangles
            .iter()
            .enumerate()
            .map(|(index, rect)| PanelOverlay {
                index,
                corners: geom::rotated_corners(rect),
                rotation_degrees: state.rotation_angles.get(index).copied().unwrap_or(0.0),
                selected: doc.selected() == Some(index),
            })
            .collect();
        let pending = match (doc.placement().pending, footprint) {
            (Some(center), Some(fp)) => Some(geom::rectangle_corners(&fp.rect_centered(center))),
            _ => None,
        };
        Self { image, polygons, drawing: state.points.clone(), panels, pending }
    }
}
