//! Panel catalog: the panel models a user can lay out, as supplied by the host.
//!
//! Catalog JSON comes either as a bare array of panels or wrapped in a
//! `{"panels": [...], "totalCount": n}` envelope. Field names follow the
//! upstream camelCase schema; `panelEfficiency` is accepted as an alias for
//! `efficiency`.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use serde::{Deserialize, Serialize};

use crate::consts::{METERS_PER_INCH, PIXELS_PER_METER};
use crate::planner::Footprint;

/// Errors from loading a panel catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("panel '{model}' has non-positive dimensions")]
    InvalidDimension { model: String },
    #[error("panel '{model}' has negative power wattage")]
    InvalidWattage { model: String },
    #[error("duplicate panel model '{0}'")]
    DuplicateModel(String),
}

/// Physical panel size in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub length: f64,
    pub width: f64,
}

/// One panel model from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSpec {
    pub model_name: String,
    /// Rated output in watts.
    pub power_wattage: f64,
    pub dimension: Dimension,
    #[serde(alias = "panelEfficiency", default)]
    pub efficiency: f64,
}

impl PanelSpec {
    /// Pixel footprint: inches → meters → pixels at the fixed image scale.
    #[must_use]
    pub fn footprint(&self) -> Footprint {
        Footprint::new(inches_to_px(self.dimension.length), inches_to_px(self.dimension.width))
    }

    /// Rated output in kilowatts.
    #[must_use]
    pub fn power_kw(&self) -> f64 {
        self.power_wattage / 1000.0
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.dimension.length <= 0.0 || self.dimension.width <= 0.0 {
            return Err(CatalogError::InvalidDimension { model: self.model_name.clone() });
        }
        if self.power_wattage < 0.0 {
            return Err(CatalogError::InvalidWattage { model: self.model_name.clone() });
        }
        Ok(())
    }
}

/// Convert a length in inches to image pixels.
#[must_use]
pub fn inches_to_px(inches: f64) -> f64 {
    inches * METERS_PER_INCH * PIXELS_PER_METER
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogWire {
    Bare(Vec<PanelSpec>),
    Envelope { panels: Vec<PanelSpec> },
}

/// The set of panel models available to a layout session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PanelCatalog {
    panels: Vec<PanelSpec>,
}

impl PanelCatalog {
    /// Build a catalog, rejecting invalid entries and duplicate model names.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure found.
    pub fn new(panels: Vec<PanelSpec>) -> Result<Self, CatalogError> {
        for (i, panel) in panels.iter().enumerate() {
            panel.validate()?;
            if panels[..i].iter().any(|p| p.model_name == panel.model_name) {
                return Err(CatalogError::DuplicateModel(panel.model_name.clone()));
            }
        }
        Ok(Self { panels })
    }

    /// Parse catalog JSON in either the bare-array or envelope shape.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] for malformed input, or a validation error.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let panels = match serde_json::from_str::<CatalogWire>(text)? {
            CatalogWire::Bare(panels) | CatalogWire::Envelope { panels } => panels,
        };
        Self::new(panels)
    }

    /// Look up a panel by exact model name.
    #[must_use]
    pub fn find(&self, model_name: &str) -> Option<&PanelSpec> {
        self.panels.iter().find(|p| p.model_name == model_name)
    }

    #[must_use]
    pub fn panels(&self) -> &[PanelSpec] {
        &self.panels
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}
