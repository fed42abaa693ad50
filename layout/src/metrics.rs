//! Derived read-side metrics for a layout: system size and energy estimate.
//!
//! These are computed on demand from the panel count and the selected panel
//! model and are never stored in the document.

#[cfg(test)]
#[path = "metrics_test.rs"]
mod metrics_test;

use serde::Serialize;

use crate::catalog::PanelSpec;
use crate::consts::{DAYS_PER_YEAR, SOLAR_IRRADIANCE};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub panel_count: usize,
    /// Nameplate capacity in kilowatts.
    pub system_size_kw: f64,
    /// Estimated yearly output of a single panel.
    pub annual_production_per_panel: f64,
    /// Estimated yearly output of the whole layout.
    pub total_annual_production: f64,
}

impl Metrics {
    /// Metrics for `panel_count` panels of model `panel`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn for_panel(panel: &PanelSpec, panel_count: usize) -> Self {
        let count = panel_count as f64;
        let per_panel = panel.power_kw() * SOLAR_IRRADIANCE * panel.efficiency * DAYS_PER_YEAR;
        Self {
            panel_count,
            system_size_kw: panel.power_kw() * count,
            annual_production_per_panel: per_panel,
            total_annual_production: per_panel * count,
        }
    }
}
