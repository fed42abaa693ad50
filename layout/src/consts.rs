//! Shared numeric constants for the layout crate.

// ── Units ───────────────────────────────────────────────────────

/// Meters in one inch. Panel catalogs list dimensions in inches.
pub const METERS_PER_INCH: f64 = 0.0254;

/// Fixed image scale: pixels per meter of roof.
pub const PIXELS_PER_METER: f64 = 10.0;

// ── Planning ────────────────────────────────────────────────────

/// Gap added to both cell dimensions between neighbouring panels, in pixels.
pub const PANEL_GAP_PX: f64 = 10.0;

/// Cell multiple subtracted from the polygon area when sizing the grid.
pub const GRID_MARGIN_CELLS: f64 = 5.0;

// ── Energy ──────────────────────────────────────────────────────

/// Peak sun hours per day used by the production estimate.
pub const SOLAR_IRRADIANCE: f64 = 5.5;

/// Days per year used by the production estimate.
pub const DAYS_PER_YEAR: f64 = 365.0;

// ── Interaction ─────────────────────────────────────────────────

/// Smallest panel edge a transform gesture may report, in pixels.
pub const MIN_PANEL_EDGE_PX: f64 = 5.0;

/// Screen-space hit slop in pixels for the rotate handle.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Distance above the panel's top edge to the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;

/// Pointer travel (screen pixels) below which a press-release is a click.
pub const CLICK_SLOP_PX: f64 = 3.0;

/// Zoom limits for the camera.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// Zoom factor applied per 100 pixels of wheel travel.
pub const WHEEL_ZOOM_STEP: f64 = 1.1;
