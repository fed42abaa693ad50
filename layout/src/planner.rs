//! Panel layout planner: fills a finished roof polygon with a grid of panels.
//!
//! DESIGN
//! ======
//! The grid is sized from the polygon's area rather than its extent, anchored
//! on the vertex-average centroid, and walked row by row. A cell becomes a
//! panel when its centre passes the ray-casting test and the unrotated panel
//! rectangle at the cell's top-left corner keeps all four corners inside the
//! polygon. The packer is greedy and approximate: it makes no attempt at a
//! maximal tiling, only at a deterministic one.

#[cfg(test)]
#[path = "planner_test.rs"]
mod planner_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::GRID_MARGIN_CELLS;
use crate::geom::{self, Point, Rectangle};

/// Pixel size of one panel. `length` runs along the grid's x axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Footprint {
    pub length: f64,
    pub width: f64,
}

impl Footprint {
    #[must_use]
    pub fn new(length: f64, width: f64) -> Self {
        Self { length, width }
    }

    /// Unrotated panel rectangle with its top-left corner at `(x, y)`.
    #[must_use]
    pub fn rect_at(&self, x: f64, y: f64) -> Rectangle {
        Rectangle::new(x, y, self.length, self.width)
    }

    /// Unrotated panel rectangle centred on `center`.
    #[must_use]
    pub fn rect_centered(&self, center: Point) -> Rectangle {
        self.rect_at(center.x - self.length / 2.0, center.y - self.width / 2.0)
    }
}

/// Planner output: accepted panels in grid order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Plan {
    pub rectangles: Vec<Rectangle>,
    pub count: usize,
}

/// Candidate grid derived from the polygon area.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Grid {
    cols: i64,
    rows: i64,
    cell_w: f64,
    cell_h: f64,
    left: f64,
    top: f64,
}

impl Grid {
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn estimate(area: f64, centroid: Point, footprint: Footprint, gap_px: f64) -> Option<Self> {
        let cell_w = footprint.length + gap_px;
        let cell_h = footprint.width + gap_px;
        if cell_w <= 0.0 || cell_h <= 0.0 {
            return None;
        }
        let cols = ((area - GRID_MARGIN_CELLS * cell_h) / cell_w).floor() as i64;
        let rows = ((area - GRID_MARGIN_CELLS * cell_w) / cell_h).floor() as i64;
        if cols <= 0 || rows <= 0 {
            return None;
        }
        Some(Self {
            cols,
            rows,
            cell_w,
            cell_h,
            left: centroid.x - cols as f64 * cell_w / 2.0,
            top: centroid.y - rows as f64 * cell_h / 2.0,
        })
    }

    /// Indices in `0..count` whose cell centre falls within `[lo, hi]` along
    /// one axis. Widened by one cell each side; the polygon test does the rest.
    /// Bounds are clamped to `[0, count]` in f64 before the cast, so far-off
    /// coordinates saturate instead of overflowing.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn span(origin: f64, cell: f64, count: i64, lo: f64, hi: f64) -> std::ops::Range<i64> {
        let max = count as f64;
        let first = ((lo - origin - cell / 2.0) / cell).floor() - 1.0;
        let end = ((hi - origin - cell / 2.0) / cell).ceil() + 2.0;
        (first.clamp(0.0, max) as i64)..(end.clamp(0.0, max) as i64)
    }
}

/// Whether `gap_px` keeps neighbouring cells from overlapping.
#[must_use]
pub fn is_valid_gap(gap_px: f64) -> bool {
    gap_px.is_finite() && gap_px >= 0.0
}

/// Plan a panel grid inside `polygon`.
///
/// Cells measure `footprint + gap_px` on each axis; panels themselves are the
/// bare footprint. Every accepted panel is rotated to face the centroid.
/// Degenerate or too-small polygons yield an empty plan, as do a negative gap
/// and outlines so large their area is not finite.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn plan_panels(polygon: &[Point], footprint: Footprint, gap_px: f64) -> Plan {
    if !is_valid_gap(gap_px) {
        debug!(gap_px, "planner: gap rejected");
        return Plan::default();
    }
    let area = geom::polygon_area(polygon);
    if !area.is_finite() {
        debug!("planner: polygon area overflowed");
        return Plan::default();
    }
    let (Some(center), Some(bbox)) = (geom::centroid(polygon), geom::bounding_box(polygon)) else {
        return Plan::default();
    };
    let Some(grid) = Grid::estimate(area, center, footprint, gap_px) else {
        debug!(area, "planner: polygon smaller than the grid margin");
        return Plan::default();
    };

    // Cells whose centre is outside the bounding box can never pass the
    // ray-casting test, so only the overlapping rows and columns are walked.
    let rows = Grid::span(grid.top, grid.cell_h, grid.rows, bbox.y, bbox.bottom());
    let cols = Grid::span(grid.left, grid.cell_w, grid.cols, bbox.x, bbox.right());

    let mut rectangles = Vec::new();
    for row in rows {
        let y = grid.top + row as f64 * grid.cell_h;
        for col in cols.clone() {
            let x = grid.left + col as f64 * grid.cell_w;
            let cell_center = Point::new(x + grid.cell_w / 2.0, y + grid.cell_h / 2.0);
            if !geom::point_in_polygon(cell_center, polygon) {
                continue;
            }
            let mut rect = footprint.rect_at(x, y);
            if geom::rectangle_inside_polygon(&rect, polygon) {
                rect.rotation = (center.y - y).atan2(center.x - x);
                rectangles.push(rect);
            }
        }
    }

    debug!(
        area,
        cols = grid.cols,
        rows = grid.rows,
        accepted = rectangles.len(),
        "planner: grid planned"
    );
    let count = rectangles.len();
    Plan { rectangles, count }
}

/// Indices of the rectangles whose four unrotated corners all lie inside
/// `polygon`, in ascending order. These are the panels a re-plan replaces.
#[must_use]
pub fn panels_inside(rectangles: &[Rectangle], polygon: &[Point]) -> Vec<usize> {
    rectangles
        .iter()
        .enumerate()
        .filter(|(_, rect)| geom::rectangle_inside_polygon(rect, polygon))
        .map(|(i, _)| i)
        .collect()
}
