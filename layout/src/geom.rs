//! Geometry kernel: pure functions over points, polygons, and rectangles.
//!
//! Everything lives in one flat pixel space (image pixels, y pointing down).
//! Polygons are vertex slices with an implicit closing edge from the last
//! vertex back to the first; they are assumed simple but this is not checked.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Axis-aligned box. `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive containment test on all four edges.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

/// A placed panel footprint.
///
/// `(x, y)` is the top-left corner before rotation; `rotation` is in radians
/// and turns the rectangle about that same corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl Rectangle {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height, rotation: 0.0 }
    }

    /// Centre of the unrotated rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment against the unrotated extent.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        Bounds::new(self.x, self.y, self.width, self.height).contains(p)
    }

    /// Containment against the rectangle as drawn, i.e. with `rotation` applied.
    #[must_use]
    pub fn contains_rotated(&self, p: Point) -> bool {
        let local = self.to_local(p);
        local.x >= 0.0 && local.x <= self.width && local.y >= 0.0 && local.y <= self.height
    }

    /// Map an image-space point into this rectangle's unrotated frame, with
    /// the origin at the top-left corner.
    #[must_use]
    pub fn to_local(&self, p: Point) -> Point {
        let (sin, cos) = self.rotation.sin_cos();
        let dx = p.x - self.x;
        let dy = p.y - self.y;
        Point::new(dx * cos + dy * sin, -dx * sin + dy * cos)
    }

    /// Map a point in this rectangle's local frame back into image space.
    #[must_use]
    pub fn to_world(&self, local: Point) -> Point {
        let (sin, cos) = self.rotation.sin_cos();
        Point::new(self.x + local.x * cos - local.y * sin, self.y + local.x * sin + local.y * cos)
    }
}

/// Ray-casting containment test.
///
/// Casts a horizontal ray to the right of `p` and toggles on every edge that
/// straddles `p.y` with its crossing to the right of `p.x`. Points exactly on
/// an edge may land on either side.
#[must_use]
pub fn point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > p.y) != (b.y > p.y) {
            let cross_x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Unsigned polygon area by the shoelace formula. Zero below three vertices.
#[must_use]
pub fn polygon_area(polygon: &[Point]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice.abs() / 2.0
}

/// Length of every edge, starting with vertex 0 → 1 and ending with the
/// closing edge from the last vertex back to vertex 0.
#[must_use]
pub fn side_lengths(polygon: &[Point]) -> Vec<f64> {
    let n = polygon.len();
    (0..n).map(|i| polygon[i].distance(polygon[(i + 1) % n])).collect()
}

/// Axis-aligned bounding box. `None` for an empty vertex list.
#[must_use]
pub fn bounding_box(polygon: &[Point]) -> Option<Bounds> {
    let first = polygon.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &polygon[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(Bounds::new(min_x, min_y, max_x - min_x, max_y - min_y))
}

/// Arithmetic mean of the vertices. `None` for an empty vertex list.
///
/// This is the vertex average, not the area-weighted centroid; the two differ
/// when vertices are unevenly spaced along the outline.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn centroid(polygon: &[Point]) -> Option<Point> {
    if polygon.is_empty() {
        return None;
    }
    let n = polygon.len() as f64;
    let (sx, sy) = polygon.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// Corners of the unrotated rectangle, clockwise from the top-left.
#[must_use]
pub fn rectangle_corners(rect: &Rectangle) -> [Point; 4] {
    [
        Point::new(rect.x, rect.y),
        Point::new(rect.x + rect.width, rect.y),
        Point::new(rect.x + rect.width, rect.y + rect.height),
        Point::new(rect.x, rect.y + rect.height),
    ]
}

/// Corners of the rectangle as drawn, with `rotation` applied about `(x, y)`.
#[must_use]
pub fn rotated_corners(rect: &Rectangle) -> [Point; 4] {
    [
        rect.to_world(Point::new(0.0, 0.0)),
        rect.to_world(Point::new(rect.width, 0.0)),
        rect.to_world(Point::new(rect.width, rect.height)),
        rect.to_world(Point::new(0.0, rect.height)),
    ]
}

/// True when all four unrotated corners pass [`point_in_polygon`].
///
/// The stored rotation is deliberately not applied here; placement acceptance
/// is judged on the axis-aligned footprint.
#[must_use]
pub fn rectangle_inside_polygon(rect: &Rectangle, polygon: &[Point]) -> bool {
    rectangle_corners(rect)
        .iter()
        .all(|&corner| point_in_polygon(corner, polygon))
}
