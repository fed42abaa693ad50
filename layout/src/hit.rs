#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::Serialize;

use crate::camera::Camera;
use crate::consts::{HANDLE_RADIUS_PX, ROTATE_HANDLE_OFFSET_PX};
use crate::doc::LayoutDoc;
use crate::geom::{Bounds, Point, Rectangle};

/// Which part of a panel was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HitPart {
    Body,
    RotateHandle,
}

/// Result of a hit test, most specific target first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "target", rename_all = "camelCase")]
pub enum Hit {
    /// Off the roof image.
    Outside,
    /// On the image, clear of every polygon and panel.
    Image,
    /// Inside a finished polygon but not on a panel.
    Polygon { index: usize },
    /// On a placed panel.
    Panel { index: usize, part: HitPart },
}

/// Image-space position of a panel's rotate handle: centred above the top
/// edge, a fixed screen distance away, turned with the panel.
#[must_use]
pub fn rotate_handle(rect: &Rectangle, camera: &Camera) -> Point {
    let offset = camera.screen_dist_to_world(ROTATE_HANDLE_OFFSET_PX);
    rect.to_world(Point::new(rect.width / 2.0, -offset))
}

/// Classify `world_pt` against the image bounds and the document.
///
/// The selected panel's rotate handle wins over everything else; panels are
/// tested topmost (last placed) first with their rotation applied; polygons
/// are tested newest first. With no image bounds the whole plane counts as
/// image.
#[must_use]
pub fn hit_test(world_pt: Point, doc: &LayoutDoc, camera: &Camera, image: Option<Bounds>) -> Hit {
    if image.is_some_and(|bounds| !bounds.contains(world_pt)) {
        return Hit::Outside;
    }

    if let Some(index) = doc.selected() {
        if let Some(rect) = doc.rectangle(index) {
            let radius = camera.screen_dist_to_world(HANDLE_RADIUS_PX);
            if rotate_handle(rect, camera).distance(world_pt) <= radius {
                return Hit::Panel { index, part: HitPart::RotateHandle };
            }
        }
    }

    let state = doc.state();
    if let Some(index) = state.rectangles.iter().rposition(|rect| rect.contains_rotated(world_pt)) {
        return Hit::Panel { index, part: HitPart::Body };
    }
    if let Some(index) = state.polygons.iter().rposition(|poly| poly.contains(world_pt)) {
        return Hit::Polygon { index };
    }
    Hit::Image
}
