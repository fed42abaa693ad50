//! Layout document: the in-progress outline, finished roof polygons, placed
//! panels, and the undo/redo history over them.
//!
//! DESIGN
//! ======
//! [`LayoutDoc`] is the only place the document changes. Every operation is
//! synchronous and either applies completely or is ignored; an ignored
//! operation changes nothing and records nothing. Each applied mutation
//! pushes exactly one [`Snapshot`] onto the history. Selection and placement
//! mode are interaction state: they live beside the document, not in it, and
//! never reach the history.
//!
//! Hosts that share a document between several actors must funnel every call
//! through one owner (the service keeps each document behind a mutex); the
//! history and the panel counter are not safe under interleaved writers.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::PanelSpec;
use crate::consts::PANEL_GAP_PX;
use crate::geom::{self, Point, Rectangle};
use crate::history::History;
use crate::planner::{self, Footprint};

/// A finished roof outline. The closing edge is implicit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon(pub Vec<Point>);

impl Polygon {
    #[must_use]
    pub fn vertices(&self) -> &[Point] {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        geom::point_in_polygon(p, &self.0)
    }
}

/// The panel model a layout is being built with, reduced to what the
/// document needs: its name (for the model lock) and its pixel footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelChoice {
    pub model_name: String,
    pub footprint: Footprint,
}

impl From<&PanelSpec> for PanelChoice {
    fn from(spec: &PanelSpec) -> Self {
        Self { model_name: spec.model_name.clone(), footprint: spec.footprint() }
    }
}

/// Full document contents. The live document and every history entry share
/// this shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Vertices of the outline being drawn, not yet closed.
    pub points: Vec<Point>,
    /// Finished roof outlines, oldest first.
    pub polygons: Vec<Polygon>,
    /// Edge lengths per finished polygon, frozen when it was finished.
    pub side_lengths: Vec<Vec<f64>>,
    /// Placed panels in placement order.
    pub rectangles: Vec<Rectangle>,
    /// Display rotation in degrees, one per rectangle.
    pub rotation_angles: Vec<f64>,
    /// Running panel counter.
    pub total_panels_added: usize,
    /// Panel model the layout was last built with.
    pub panel: Option<PanelChoice>,
}

/// Single-panel placement mode.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Placement {
    pub active: bool,
    /// Where the next confirmed panel will be centred.
    pub pending: Option<Point>,
}

/// Why an operation left the document untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ignored {
    /// A coordinate or angle was NaN or infinite.
    NonFinite,
    /// The vertex falls inside a finished polygon or a placed panel.
    InsideExisting,
    /// Fewer than three vertices and no finished polygon to re-plan.
    NothingToFinish,
    /// Panels of another model are already placed.
    PanelLocked,
    /// Placement mode is off.
    NotPlacing,
    /// Placement mode is on but no position has been chosen.
    NoPendingPosition,
    /// No panel is selected.
    NoSelection,
    /// The panel index is out of range.
    NoSuchRectangle,
    /// Nothing left to undo.
    AtOldest,
    /// Nothing left to redo.
    AtNewest,
    /// The operation needs a panel model and none is selected.
    NoPanelSelected,
    /// The requested panel model is not in the catalog.
    UnknownPanel,
    /// A transform gesture reported a degenerate or non-finite shape.
    InvalidTransform,
}

/// Result of a document operation.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    Applied,
    Ignored(Ignored),
}

impl Outcome {
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Per-document tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSettings {
    /// Gap between neighbouring planned panels, in pixels.
    pub gap_px: f64,
    /// Maximum retained snapshots; `None` keeps everything.
    pub history_limit: Option<usize>,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self { gap_px: PANEL_GAP_PX, history_limit: None }
    }
}

/// The layout document and its history.
#[derive(Debug, Clone)]
pub struct LayoutDoc {
    state: Snapshot,
    history: History<Snapshot>,
    selected: Option<usize>,
    placement: Placement,
    settings: LayoutSettings,
}

impl Default for LayoutDoc {
    fn default() -> Self {
        Self::new(LayoutSettings::default())
    }
}

pub(crate) fn ignore(op: &'static str, reason: Ignored) -> Outcome {
    debug!(op, ?reason, "layout: operation ignored");
    Outcome::Ignored(reason)
}

fn finite(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

impl LayoutDoc {
    #[must_use]
    pub fn new(settings: LayoutSettings) -> Self {
        let history = match settings.history_limit {
            Some(limit) => History::with_limit(Snapshot::default(), limit),
            None => History::new(Snapshot::default()),
        };
        Self { state: Snapshot::default(), history, selected: None, placement: Placement::default(), settings }
    }

    // --- Queries ---

    /// The live document.
    #[must_use]
    pub fn state(&self) -> &Snapshot {
        &self.state
    }

    #[must_use]
    pub fn history(&self) -> &History<Snapshot> {
        &self.history
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    #[must_use]
    pub fn settings(&self) -> LayoutSettings {
        self.settings
    }

    #[must_use]
    pub fn rectangle(&self, index: usize) -> Option<&Rectangle> {
        self.state.rectangles.get(index)
    }

    #[must_use]
    pub fn panel_count(&self) -> usize {
        self.state.total_panels_added
    }

    /// Whether `p` lies inside any finished polygon or any placed panel.
    #[must_use]
    pub fn is_occupied(&self, p: Point) -> bool {
        self.state.polygons.iter().any(|poly| poly.contains(p))
            || self.state.rectangles.iter().any(|rect| rect.contains(p))
    }

    // --- Drawing ---

    /// Append a vertex to the outline being drawn.
    pub fn add_vertex(&mut self, p: Point) -> Outcome {
        if !finite(p) {
            return ignore("add_vertex", Ignored::NonFinite);
        }
        if self.is_occupied(p) {
            return ignore("add_vertex", Ignored::InsideExisting);
        }
        self.state.points.push(p);
        self.commit();
        Outcome::Applied
    }

    /// Close the outline being drawn and fill it with panels.
    ///
    /// With fewer than three drawn vertices the most recently finished
    /// polygon is re-planned instead. Panels already inside the polygon are
    /// replaced rather than duplicated.
    pub fn finish_polygon(&mut self, panel: &PanelChoice) -> Outcome {
        if self.is_locked_against(panel) {
            return ignore("finish_polygon", Ignored::PanelLocked);
        }
        let is_new = self.state.points.len() >= 3;
        let outline = if is_new {
            self.state.points.clone()
        } else if let Some(last) = self.state.polygons.last() {
            last.0.clone()
        } else {
            return ignore("finish_polygon", Ignored::NothingToFinish);
        };

        let replaced = planner::panels_inside(&self.state.rectangles, &outline);
        for &index in replaced.iter().rev() {
            self.state.rectangles.remove(index);
            self.state.rotation_angles.remove(index);
        }

        let plan = planner::plan_panels(&outline, panel.footprint, self.settings.gap_px);
        self.state.rotation_angles.extend(plan.rectangles.iter().map(|r| r.rotation.to_degrees()));
        self.state.rectangles.extend(plan.rectangles);
        self.state.total_panels_added = self.state.total_panels_added.saturating_sub(replaced.len()) + plan.count;

        if is_new {
            self.state.side_lengths.push(geom::side_lengths(&outline));
            self.state.polygons.push(Polygon(outline));
            self.state.points.clear();
        }
        self.state.panel = Some(panel.clone());
        self.selected = None;
        debug!(
            new_polygon = is_new,
            replaced = replaced.len(),
            added = plan.count,
            total = self.state.total_panels_added,
            "layout: polygon finished"
        );
        self.commit();
        Outcome::Applied
    }

    // --- Manual placement ---

    /// Enter single-panel placement mode with no pending position.
    pub fn begin_placement(&mut self) -> Outcome {
        self.placement = Placement { active: true, pending: None };
        Outcome::Applied
    }

    /// Choose where the next confirmed panel goes.
    pub fn set_pending_position(&mut self, p: Point) -> Outcome {
        if !self.placement.active {
            return ignore("set_pending_position", Ignored::NotPlacing);
        }
        if !finite(p) {
            return ignore("set_pending_position", Ignored::NonFinite);
        }
        self.placement.pending = Some(p);
        Outcome::Applied
    }

    /// Place one unrotated panel centred on the pending position and leave
    /// placement mode.
    pub fn confirm_placement(&mut self, panel: &PanelChoice) -> Outcome {
        if !self.placement.active {
            return ignore("confirm_placement", Ignored::NotPlacing);
        }
        let Some(center) = self.placement.pending else {
            return ignore("confirm_placement", Ignored::NoPendingPosition);
        };
        if self.is_locked_against(panel) {
            return ignore("confirm_placement", Ignored::PanelLocked);
        }
        self.state.rectangles.push(panel.footprint.rect_centered(center));
        self.state.rotation_angles.push(0.0);
        self.state.total_panels_added += 1;
        self.state.panel = Some(panel.clone());
        self.placement = Placement::default();
        self.commit();
        Outcome::Applied
    }

    /// Leave placement mode and drop the selection. Never recorded.
    pub fn cancel(&mut self) -> Outcome {
        self.placement = Placement::default();
        self.selected = None;
        Outcome::Applied
    }

    // --- Selection ---

    pub fn select(&mut self, index: usize) -> Outcome {
        if index >= self.state.rectangles.len() {
            return ignore("select", Ignored::NoSuchRectangle);
        }
        self.selected = Some(index);
        Outcome::Applied
    }

    pub fn clear_selection(&mut self) -> Outcome {
        self.selected = None;
        Outcome::Applied
    }

    // --- Panel edits ---

    /// Move a panel's top-left corner.
    pub fn move_rectangle(&mut self, index: usize, x: f64, y: f64) -> Outcome {
        if !finite(Point::new(x, y)) {
            return ignore("move_rectangle", Ignored::NonFinite);
        }
        let Some(rect) = self.state.rectangles.get_mut(index) else {
            return ignore("move_rectangle", Ignored::NoSuchRectangle);
        };
        rect.x = x;
        rect.y = y;
        self.commit();
        Outcome::Applied
    }

    /// Move a panel and set its rotation (radians).
    pub fn transform_rectangle(&mut self, index: usize, x: f64, y: f64, rotation: f64) -> Outcome {
        if !finite(Point::new(x, y)) || !rotation.is_finite() {
            return ignore("transform_rectangle", Ignored::NonFinite);
        }
        let Some(rect) = self.state.rectangles.get_mut(index) else {
            return ignore("transform_rectangle", Ignored::NoSuchRectangle);
        };
        rect.x = x;
        rect.y = y;
        rect.rotation = rotation;
        if let Some(angle) = self.state.rotation_angles.get_mut(index) {
            *angle = rotation.to_degrees();
        }
        self.commit();
        Outcome::Applied
    }

    /// Delete the selected panel. The panel counter never drops below zero.
    pub fn remove_selected(&mut self) -> Outcome {
        let Some(index) = self.selected else {
            return ignore("remove_selected", Ignored::NoSelection);
        };
        self.selected = None;
        if index >= self.state.rectangles.len() {
            return ignore("remove_selected", Ignored::NoSuchRectangle);
        }
        self.state.rectangles.remove(index);
        if index < self.state.rotation_angles.len() {
            self.state.rotation_angles.remove(index);
        }
        self.state.total_panels_added = self.state.total_panels_added.saturating_sub(1);
        self.commit();
        Outcome::Applied
    }

    // --- History ---

    /// Restore the previous snapshot. At the oldest retained snapshot, drop
    /// the last drawn vertex instead if there is one.
    pub fn undo(&mut self) -> Outcome {
        if let Some(previous) = self.history.undo() {
            self.state = previous.clone();
            self.selected = None;
            return Outcome::Applied;
        }
        if self.state.points.pop().is_some() {
            debug!(remaining = self.state.points.len(), "layout: dropped unsaved vertex");
            return Outcome::Applied;
        }
        ignore("undo", Ignored::AtOldest)
    }

    /// Restore the next snapshot, if an undo left one.
    pub fn redo(&mut self) -> Outcome {
        let Some(next) = self.history.redo() else {
            return ignore("redo", Ignored::AtNewest);
        };
        self.state = next.clone();
        self.selected = None;
        Outcome::Applied
    }

    /// Return to a fresh, empty document with an empty history.
    pub fn reset(&mut self) -> Outcome {
        self.state = Snapshot::default();
        self.history.reset(Snapshot::default());
        self.selected = None;
        self.placement = Placement::default();
        Outcome::Applied
    }

    // --- Internals ---

    fn is_locked_against(&self, panel: &PanelChoice) -> bool {
        !self.state.rectangles.is_empty()
            && self
                .state
                .panel
                .as_ref()
                .is_some_and(|current| current.model_name != panel.model_name)
    }

    fn commit(&mut self) {
        self.history.push(self.state.clone());
    }
}
