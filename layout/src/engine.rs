//! Engine core: owns the layout document plus all interaction state, turns
//! input into document operations, and reports what changed as [`Action`]s.
//!
//! The engine has no rendering or I/O. Hosts either forward raw pointer and
//! key events (`on_pointer_*`, `on_key_down`, `on_wheel`) or pre-normalized
//! [`Gesture`]s, or drive it with serialized [`Command`]s through
//! [`EngineCore::execute`].

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::camera::Camera;
use crate::catalog::{PanelCatalog, PanelSpec};
use crate::command::Command;
use crate::consts::{CLICK_SLOP_PX, WHEEL_ZOOM_STEP};
use crate::doc::{self, Ignored, LayoutDoc, LayoutSettings, Outcome, PanelChoice, Placement, Snapshot};
use crate::geom::{self, Bounds, Point, Rectangle};
use crate::hit::{self, Hit, HitPart};
use crate::input::{Button, Gesture, InputState, Key, Modifiers, Tool, UiState, WheelDelta};
use crate::metrics::Metrics;
use crate::overlay::Overlay;

/// The decoded roof image the layout is traced over. Only its size and
/// placement matter to the engine; pixels stay with the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageFrame {
    pub width: u32,
    pub height: u32,
    /// Where the image sits in layout space. Defaults to the origin at
    /// native size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
}

impl ImageFrame {
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
            .unwrap_or_else(|| Bounds::new(0.0, 0.0, f64::from(self.width), f64::from(self.height)))
    }
}

/// What an input or command changed, for the host to react to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    /// The document changed and a history entry may have been recorded.
    DocumentChanged,
    /// The operation was ignored; nothing changed.
    Ignored { reason: Ignored },
    SelectionChanged { selected: Option<usize> },
    PlacementChanged { placement: Placement },
    ToolChanged { tool: Tool },
    PanelSelected { model_name: String },
    ImageChanged { image: ImageFrame },
    CameraChanged { camera: Camera },
    SetCursor { cursor: String },
    /// Transient state (a drag preview) moved; redraw.
    RenderNeeded,
}

/// Undo/redo position exposed to hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    pub cursor: usize,
    pub len: usize,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Serializable read model of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub document: Snapshot,
    pub selected: Option<usize>,
    pub placement: Placement,
    pub tool: Tool,
    pub camera: Camera,
    pub image: Option<ImageFrame>,
    pub panel: Option<PanelSpec>,
    pub history: HistoryView,
    pub metrics: Option<Metrics>,
}

/// Core engine state: all logic that doesn't depend on a canvas element.
#[derive(Debug, Clone)]
pub struct EngineCore {
    pub doc: LayoutDoc,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    image: Option<ImageFrame>,
    catalog: PanelCatalog,
    panel: Option<PanelSpec>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(PanelCatalog::default(), LayoutSettings::default())
    }
}

fn outcome_actions(outcome: Outcome, applied: Action) -> Vec<Action> {
    match outcome {
        Outcome::Applied => vec![applied],
        Outcome::Ignored(reason) => vec![Action::Ignored { reason }],
    }
}

fn rejected(op: &'static str, reason: Ignored) -> Vec<Action> {
    outcome_actions(doc::ignore(op, reason), Action::RenderNeeded)
}

impl EngineCore {
    #[must_use]
    pub fn new(catalog: PanelCatalog, settings: LayoutSettings) -> Self {
        Self {
            doc: LayoutDoc::new(settings),
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::default(),
            image: None,
            catalog,
            panel: None,
        }
    }

    // --- Setup ---

    /// Attach the roof image. Layout state is kept.
    pub fn set_image(&mut self, image: ImageFrame) -> Vec<Action> {
        self.image = Some(image);
        vec![Action::ImageChanged { image }]
    }

    /// Choose the active panel model by name.
    ///
    /// Ignored for unknown models, and for a different model while panels of
    /// the current one are placed.
    pub fn select_panel(&mut self, model_name: &str) -> Vec<Action> {
        let Some(spec) = self.catalog.find(model_name) else {
            return rejected("select_panel", Ignored::UnknownPanel);
        };
        let state = self.doc.state();
        let locked = !state.rectangles.is_empty()
            && state.panel.as_ref().is_some_and(|current| current.model_name != spec.model_name);
        if locked {
            return rejected("select_panel", Ignored::PanelLocked);
        }
        self.panel = Some(spec.clone());
        vec![Action::PanelSelected { model_name: spec.model_name.clone() }]
    }

    /// Set the active tool. The panel tool is placement mode; leaving it
    /// cancels any pending placement.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        if tool == self.ui.tool {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if tool == Tool::Panel {
            if self.doc.begin_placement().is_applied() {
                actions.push(Action::PlacementChanged { placement: self.doc.placement() });
            }
        } else if self.doc.placement().active && self.doc.cancel().is_applied() {
            actions.push(Action::PlacementChanged { placement: self.doc.placement() });
            actions.push(Action::SelectionChanged { selected: None });
        }
        self.ui.tool = tool;
        actions.push(Action::ToolChanged { tool });
        actions
    }

    // --- Document operations ---

    pub fn add_vertex(&mut self, p: Point) -> Vec<Action> {
        outcome_actions(self.doc.add_vertex(p), Action::DocumentChanged)
    }

    pub fn finish_polygon(&mut self) -> Vec<Action> {
        let Some(choice) = self.panel_choice() else {
            return rejected("finish_polygon", Ignored::NoPanelSelected);
        };
        let mut actions = outcome_actions(self.doc.finish_polygon(&choice), Action::DocumentChanged);
        if matches!(actions.first(), Some(Action::DocumentChanged)) {
            actions.push(Action::SelectionChanged { selected: None });
        }
        actions
    }

    pub fn begin_placement(&mut self) -> Vec<Action> {
        self.set_tool(Tool::Panel)
    }

    pub fn set_pending_position(&mut self, p: Point) -> Vec<Action> {
        let outcome = self.doc.set_pending_position(p);
        outcome_actions(outcome, Action::PlacementChanged { placement: self.doc.placement() })
    }

    pub fn confirm_placement(&mut self) -> Vec<Action> {
        let Some(choice) = self.panel_choice() else {
            return rejected("confirm_placement", Ignored::NoPanelSelected);
        };
        let outcome = self.doc.confirm_placement(&choice);
        if !outcome.is_applied() {
            return outcome_actions(outcome, Action::DocumentChanged);
        }
        self.ui.tool = Tool::Select;
        vec![
            Action::DocumentChanged,
            Action::PlacementChanged { placement: self.doc.placement() },
            Action::ToolChanged { tool: Tool::Select },
        ]
    }

    /// Leave placement mode and drop the selection. A cancelled placement
    /// returns to the select tool.
    pub fn cancel(&mut self) -> Vec<Action> {
        self.input = InputState::Idle;
        if self.ui.tool == Tool::Panel {
            return self.set_tool(Tool::Select);
        }
        outcome_actions(self.doc.cancel(), Action::SelectionChanged { selected: None })
    }

    pub fn select_rectangle(&mut self, index: usize) -> Vec<Action> {
        let outcome = self.doc.select(index);
        outcome_actions(outcome, Action::SelectionChanged { selected: self.doc.selected() })
    }

    pub fn clear_selection(&mut self) -> Vec<Action> {
        outcome_actions(self.doc.clear_selection(), Action::SelectionChanged { selected: None })
    }

    pub fn move_rectangle(&mut self, index: usize, x: f64, y: f64) -> Vec<Action> {
        outcome_actions(self.doc.move_rectangle(index, x, y), Action::DocumentChanged)
    }

    pub fn transform_rectangle(&mut self, index: usize, x: f64, y: f64, rotation: f64) -> Vec<Action> {
        outcome_actions(self.doc.transform_rectangle(index, x, y, rotation), Action::DocumentChanged)
    }

    pub fn remove_selected(&mut self) -> Vec<Action> {
        let mut actions = outcome_actions(self.doc.remove_selected(), Action::DocumentChanged);
        if matches!(actions.first(), Some(Action::DocumentChanged)) {
            actions.push(Action::SelectionChanged { selected: None });
        }
        actions
    }

    pub fn undo(&mut self) -> Vec<Action> {
        self.input = InputState::Idle;
        let mut actions = outcome_actions(self.doc.undo(), Action::DocumentChanged);
        if matches!(actions.first(), Some(Action::DocumentChanged)) {
            actions.push(Action::SelectionChanged { selected: None });
        }
        actions
    }

    pub fn redo(&mut self) -> Vec<Action> {
        self.input = InputState::Idle;
        let mut actions = outcome_actions(self.doc.redo(), Action::DocumentChanged);
        if matches!(actions.first(), Some(Action::DocumentChanged)) {
            actions.push(Action::SelectionChanged { selected: None });
        }
        actions
    }

    /// Clear the document, its history, and all interaction state. The
    /// image, catalog, and chosen panel model are kept.
    pub fn reset(&mut self) -> Vec<Action> {
        self.input = InputState::Idle;
        self.ui = UiState::default();
        let mut actions = outcome_actions(self.doc.reset(), Action::DocumentChanged);
        actions.extend([
            Action::SelectionChanged { selected: None },
            Action::PlacementChanged { placement: self.doc.placement() },
            Action::ToolChanged { tool: self.ui.tool },
        ]);
        actions
    }

    // --- Gestures ---

    /// Apply a click in image space.
    ///
    /// Outside the image clears the selection; in placement mode the click
    /// sets the pending position; on a panel it selects; otherwise the
    /// polygon tool adds a vertex and any other tool clears the selection.
    pub fn click(&mut self, world: Point) -> Vec<Action> {
        let hit = hit::hit_test(world, &self.doc, &self.camera, self.image_bounds());
        match hit {
            Hit::Outside => self.clear_selection(),
            _ if self.doc.placement().active => self.set_pending_position(world),
            Hit::Panel { index, .. } => self.select_rectangle(index),
            Hit::Image | Hit::Polygon { .. } => match self.ui.tool {
                Tool::Polygon => self.add_vertex(world),
                Tool::Select | Tool::Panel => self.clear_selection(),
            },
        }
    }

    /// Apply a host-normalized gesture. Transform rotations arrive in degrees.
    pub fn apply_gesture(&mut self, gesture: Gesture) -> Vec<Action> {
        match gesture {
            Gesture::Click { position } => self.click(position),
            Gesture::DragEnd { target, position } => self.move_rectangle(target, position.x, position.y),
            Gesture::TransformEnd { target, attrs } => {
                if !attrs.is_valid() {
                    return rejected("transform_end", Ignored::InvalidTransform);
                }
                self.transform_rectangle(target, attrs.x, attrs.y, attrs.rotation.to_radians())
            }
        }
    }

    // --- Raw input ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        match button {
            Button::Middle => {
                self.input = InputState::Panning { last_screen: screen_pt };
                Vec::new()
            }
            Button::Secondary => Vec::new(),
            Button::Primary => {
                let world = self.camera.screen_to_world(screen_pt);
                let hit = hit::hit_test(world, &self.doc, &self.camera, self.image_bounds());
                let rotating = match hit {
                    Hit::Panel { index, part: HitPart::RotateHandle } => self.doc.rectangle(index).map(|rect| {
                        InputState::RotatingPanel {
                            index,
                            center: rect.to_world(Point::new(rect.width / 2.0, rect.height / 2.0)),
                            current_world: world,
                        }
                    }),
                    _ => None,
                };
                self.input = rotating.unwrap_or(InputState::Pressed { start_screen: screen_pt, hit });
                Vec::new()
            }
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        match self.input {
            InputState::Idle => self.hover_cursor(world),
            InputState::Pressed { start_screen, hit } => {
                if start_screen.distance(screen_pt) <= CLICK_SLOP_PX {
                    return Vec::new();
                }
                let drag_origin = match hit {
                    Hit::Panel { index, part: HitPart::Body } if !self.doc.placement().active => {
                        self.doc.rectangle(index).map(|rect| (index, Point::new(rect.x, rect.y)))
                    }
                    _ => None,
                };
                if let Some((index, origin)) = drag_origin {
                    self.input = InputState::DraggingPanel {
                        index,
                        start_world: self.camera.screen_to_world(start_screen),
                        origin,
                        current_world: world,
                    };
                    let mut actions = self.select_rectangle(index);
                    actions.push(Action::RenderNeeded);
                    return actions;
                }
                self.camera.pan_by(screen_pt.x - start_screen.x, screen_pt.y - start_screen.y);
                self.input = InputState::Panning { last_screen: screen_pt };
                vec![Action::CameraChanged { camera: self.camera }]
            }
            InputState::Panning { last_screen } => {
                self.camera.pan_by(screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                self.input = InputState::Panning { last_screen: screen_pt };
                vec![Action::CameraChanged { camera: self.camera }]
            }
            InputState::DraggingPanel { index, start_world, origin, .. } => {
                self.input = InputState::DraggingPanel { index, start_world, origin, current_world: world };
                vec![Action::RenderNeeded]
            }
            InputState::RotatingPanel { index, center, .. } => {
                self.input = InputState::RotatingPanel { index, center, current_world: world };
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let state = std::mem::take(&mut self.input);
        let world = self.camera.screen_to_world(screen_pt);
        match state {
            InputState::Pressed { start_screen, .. } if button == Button::Primary => {
                self.click(self.camera.screen_to_world(start_screen))
            }
            InputState::DraggingPanel { index, start_world, origin, .. } => {
                self.move_rectangle(index, origin.x + world.x - start_world.x, origin.y + world.y - start_world.y)
            }
            InputState::RotatingPanel { index, center, .. } => self.rotate_about_center(index, center, world),
            _ => Vec::new(),
        }
    }

    /// Zoom about the pointer.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        let factor = WHEEL_ZOOM_STEP.powf(-delta.dy / 100.0);
        self.camera.zoom_at(screen_pt, factor);
        vec![Action::CameraChanged { camera: self.camera }]
    }

    /// Keyboard shortcuts: Ctrl/Cmd+Z undo, Ctrl/Cmd+Shift+Z or Ctrl/Cmd+Y
    /// redo, Delete/Backspace remove, Escape cancel, Enter finish or confirm.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.command() {
            if key.is("z") {
                return if modifiers.shift { self.redo() } else { self.undo() };
            }
            if key.is("y") {
                return self.redo();
            }
            return Vec::new();
        }
        if key.is("Delete") || key.is("Backspace") {
            return self.remove_selected();
        }
        if key.is("Escape") {
            return self.cancel();
        }
        if key.is("Enter") {
            return if self.doc.placement().active { self.confirm_placement() } else { self.finish_polygon() };
        }
        Vec::new()
    }

    // --- Commands ---

    /// Apply one serialized command.
    pub fn execute(&mut self, command: Command) -> Vec<Action> {
        debug!(op = command.op(), "engine: command");
        match command {
            Command::SetImage { image } => self.set_image(image),
            Command::SelectPanel { model_name } => self.select_panel(&model_name),
            Command::SetTool { tool } => self.set_tool(tool),
            Command::AddVertex { position } => self.add_vertex(position),
            Command::FinishPolygon => self.finish_polygon(),
            Command::BeginPlacement => self.begin_placement(),
            Command::SetPendingPosition { position } => self.set_pending_position(position),
            Command::ConfirmPlacement => self.confirm_placement(),
            Command::Cancel => self.cancel(),
            Command::SelectRectangle { index } => self.select_rectangle(index),
            Command::ClearSelection => self.clear_selection(),
            Command::MoveRectangle { index, x, y } => self.move_rectangle(index, x, y),
            Command::TransformRectangle { index, x, y, rotation } => self.transform_rectangle(index, x, y, rotation),
            Command::RemoveSelected => self.remove_selected(),
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::Reset => self.reset(),
            Command::Gesture { gesture } => self.apply_gesture(gesture),
            Command::Key { key, modifiers } => self.on_key_down(&key, modifiers),
            Command::PointerDown { position, button, modifiers } => self.on_pointer_down(position, button, modifiers),
            Command::PointerMove { position, modifiers } => self.on_pointer_move(position, modifiers),
            Command::PointerUp { position, button, modifiers } => self.on_pointer_up(position, button, modifiers),
            Command::Wheel { position, delta, modifiers } => self.on_wheel(position, delta, modifiers),
        }
    }

    // --- Queries ---

    /// The currently selected panel index, if any.
    #[must_use]
    pub fn selection(&self) -> Option<usize> {
        self.doc.selected()
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn image(&self) -> Option<ImageFrame> {
        self.image
    }

    #[must_use]
    pub fn catalog(&self) -> &PanelCatalog {
        &self.catalog
    }

    /// The active panel model.
    #[must_use]
    pub fn panel(&self) -> Option<&PanelSpec> {
        self.panel.as_ref()
    }

    /// Metrics for the current panel count, priced with the model the
    /// panels were placed with (falling back to the active model).
    #[must_use]
    pub fn metrics(&self) -> Option<Metrics> {
        let placed = self.doc.state().panel.as_ref().and_then(|p| self.catalog.find(&p.model_name));
        placed
            .or(self.panel.as_ref())
            .map(|spec| Metrics::for_panel(spec, self.doc.panel_count()))
    }

    /// Where the panel under an active drag or rotate gesture is drawn
    /// right now. The document itself only changes on release.
    #[must_use]
    pub fn preview(&self) -> Option<(usize, Rectangle)> {
        match self.input {
            InputState::DraggingPanel { index, start_world, origin, current_world } => {
                let rect = self.doc.rectangle(index)?;
                Some((index, Rectangle {
                    x: origin.x + current_world.x - start_world.x,
                    y: origin.y + current_world.y - start_world.y,
                    ..*rect
                }))
            }
            InputState::RotatingPanel { index, center, current_world } => {
                let rect = self.doc.rectangle(index)?;
                Some((index, turned_toward(rect, center, current_world)))
            }
            _ => None,
        }
    }

    /// Overlay of the document with any in-flight drag or rotation applied.
    #[must_use]
    pub fn overlay(&self) -> Overlay {
        let footprint = self.panel.as_ref().map(PanelSpec::footprint);
        let mut overlay = Overlay::build(&self.doc, footprint, self.image_bounds());
        if let Some((index, rect)) = self.preview() {
            if let Some(panel) = overlay.panels.get_mut(index) {
                panel.corners = geom::rotated_corners(&rect);
                panel.rotation_degrees = rect.rotation.to_degrees();
            }
        }
        overlay
    }

    #[must_use]
    pub fn view(&self) -> View {
        let history = self.doc.history();
        View {
            document: self.doc.state().clone(),
            selected: self.doc.selected(),
            placement: self.doc.placement(),
            tool: self.ui.tool,
            camera: self.camera,
            image: self.image,
            panel: self.panel.clone(),
            history: HistoryView {
                cursor: history.cursor(),
                len: history.len(),
                can_undo: history.can_undo(),
                can_redo: history.can_redo(),
            },
            metrics: self.metrics(),
        }
    }

    // --- Internals ---

    fn image_bounds(&self) -> Option<Bounds> {
        self.image.map(|image| image.bounds())
    }

    fn panel_choice(&self) -> Option<PanelChoice> {
        self.panel.as_ref().map(PanelChoice::from)
    }

    fn hover_cursor(&self, world: Point) -> Vec<Action> {
        let cursor = match hit::hit_test(world, &self.doc, &self.camera, self.image_bounds()) {
            Hit::Panel { part: HitPart::RotateHandle, .. } => "grab",
            Hit::Panel { part: HitPart::Body, .. } if !self.doc.placement().active => "move",
            Hit::Outside => "default",
            _ => "crosshair",
        };
        vec![Action::SetCursor { cursor: cursor.to_owned() }]
    }

    fn rotate_about_center(&mut self, index: usize, center: Point, pointer: Point) -> Vec<Action> {
        let Some(rect) = self.doc.rectangle(index) else {
            return rejected("rotate", Ignored::NoSuchRectangle);
        };
        let turned = turned_toward(rect, center, pointer);
        self.transform_rectangle(index, turned.x, turned.y, turned.rotation)
    }
}

/// `rect` turned so its rotate handle points at `pointer`, with its drawn
/// centre held at `center`.
fn turned_toward(rect: &Rectangle, center: Point, pointer: Point) -> Rectangle {
    let rotation = (pointer.y - center.y).atan2(pointer.x - center.x) + std::f64::consts::FRAC_PI_2;
    let (sin, cos) = rotation.sin_cos();
    let (hw, hh) = (rect.width / 2.0, rect.height / 2.0);
    Rectangle {
        x: center.x - (hw * cos - hh * sin),
        y: center.y - (hw * sin + hh * cos),
        rotation,
        ..*rect
    }
}
