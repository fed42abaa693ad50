//! Input model: tools, modifier keys, mouse buttons, normalized gestures, and
//! the pointer state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `Gesture` is the host-normalized form of a finished interaction
//! (click, drag end, transform end) for hosts that run their own pointer
//! handling. `InputState` is the gesture being tracked between pointer-down
//! and pointer-up when the engine does the pointer handling itself.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::consts::MIN_PANEL_EDGE_PX;
use crate::geom::Point;
use crate::hit::Hit;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tool {
    /// Select and move panels; clicks on free space clear the selection.
    Select,
    /// Trace a roof outline; clicks on free image area add vertices (default).
    #[default]
    Polygon,
    /// Single-panel placement; a click sets the pending position.
    Panel,
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"Delete"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Attributes reported when a transform gesture ends. `rotation` is in
/// degrees; `width` and `height` are only reported by hosts whose transformer
/// offers resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformAttrs {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl TransformAttrs {
    /// Finite position and angle, and no reported edge shorter than
    /// `MIN_PANEL_EDGE_PX`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let edge_ok = |edge: Option<f64>| edge.is_none_or(|v| v.is_finite() && v >= MIN_PANEL_EDGE_PX);
        self.x.is_finite()
            && self.y.is_finite()
            && self.rotation.is_finite()
            && edge_ok(self.width)
            && edge_ok(self.height)
    }
}

/// A finished interaction, normalized by the host. Positions are in image
/// pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Gesture {
    /// A press and release without travel.
    Click { position: Point },
    /// A panel was dragged; `position` is its new top-left corner.
    DragEnd { target: usize, position: Point },
    /// A panel was rotated (or resized) with a transformer.
    TransformEnd { target: usize, attrs: TransformAttrs },
}

/// Persistent UI state visible to the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
}

/// Internal state for the pointer state machine.
///
/// Each active variant carries the context needed to turn the gesture into
/// exactly one document operation on pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Primary button is down but has not travelled far enough to be a drag.
    Pressed {
        /// Screen position of the pointer-down.
        start_screen: Point,
        /// What was under the pointer at pointer-down.
        hit: Hit,
    },
    /// The camera follows the pointer.
    Panning {
        /// Screen-space position of the previous pointer event.
        last_screen: Point,
    },
    /// A panel is being moved.
    DraggingPanel {
        index: usize,
        /// Image-space pointer position at pointer-down.
        start_world: Point,
        /// Panel top-left at pointer-down.
        origin: Point,
        /// Latest pointer position, image space.
        current_world: Point,
    },
    /// The selected panel is being turned by its rotate handle.
    RotatingPanel {
        index: usize,
        /// Drawn centre of the panel; the rotation pivot.
        center: Point,
        /// Latest pointer position, image space.
        current_world: Point,
    },
}
