//! Serialized commands: the one entry point through which hosts (the HTTP
//! service, the websocket, the CLI replay) drive an engine.
//!
//! Wire form is an object tagged by `op`, e.g.
//! `{"op":"addVertex","position":{"x":10,"y":20}}`.

#[cfg(test)]
#[path = "command_test.rs"]
mod command_test;

use serde::{Deserialize, Serialize};

use crate::engine::ImageFrame;
use crate::geom::Point;
use crate::input::{Button, Gesture, Key, Modifiers, Tool, WheelDelta};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    /// Attach the roof image the layout is traced over.
    SetImage { image: ImageFrame },
    /// Choose the panel model used for planning and placement.
    SelectPanel { model_name: String },
    SetTool { tool: Tool },

    AddVertex { position: Point },
    FinishPolygon,

    BeginPlacement,
    SetPendingPosition { position: Point },
    ConfirmPlacement,
    Cancel,

    SelectRectangle { index: usize },
    ClearSelection,
    MoveRectangle { index: usize, x: f64, y: f64 },
    /// `rotation` is in radians.
    TransformRectangle { index: usize, x: f64, y: f64, rotation: f64 },
    RemoveSelected,

    Undo,
    Redo,
    Reset,

    /// A host-normalized click, drag end, or transform end.
    Gesture { gesture: Gesture },
    Key {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },

    /// Raw pointer input in screen coordinates.
    PointerDown {
        position: Point,
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        position: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp {
        position: Point,
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Wheel {
        position: Point,
        delta: WheelDelta,
        #[serde(default)]
        modifiers: Modifiers,
    },
}

impl Command {
    /// Wire name of the command, for logs.
    #[must_use]
    pub fn op(&self) -> &'static str {
        match self {
            Self::SetImage { .. } => "setImage",
            Self::SelectPanel { .. } => "selectPanel",
            Self::SetTool { .. } => "setTool",
            Self::AddVertex { .. } => "addVertex",
            Self::FinishPolygon => "finishPolygon",
            Self::BeginPlacement => "beginPlacement",
            Self::SetPendingPosition { .. } => "setPendingPosition",
            Self::ConfirmPlacement => "confirmPlacement",
            Self::Cancel => "cancel",
            Self::SelectRectangle { .. } => "selectRectangle",
            Self::ClearSelection => "clearSelection",
            Self::MoveRectangle { .. } => "moveRectangle",
            Self::TransformRectangle { .. } => "transformRectangle",
            Self::RemoveSelected => "removeSelected",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Reset => "reset",
            Self::Gesture { .. } => "gesture",
            Self::Key { .. } => "key",
            Self::PointerDown { .. } => "pointerDown",
            Self::PointerMove { .. } => "pointerMove",
            Self::PointerUp { .. } => "pointerUp",
            Self::Wheel { .. } => "wheel",
        }
    }
}
