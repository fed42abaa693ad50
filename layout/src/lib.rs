//! Rooftop layout engine: polygon geometry, solar panel grid planning, and an
//! undoable layout document.
//!
//! The crate is pure and synchronous. A host (the HTTP service, the CLI, or a
//! browser shell) feeds it an already-decoded aerial image frame, pointer
//! gestures, and panel catalog entries; the engine answers with
//! [`engine::Action`]s and a serializable [`engine::View`]. Fetching imagery,
//! geocoding, and drawing pixels all live outside this crate.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`geom`] | Points, bounds, ray casting, shoelace area, centroid, rectangle corners |
//! | [`planner`] | Centroid-anchored grid packing of panel footprints inside a polygon |
//! | [`doc`] | The layout document and its snapshot-producing operations |
//! | [`history`] | Linear undo/redo stack with a cursor |
//! | [`catalog`] | Panel definitions and the inch-to-pixel footprint conversion |
//! | [`metrics`] | System size and annual energy estimates |
//! | [`camera`] | Pan/zoom camera and screen/image coordinate conversions |
//! | [`hit`] | Hit-testing against the image, polygons, and panels |
//! | [`input`] | Input event types, normalized gestures, and the gesture state machine |
//! | [`engine`] | [`engine::EngineCore`]: classifies input and drives the document |
//! | [`command`] | Serializable commands, the single mutation entry point for hosts |
//! | [`overlay`] | Geometric overlay for an external renderer or image exporter |
//! | [`consts`] | Unit conversions and layout constants |

pub mod camera;
pub mod catalog;
pub mod command;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod history;
pub mod hit;
pub mod input;
pub mod metrics;
pub mod overlay;
pub mod planner;
