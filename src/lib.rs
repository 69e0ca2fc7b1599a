#![warn(missing_docs)]
//! Hex kingdom map core.
//!
//! Deterministic procedural generation of a hex strategy map, a spatial index
//! over the generated tiles, chunk streaming around a moving viewpoint and
//! zoom-driven level of detail. The core modules (`catalog`, `mapgen`,
//! `spatial`, `streaming`, `lod`) are plain Rust; `world` and `camera` are
//! the Bevy plugins that drive them.

pub mod camera;
pub mod catalog;
pub mod config;
pub mod error;
pub mod lod;
pub mod mapgen;
pub mod math;
pub mod spatial;
pub mod streaming;
pub mod world;

use bevy::prelude::*;

/// Application-wide state, used for system scheduling.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
pub enum GameState {
    /// Normal map viewing.
    #[default]
    Running,
    /// Debug overlay and inspector active (Tab to toggle).
    Debugging,
}

/// Where the map is being looked at. The camera writes it; streaming and LOD
/// read it.
#[derive(Resource, Clone, Copy, Debug, Default, Reflect)]
pub struct Viewpoint {
    /// Ground point under the camera, world xz.
    pub focus: Vec2,
    /// Camera height above the ground plane.
    pub zoom: f32,
}

/// Per-frame ordering between the viewpoint source and its consumers.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapSet {
    /// Input moves the viewpoint.
    Viewpoint,
    /// Chunks follow the viewpoint.
    Streaming,
    /// Detail level follows the zoom.
    Detail,
}
