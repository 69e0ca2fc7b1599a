//! Top-down map camera.
//!
//! WASD pans, Q/E and the scroll wheel zoom. Input moves the shared
//! [`Viewpoint`](crate::Viewpoint); the camera transform eases toward it.

mod entities;
mod systems;

pub use entities::MapCamera;

use bevy::prelude::*;

use crate::config::CameraSettings;
use crate::{GameState, MapSet, Viewpoint};

/// Top-down pan/zoom camera that drives the viewpoint.
pub struct CameraPlugin(pub CameraSettings);

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<MapCamera>()
            .register_type::<CameraSettings>()
            .insert_resource(self.0.clone())
            .init_resource::<Viewpoint>()
            .add_systems(Startup, systems::spawn_camera)
            .add_systems(
                Update,
                (
                    systems::pan_and_zoom.run_if(in_state(GameState::Running)),
                    systems::follow_viewpoint,
                )
                    .chain()
                    .in_set(MapSet::Viewpoint),
            );
    }
}
