use bevy::ecs::system::SystemParam;
use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;

use crate::Viewpoint;
use crate::config::CameraSettings;

/// Marker for the map camera entity.
#[derive(Component, Reflect)]
pub struct MapCamera;

/// Inputs read by [`super::systems::pan_and_zoom`].
#[derive(SystemParam)]
pub struct CameraInput<'w, 's> {
    pub(super) time: Res<'w, Time>,
    pub(super) keys: Res<'w, ButtonInput<KeyCode>>,
    pub(super) scroll: MessageReader<'w, 's, MouseWheel>,
    pub(super) cfg: Res<'w, CameraSettings>,
    pub(super) viewpoint: ResMut<'w, Viewpoint>,
}
