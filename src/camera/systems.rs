use bevy::input::mouse::MouseScrollUnit;
use bevy::prelude::*;

use super::entities::{CameraInput, MapCamera};
use crate::Viewpoint;
use crate::config::CameraSettings;

/// Spawns the Camera3d entity and sets the starting zoom.
pub fn spawn_camera(
    mut commands: Commands,
    cfg: Res<CameraSettings>,
    mut viewpoint: ResMut<Viewpoint>,
) {
    viewpoint.zoom = cfg.start_zoom;
    commands.spawn((
        Name::new("MapCamera"),
        Camera3d::default(),
        Transform::from_xyz(0.0, cfg.start_zoom, cfg.start_zoom * cfg.tilt)
            .looking_at(Vec3::ZERO, Vec3::Y),
        MapCamera,
    ));
}

/// WASD pan + Q/E/scroll zoom. Pan speed grows with zoom so the screen-space
/// speed stays roughly constant.
pub fn pan_and_zoom(mut input: CameraInput) {
    let dt = input.time.delta_secs();

    let mut direction = Vec2::ZERO;
    if input.keys.pressed(KeyCode::KeyW) {
        direction.y -= 1.0;
    }
    if input.keys.pressed(KeyCode::KeyS) {
        direction.y += 1.0;
    }
    if input.keys.pressed(KeyCode::KeyA) {
        direction.x -= 1.0;
    }
    if input.keys.pressed(KeyCode::KeyD) {
        direction.x += 1.0;
    }
    if direction != Vec2::ZERO {
        let speed = input.cfg.pan_speed * (input.viewpoint.zoom / input.cfg.start_zoom).max(0.25);
        input.viewpoint.focus += direction.normalize() * speed * dt;
    }

    let mut zoom = input.viewpoint.zoom;
    if input.keys.pressed(KeyCode::KeyE) {
        zoom += input.cfg.zoom_speed * dt;
    }
    if input.keys.pressed(KeyCode::KeyQ) {
        zoom -= input.cfg.zoom_speed * dt;
    }
    for ev in input.scroll.read() {
        let lines = match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y / 40.0,
        };
        zoom -= lines * input.cfg.zoom_step;
    }
    input.viewpoint.zoom = zoom.clamp(input.cfg.min_zoom, input.cfg.max_zoom);
}

/// Eases the camera toward the viewpoint, keeping a fixed tilt.
pub fn follow_viewpoint(
    viewpoint: Res<Viewpoint>,
    cfg: Res<CameraSettings>,
    mut query: Query<&mut Transform, With<MapCamera>>,
) {
    let Ok(mut transform) = query.single_mut() else {
        return;
    };
    let target = Vec3::new(
        viewpoint.focus.x,
        viewpoint.zoom,
        viewpoint.focus.y + viewpoint.zoom * cfg.tilt,
    );
    transform.translation = transform.translation.lerp(target, cfg.follow_lerp);
    transform.look_to(Vec3::new(0.0, -1.0, -cfg.tilt), Vec3::Y);
}
