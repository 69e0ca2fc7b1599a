//! Kingdom map viewer.
//!
//! Generates a hex kingdom, streams it in chunks around a top-down camera and
//! thins decorations as the camera zooms out. Tab toggles the inspector and
//! streaming overlay, R forces a chunk reload, Esc quits.

use bevy::app::AppExit;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_inspector_egui::quick::WorldInspectorPlugin;

use kingdom_map::GameState;
use kingdom_map::camera::CameraPlugin;
use kingdom_map::config::KingdomConfig;
use kingdom_map::world::WorldPlugin;

/// Command-line overrides for the default configuration.
#[cfg(feature = "native")]
#[derive(clap::Parser, Debug)]
#[command(name = "kingdom-map", about = "Procedural hex kingdom with chunk streaming")]
struct Args {
    /// Generation seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Map width in cells.
    #[arg(long)]
    width: Option<i32>,
    /// Map height in cells.
    #[arg(long)]
    height: Option<i32>,
    /// Chunk edge length in cells.
    #[arg(long)]
    chunk_size: Option<i32>,
    /// Chunks kept loaded on each side of the viewpoint chunk.
    #[arg(long)]
    load_radius: Option<i32>,
    /// Loads (and unloads) allowed per frame.
    #[arg(long)]
    max_ops: Option<usize>,
}

#[cfg(feature = "native")]
impl Args {
    fn into_config(self) -> KingdomConfig {
        let mut cfg = KingdomConfig::default();
        if let Some(seed) = self.seed {
            cfg.generation.seed = seed;
        }
        if self.width.is_some() || self.height.is_some() {
            let width = self.width.unwrap_or(cfg.map.width);
            let height = self.height.unwrap_or(cfg.map.height);
            cfg.resize_map(width, height);
        }
        if let Some(chunk_size) = self.chunk_size {
            cfg.streaming.chunk_size = chunk_size;
        }
        if let Some(load_radius) = self.load_radius {
            cfg.streaming.load_radius = load_radius;
        }
        if let Some(max_ops) = self.max_ops {
            cfg.streaming.max_ops_per_tick = max_ops;
        }
        cfg
    }
}

#[cfg(feature = "native")]
fn load_config() -> KingdomConfig {
    use clap::Parser;
    Args::parse().into_config()
}

#[cfg(not(feature = "native"))]
fn load_config() -> KingdomConfig {
    KingdomConfig::default()
}

fn main() {
    let config = load_config();
    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Kingdom Map".into(),
                    ..default()
                }),
                ..default()
            })
            .set(LogPlugin {
                filter: "wgpu=error,naga=warn,kingdom_map=debug".into(),
                ..default()
            }),
    )
    .register_type::<GameState>()
    .init_state::<GameState>()
    .add_plugins(bevy_egui::EguiPlugin::default())
    .add_plugins(CameraPlugin(config.camera.clone()))
    .add_plugins(WorldPlugin(config))
    .add_systems(Update, exit_on_esc)
    .add_systems(Update, toggle_debug)
    .add_plugins(WorldInspectorPlugin::new().run_if(in_state(GameState::Debugging)));

    #[cfg(feature = "native")]
    app.add_plugins(bevy::remote::RemotePlugin::default())
        .add_plugins(bevy::remote::http::RemoteHttpPlugin::default());

    app.run();
}

fn toggle_debug(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next: ResMut<NextState<GameState>>,
) {
    if keys.just_pressed(KeyCode::Tab) {
        next.set(match state.get() {
            GameState::Running => GameState::Debugging,
            GameState::Debugging => GameState::Running,
        });
    }
}

fn exit_on_esc(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}

#[cfg(all(test, feature = "native"))]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn no_flags_keep_defaults() {
        let cfg = Args::parse_from(["kingdom-map"]).into_config();
        assert_eq!(cfg.map, KingdomConfig::default().map);
        assert_eq!(cfg.streaming, KingdomConfig::default().streaming);
    }

    #[test]
    fn flags_override_sections() {
        let cfg = Args::parse_from([
            "kingdom-map",
            "--seed",
            "7",
            "--width",
            "10",
            "--chunk-size",
            "5",
            "--load-radius",
            "1",
            "--max-ops",
            "2",
        ])
        .into_config();
        assert_eq!(cfg.generation.seed, 7);
        assert_eq!(cfg.map.width, 10);
        assert_eq!(cfg.map.height, 60);
        assert_eq!(cfg.map.center.x, 5);
        assert_eq!(cfg.streaming.chunk_size, 5);
        assert_eq!(cfg.streaming.load_radius, 1);
        assert_eq!(cfg.streaming.max_ops_per_tick, 2);
        assert_eq!(cfg.validate(), Ok(()));
    }
}
