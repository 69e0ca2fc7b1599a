//! Map world: composition root and ECS host for the streaming core.
//!
//! At startup the configured map is generated into a [`MapIndex`], a
//! [`Streaming`] chunk streamer and an [`Lod`] controller are built, and a
//! detail observer is registered. Each frame the streamer follows the
//! [`Viewpoint`](crate::Viewpoint), spawning and despawning tile entities
//! through an [`ArtifactFactory`](crate::streaming::ArtifactFactory), and the
//! current detail policy is applied to decorations and structures.

mod entities;
mod factory;
mod startup_systems;
mod systems;

pub use entities::{
    ActiveDetail, DecorationCell, Lod, MapIndex, MapLayout, StreamStats, Streaming, StructureCell,
    TileCell,
};
pub use factory::EntityFactory;

use bevy::prelude::*;
use hexx::HexLayout;

use crate::config::KingdomConfig;
use crate::{GameState, MapSet, Viewpoint};

/// World plugin: builds the map core at startup and streams it at runtime.
pub struct WorldPlugin(pub KingdomConfig);

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        let layout = HexLayout {
            scale: Vec2::splat(self.0.render.hex_spacing),
            ..default()
        };

        app.register_type::<KingdomConfig>()
            .register_type::<Viewpoint>()
            .register_type::<ActiveDetail>()
            .register_type::<TileCell>()
            .register_type::<DecorationCell>()
            .register_type::<StructureCell>()
            .insert_resource(self.0.clone())
            .insert_resource(ClearColor(self.0.render.clear_color))
            .insert_resource(MapLayout(layout))
            .init_resource::<Viewpoint>()
            .init_resource::<ActiveDetail>()
            .init_resource::<StreamStats>()
            .configure_sets(
                Update,
                (MapSet::Viewpoint, MapSet::Streaming, MapSet::Detail).chain(),
            )
            .add_systems(
                Startup,
                (startup_systems::build_tile_assets, startup_systems::setup_world),
            )
            .add_systems(
                Update,
                systems::force_reload_on_key
                    .before(systems::stream_chunks)
                    .run_if(resource_exists::<Streaming>),
            )
            .add_systems(
                Update,
                systems::stream_chunks
                    .in_set(MapSet::Streaming)
                    .run_if(resource_exists::<Streaming>),
            )
            .add_systems(
                Update,
                (systems::update_detail_level, systems::apply_detail_policy)
                    .chain()
                    .in_set(MapSet::Detail)
                    .run_if(resource_exists::<Lod>),
            );

        app.add_systems(
            Update,
            systems::draw_stream_overlay
                .run_if(in_state(GameState::Debugging))
                .run_if(resource_exists::<Streaming>),
        );
    }
}
