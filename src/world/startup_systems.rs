use bevy::asset::RenderAssetUsages;
use bevy::log::{error, info};
use bevy::mesh::Indices;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use hexx::{HexLayout, PlaneMeshBuilder};

use super::entities::{
    DecorationAsset, Lod, MapIndex, MapLayout, PendingDetail, Streaming, TileAssets,
};
use crate::Viewpoint;
use crate::catalog::TerrainKind;
use crate::config::KingdomConfig;
use crate::error::ConfigError;
use crate::lod::LodController;
use crate::mapgen::Structure;
use crate::spatial::SpatialIndex;
use crate::streaming::{ChunkStreamer, DecorationCatalog, DecorationShape};

// ── Composition root ───────────────────────────────────────────────

/// Builds the index, streamer and LOD controller from [`KingdomConfig`] and
/// inserts them as resources. An invalid configuration exits the app.
pub fn setup_world(
    mut commands: Commands,
    cfg: Res<KingdomConfig>,
    layout: Res<MapLayout>,
    mut viewpoint: ResMut<Viewpoint>,
    mut exit: MessageWriter<AppExit>,
) {
    let (index, streamer, mut lod) = match build_core(&cfg) {
        Ok(core) => core,
        Err(err) => {
            error!("invalid map configuration: {err}");
            exit.write(AppExit::error());
            return;
        }
    };

    let extent = index.extent();
    info!(
        "generated {} tiles ({}x{}, seed {}), {} chunks of {} cells",
        index.len(),
        extent.width,
        extent.height,
        cfg.generation.seed,
        streamer.chunk_grid().element_product(),
        streamer.chunk_size(),
    );
    let histogram: Vec<String> = index
        .terrain_histogram()
        .into_iter()
        .map(|(kind, count)| format!("{}={count}", kind.label()))
        .collect();
    info!("terrain: {}", histogram.join(" "));

    viewpoint.focus = layout.0.hex_to_world_pos(extent.center);

    let pending = PendingDetail::default();
    lod.register(pending.observer());

    commands.insert_resource(MapIndex(index));
    commands.insert_resource(Streaming(streamer));
    commands.insert_resource(Lod(lod));
    commands.insert_resource(pending);
}

fn build_core(
    cfg: &KingdomConfig,
) -> Result<(SpatialIndex, ChunkStreamer<Entity>, LodController), ConfigError> {
    cfg.validate()?;
    let streamer = ChunkStreamer::new(&cfg.map, &cfg.streaming)?
        .with_decorations(DecorationCatalog::standard(cfg.generation.seed));
    let lod = LodController::new(&cfg.lod)?;
    let index = SpatialIndex::generate(cfg.map, &cfg.generation);
    Ok((index, streamer, lod))
}

// ── Assets ─────────────────────────────────────────────────────────

/// Creates the shared hex mesh, one material per terrain and the primitive
/// meshes for decorations and structures.
pub fn build_tile_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<KingdomConfig>,
) {
    let unit_layout = HexLayout {
        scale: Vec2::splat(1.0),
        ..default()
    };
    let hex_mesh_info = PlaneMeshBuilder::new(&unit_layout).build();
    let hex_mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, hex_mesh_info.vertices)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, hex_mesh_info.normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, hex_mesh_info.uvs)
    .with_inserted_indices(Indices::U16(hex_mesh_info.indices));

    let terrain_materials = TerrainKind::ALL
        .into_iter()
        .map(|kind| {
            let material = materials.add(StandardMaterial {
                base_color: kind.properties().display_color,
                perceptual_roughness: 0.9,
                ..default()
            });
            (kind, material)
        })
        .collect();

    let mut decorations = HashMap::new();
    let mut decoration = |shape: DecorationShape, mesh: Mesh, half_height: f32, color: Color| {
        let asset = DecorationAsset {
            mesh: meshes.add(mesh),
            material: materials.add(StandardMaterial {
                base_color: color,
                perceptual_roughness: 0.8,
                ..default()
            }),
            half_height,
        };
        decorations.insert(shape, asset);
    };
    decoration(
        DecorationShape::Tree,
        Cone::new(0.22, 0.7).into(),
        0.35,
        Color::srgb(0.1, 0.35, 0.15),
    );
    decoration(
        DecorationShape::Rock,
        Sphere::new(0.18).into(),
        0.1,
        Color::srgb(0.5, 0.48, 0.45),
    );
    decoration(
        DecorationShape::Peak,
        Cone::new(0.45, 0.9).into(),
        0.45,
        Color::srgb(0.55, 0.55, 0.6),
    );
    decoration(
        DecorationShape::Reeds,
        Cylinder::new(0.04, 0.35).into(),
        0.175,
        Color::srgb(0.4, 0.45, 0.2),
    );
    decoration(
        DecorationShape::Field,
        Cuboid::new(0.7, 0.03, 0.5).into(),
        0.015,
        Color::srgb(0.8, 0.7, 0.3),
    );
    decoration(
        DecorationShape::Headframe,
        Cuboid::new(0.16, 0.5, 0.16).into(),
        0.25,
        Color::srgb(0.35, 0.25, 0.15),
    );
    decoration(
        DecorationShape::Crystal,
        Cuboid::new(0.18, 0.32, 0.18).into(),
        0.16,
        Color::srgb(0.4, 0.8, 0.95),
    );

    let mut structures = HashMap::new();
    structures.insert(Structure::Castle, (meshes.add(Cuboid::new(0.8, 0.6, 0.8)), 0.3));
    structures.insert(Structure::Tower, (meshes.add(Cylinder::new(0.2, 0.9)), 0.45));

    let structure_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.75, 0.72, 0.65),
        ..default()
    });

    commands.insert_resource(TileAssets {
        tile_mesh: meshes.add(hex_mesh),
        tile_scale: cfg.render.hex_spacing * cfg.render.tile_fill,
        terrain_materials,
        decorations,
        structures,
        structure_material,
    });

    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 9000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(20.0, 40.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
