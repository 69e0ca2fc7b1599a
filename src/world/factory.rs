use bevy::light::NotShadowCaster;
use bevy::log::warn;
use bevy::prelude::*;
use hexx::HexLayout;

use super::entities::{DecorationCell, StructureCell, TileAssets, TileCell};
use crate::lod::DetailPolicy;
use crate::mapgen::{Structure, TileRecord};
use crate::streaming::{ArtifactFactory, Decoration};

/// Spawns streamed tiles as mesh entities.
///
/// Every artifact is a root entity so a chunk's disposal is a flat list of
/// despawns.
pub struct EntityFactory<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    assets: &'a TileAssets,
    layout: &'a HexLayout,
    policy: DetailPolicy,
}

impl<'a, 'w, 's> EntityFactory<'a, 'w, 's> {
    /// New artifacts follow `policy` until the next detail change.
    pub fn new(
        commands: &'a mut Commands<'w, 's>,
        assets: &'a TileAssets,
        layout: &'a HexLayout,
        policy: DetailPolicy,
    ) -> Self {
        Self {
            commands,
            assets,
            layout,
            policy,
        }
    }

    fn ground(&self, tile: &TileRecord) -> Vec2 {
        self.layout.hex_to_world_pos(tile.hex)
    }

    fn spacing(&self) -> f32 {
        self.layout.scale.x
    }
}

impl ArtifactFactory for EntityFactory<'_, '_, '_> {
    type Artifact = Entity;

    fn create_tile(&mut self, tile: &TileRecord) -> Option<Entity> {
        let Some(material) = self.assets.terrain_materials.get(&tile.terrain) else {
            warn!("no material for {:?}", tile.terrain);
            return None;
        };
        let pos = self.ground(tile);
        let entity = self
            .commands
            .spawn((
                TileCell {
                    hex: tile.hex,
                    terrain: tile.terrain,
                    resource_level: tile.resource_level,
                },
                Name::new(format!("Tile({},{})", tile.hex.x, tile.hex.y)),
                Mesh3d(self.assets.tile_mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::from_xyz(pos.x, 0.0, pos.y)
                    .with_scale(Vec3::splat(self.assets.tile_scale)),
            ))
            .id();
        Some(entity)
    }

    fn create_structure(&mut self, tile: &TileRecord, structure: Structure) -> Option<Entity> {
        let (mesh, half_height) = self.assets.structures.get(&structure)?;
        let pos = self.ground(tile);
        let spacing = self.spacing();
        let mut entity = self.commands.spawn((
            StructureCell {
                hex: tile.hex,
                kind: structure,
            },
            Name::new(format!("{structure:?}({},{})", tile.hex.x, tile.hex.y)),
            Mesh3d(mesh.clone()),
            MeshMaterial3d(self.assets.structure_material.clone()),
            Transform::from_xyz(pos.x, half_height * spacing, pos.y)
                .with_scale(Vec3::splat(spacing)),
        ));
        if !self.policy.structure_shadows {
            entity.insert(NotShadowCaster);
        }
        Some(entity.id())
    }

    fn create_decoration(&mut self, tile: &TileRecord, decoration: &Decoration) -> Option<Entity> {
        let asset = self.assets.decorations.get(&decoration.shape)?;
        let spacing = self.spacing();
        let pos = self.ground(tile) + decoration.offset * spacing;
        let scale = decoration.scale * spacing;
        let visibility = if self.policy.shows_decoration(decoration.rank) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        let entity = self
            .commands
            .spawn((
                DecorationCell {
                    hex: tile.hex,
                    rank: decoration.rank,
                },
                Mesh3d(asset.mesh.clone()),
                MeshMaterial3d(asset.material.clone()),
                Transform::from_xyz(pos.x, asset.half_height * scale, pos.y)
                    .with_rotation(Quat::from_rotation_y(decoration.rotation))
                    .with_scale(Vec3::splat(scale)),
                visibility,
            ))
            .id();
        Some(entity)
    }

    fn dispose(&mut self, artifact: Entity) {
        self.commands.entity(artifact).despawn();
    }
}
