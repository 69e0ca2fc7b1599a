use std::sync::{Arc, Mutex};

use bevy::ecs::system::SystemParam;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use hexx::{Hex, HexLayout};

use crate::catalog::TerrainKind;
use crate::lod::{DetailLevel, DetailPolicy, LodController, LodObserver};
use crate::mapgen::Structure;
use crate::spatial::SpatialIndex;
use crate::streaming::{ChunkStreamer, DecorationShape, TickReport};

/// Generated tiles for the whole map. Read-only after startup.
#[derive(Resource)]
pub struct MapIndex(pub SpatialIndex);

/// Chunk streamer whose artifacts are spawned entities.
#[derive(Resource)]
pub struct Streaming(pub ChunkStreamer<Entity>);

/// Zoom → detail level classifier.
#[derive(Resource)]
pub struct Lod(pub LodController);

/// World-space hex layout shared by the factory and the viewpoint lookup.
#[derive(Resource, Clone)]
pub struct MapLayout(pub HexLayout);

/// Level handed over by the LOD observer, drained once per frame.
#[derive(Resource, Clone, Default)]
pub struct PendingDetail(Arc<Mutex<Option<DetailLevel>>>);

impl PendingDetail {
    /// Observer that writes into this slot.
    pub fn observer(&self) -> Box<dyn LodObserver> {
        Box::new(DetailRelay(self.0.clone()))
    }

    /// Takes the latest level, if one arrived since the last call.
    pub fn take(&self) -> Option<DetailLevel> {
        self.0.lock().ok()?.take()
    }
}

struct DetailRelay(Arc<Mutex<Option<DetailLevel>>>);

impl LodObserver for DetailRelay {
    fn apply_detail(&mut self, level: DetailLevel) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = Some(level);
        }
    }
}

/// Detail level currently applied to the scene.
#[derive(Resource, Clone, Copy, Debug, Reflect)]
pub struct ActiveDetail {
    /// Level last received from the controller.
    pub level: DetailLevel,
    /// Policy derived from `level`.
    pub policy: DetailPolicy,
}

impl Default for ActiveDetail {
    fn default() -> Self {
        Self {
            level: DetailLevel::Full,
            policy: DetailPolicy::for_level(DetailLevel::Full),
        }
    }
}

/// Running totals for the debug overlay.
#[derive(Resource, Default, Debug)]
pub struct StreamStats {
    /// Most recent non-idle tick.
    pub last: TickReport,
    /// Chunks loaded since startup.
    pub loads: usize,
    /// Chunks unloaded since startup.
    pub unloads: usize,
    /// Artifacts the factory could not produce.
    pub skipped: usize,
    /// Forced reloads.
    pub reloads: usize,
}

impl StreamStats {
    /// Folds one tick into the totals.
    pub fn record(&mut self, report: TickReport) {
        if report.is_idle() {
            return;
        }
        self.last = report;
        self.loads += report.loaded;
        self.unloads += report.unloaded;
        self.skipped += report.skipped;
    }
}

/// Mesh and material for one decoration shape.
pub struct DecorationAsset {
    /// Primitive mesh, centered on its origin.
    pub mesh: Handle<Mesh>,
    /// Flat-colored material.
    pub material: Handle<StandardMaterial>,
    /// Lift that puts the mesh base on the ground at scale 1.
    pub half_height: f32,
}

/// Shared handles used by the entity factory.
#[derive(Resource)]
pub struct TileAssets {
    /// Unit hex face mesh.
    pub tile_mesh: Handle<Mesh>,
    /// Uniform scale applied to the tile mesh.
    pub tile_scale: f32,
    /// One material per terrain kind, from the catalog display color.
    pub terrain_materials: HashMap<TerrainKind, Handle<StandardMaterial>>,
    /// Per-shape decoration assets.
    pub decorations: HashMap<DecorationShape, DecorationAsset>,
    /// Per-structure meshes and their half heights.
    pub structures: HashMap<Structure, (Handle<Mesh>, f32)>,
    /// Shared stone material for structures.
    pub structure_material: Handle<StandardMaterial>,
}

/// Base visual of a streamed cell.
#[derive(Component, Reflect)]
pub struct TileCell {
    /// Cell coordinate.
    pub hex: Hex,
    /// Terrain shown.
    pub terrain: TerrainKind,
    /// Resource tier, 0 when none.
    pub resource_level: u8,
}

/// Decoration on a streamed cell.
#[derive(Component, Reflect)]
pub struct DecorationCell {
    /// Cell coordinate.
    pub hex: Hex,
    /// Thinning rank; see [`DetailPolicy::shows_decoration`].
    pub rank: f32,
}

/// Castle or tower on a streamed cell.
#[derive(Component, Reflect)]
pub struct StructureCell {
    /// Cell coordinate.
    pub hex: Hex,
    /// Which building.
    pub kind: Structure,
}

/// Everything a streaming system needs to run the streamer against the ECS.
#[derive(SystemParam)]
pub struct StreamCtx<'w, 's> {
    /// Spawns and despawns artifacts.
    pub commands: Commands<'w, 's>,
    /// The streamer.
    pub streaming: ResMut<'w, Streaming>,
    /// Tile source for loads.
    pub index: Res<'w, MapIndex>,
    /// Absent until the asset startup system ran.
    pub assets: Option<Res<'w, TileAssets>>,
    /// Hex → world placement.
    pub layout: Res<'w, MapLayout>,
    /// Policy new artifacts are spawned with.
    pub detail: Res<'w, ActiveDetail>,
    /// Overlay counters.
    pub stats: ResMut<'w, StreamStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_detail_keeps_latest_and_drains() {
        let pending = PendingDetail::default();
        let mut observer = pending.observer();
        observer.apply_detail(DetailLevel::Medium);
        observer.apply_detail(DetailLevel::Low);
        assert_eq!(pending.take(), Some(DetailLevel::Low));
        assert_eq!(pending.take(), None);
    }

    #[test]
    fn stats_ignore_idle_ticks() {
        let mut stats = StreamStats::default();
        stats.record(TickReport {
            loaded: 2,
            artifacts_created: 40,
            ..TickReport::default()
        });
        stats.record(TickReport::default());
        assert_eq!(stats.loads, 2);
        assert_eq!(stats.last.artifacts_created, 40);
    }
}
