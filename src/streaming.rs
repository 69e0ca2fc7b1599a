//! Chunk streaming around a moving viewpoint.
//!
//! The map is cut into square chunks of `chunk_size × chunk_size` cells. The
//! streamer keeps every in-bounds chunk within `load_radius` (per axis, so a
//! square footprint) of the viewpoint chunk materialised, and drains its load
//! and unload queues at a bounded rate per [`ChunkStreamer::tick`].
//!
//! Queued work is never cancelled. If a load finishes after the viewpoint has
//! moved away, the chunk is queued for unload again, and vice versa, so the
//! loaded set always converges on the latest neighbourhood once the queues
//! drain.

mod chunk;
mod decoration;

pub use chunk::{ChunkRecord, ChunkState};
pub use decoration::{Decoration, DecorationCatalog, DecorationRule, DecorationShape};

use std::collections::VecDeque;

use bevy::log::{debug, warn, warn_once};
use bevy::platform::collections::{HashMap, HashSet};
use bevy::prelude::{IVec2, Reflect};
use hexx::Hex;

use crate::catalog::TerrainKind;
use crate::error::ConfigError;
use crate::mapgen::{Structure, TileRecord};
use crate::math;
use crate::spatial::{MapExtent, SpatialIndex};

/// Chunking and rate-limit parameters.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct StreamingSettings {
    /// Chunk edge length in cells.
    pub chunk_size: i32,
    /// Neighbourhood half-size in chunks.
    pub load_radius: i32,
    /// Upper bound on loads (and separately unloads) per tick.
    pub max_ops_per_tick: usize,
}

impl Default for StreamingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 8,
            load_radius: 2,
            max_ops_per_tick: 4,
        }
    }
}

impl StreamingSettings {
    /// Rejects settings the streamer cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size <= 0 {
            return Err(ConfigError::InvalidChunkSize(self.chunk_size));
        }
        if self.load_radius < 0 {
            return Err(ConfigError::NegativeLoadRadius(self.load_radius));
        }
        if self.max_ops_per_tick == 0 {
            return Err(ConfigError::ZeroTickBudget);
        }
        Ok(())
    }
}

/// Host capability that turns tiles into placed objects and tears them down.
///
/// Returning `None` means the host could not produce the artifact (missing
/// asset or catalog entry); the streamer logs it and carries on.
pub trait ArtifactFactory {
    /// Opaque handle owned by a [`ChunkRecord`] until disposal.
    type Artifact;

    /// Base visual for a cell.
    fn create_tile(&mut self, tile: &TileRecord) -> Option<Self::Artifact>;

    /// Fixed building on a cell.
    fn create_structure(&mut self, tile: &TileRecord, structure: Structure)
    -> Option<Self::Artifact>;

    /// Decoration on a cell.
    fn create_decoration(
        &mut self,
        tile: &TileRecord,
        decoration: &Decoration,
    ) -> Option<Self::Artifact>;

    /// Releases an artifact previously returned by this factory.
    fn dispose(&mut self, artifact: Self::Artifact);
}

/// What one [`ChunkStreamer::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Chunks released.
    pub unloaded: usize,
    /// Chunks materialised.
    pub loaded: usize,
    /// Artifacts produced by the factory.
    pub artifacts_created: usize,
    /// Artifacts skipped because a collaborator could not supply them.
    pub skipped: usize,
}

impl TickReport {
    /// True when the tick did no work.
    pub fn is_idle(&self) -> bool {
        self.loaded == 0 && self.unloaded == 0
    }
}

/// Viewpoint chunk sentinel meaning "recompute on next update".
const NO_CHUNK: IVec2 = IVec2::new(i32::MIN, i32::MIN);

/// Tracks materialised chunks near the viewpoint and schedules load/unload.
pub struct ChunkStreamer<A> {
    chunk_size: i32,
    load_radius: i32,
    grid: IVec2,
    decorations: Option<DecorationCatalog>,
    loaded: HashMap<IVec2, ChunkRecord<A>>,
    load_queue: VecDeque<IVec2>,
    unload_queue: VecDeque<IVec2>,
    pending_load: HashSet<IVec2>,
    pending_unload: HashSet<IVec2>,
    wanted: HashSet<IVec2>,
    viewpoint: Option<Hex>,
    viewpoint_chunk: IVec2,
}

impl<A> ChunkStreamer<A> {
    /// Validates the configuration and prepares an empty streamer.
    pub fn new(extent: &MapExtent, settings: &StreamingSettings) -> Result<Self, ConfigError> {
        extent.validate()?;
        settings.validate()?;
        let grid = IVec2::new(
            math::chunks_to_cover(extent.width, settings.chunk_size),
            math::chunks_to_cover(extent.height, settings.chunk_size),
        );
        Ok(Self {
            chunk_size: settings.chunk_size,
            load_radius: settings.load_radius,
            grid,
            decorations: None,
            loaded: HashMap::new(),
            load_queue: VecDeque::new(),
            unload_queue: VecDeque::new(),
            pending_load: HashSet::new(),
            pending_unload: HashSet::new(),
            wanted: HashSet::new(),
            viewpoint: None,
            viewpoint_chunk: NO_CHUNK,
        })
    }

    /// Supplies the decoration catalog. Without one, decorated terrain is
    /// streamed bare and a warning is logged.
    pub fn with_decorations(mut self, catalog: DecorationCatalog) -> Self {
        self.decorations = Some(catalog);
        self
    }

    // ── Queries ────────────────────────────────────────────────────

    /// Chunk containing `hex`.
    pub fn chunk_of(&self, hex: Hex) -> IVec2 {
        math::chunk_of(hex, self.chunk_size)
    }

    /// Chunk edge length in cells.
    pub fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    /// Number of chunks along each axis.
    pub fn chunk_grid(&self) -> IVec2 {
        self.grid
    }

    /// Whether `coord` is inside the chunk grid.
    pub fn in_bounds(&self, coord: IVec2) -> bool {
        (0..self.grid.x).contains(&coord.x) && (0..self.grid.y).contains(&coord.y)
    }

    /// In-bounds chunks with `|dx| <= load_radius && |dy| <= load_radius`,
    /// row-major.
    ///
    /// Each axis is clipped to the grid before iterating, so the cost is
    /// bounded by the grid size whatever the radius.
    pub fn neighborhood(&self, center: IVec2) -> Vec<IVec2> {
        let r = self.load_radius;
        let span = |c: i32, len: i32| {
            c.saturating_sub(r).max(0)..=c.saturating_add(r).min(len - 1)
        };
        let columns = span(center.x, self.grid.x);
        span(center.y, self.grid.y)
            .flat_map(|y| columns.clone().map(move |x| IVec2::new(x, y)))
            .collect()
    }

    /// Lifecycle state of `coord`.
    pub fn state(&self, coord: IVec2) -> ChunkState {
        if self.pending_load.contains(&coord) {
            ChunkState::PendingLoad
        } else if self.pending_unload.contains(&coord) {
            ChunkState::PendingUnload
        } else if self.loaded.contains_key(&coord) {
            ChunkState::Loaded
        } else {
            ChunkState::Absent
        }
    }

    /// Record for a materialised chunk.
    pub fn chunk(&self, coord: IVec2) -> Option<&ChunkRecord<A>> {
        self.loaded.get(&coord)
    }

    /// Materialised chunk coordinates, unordered.
    pub fn loaded_chunks(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.loaded.keys().copied()
    }

    /// Number of materialised chunks.
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    /// Artifacts owned across all materialised chunks.
    pub fn artifact_count(&self) -> usize {
        self.loaded.values().map(|c| c.artifacts().len()).sum()
    }

    /// Chunks waiting to load.
    pub fn pending_loads(&self) -> usize {
        self.load_queue.len()
    }

    /// Chunks waiting to unload.
    pub fn pending_unloads(&self) -> usize {
        self.unload_queue.len()
    }

    /// True when both queues are empty.
    pub fn is_settled(&self) -> bool {
        self.load_queue.is_empty() && self.unload_queue.is_empty()
    }

    /// Chunk of the last processed viewpoint, if any.
    pub fn viewpoint_chunk(&self) -> Option<IVec2> {
        (self.viewpoint_chunk != NO_CHUNK).then_some(self.viewpoint_chunk)
    }

    // ── Scheduling ─────────────────────────────────────────────────

    /// Records the viewpoint cell and, if it entered a new chunk (or nothing
    /// is loaded yet), queues the loads and unloads needed to match the new
    /// neighbourhood. Returns whether the neighbourhood was recomputed.
    pub fn update_viewpoint(&mut self, hex: Hex) -> bool {
        self.viewpoint = Some(hex);
        let center = self.chunk_of(hex);
        if center == self.viewpoint_chunk && !self.loaded.is_empty() {
            return false;
        }
        self.viewpoint_chunk = center;

        let neighborhood = self.neighborhood(center);
        self.wanted = neighborhood.iter().copied().collect();

        for coord in neighborhood {
            if !self.loaded.contains_key(&coord) && !self.pending_load.contains(&coord) {
                self.enqueue_load(coord);
            }
        }

        let mut stale: Vec<IVec2> = self
            .loaded
            .keys()
            .filter(|c| !self.wanted.contains(*c) && !self.pending_unload.contains(*c))
            .copied()
            .collect();
        stale.sort_by_key(|c| (c.y, c.x));
        for coord in stale {
            self.enqueue_unload(coord);
        }

        debug!(
            "viewpoint chunk {center}: {} queued loads, {} queued unloads",
            self.load_queue.len(),
            self.unload_queue.len()
        );
        true
    }

    /// Processes up to `max_ops` unloads, then up to `max_ops` loads, each in
    /// FIFO order.
    pub fn tick<F>(&mut self, index: &SpatialIndex, factory: &mut F, max_ops: usize) -> TickReport
    where
        F: ArtifactFactory<Artifact = A>,
    {
        let mut report = TickReport::default();

        for _ in 0..max_ops {
            let Some(coord) = self.unload_queue.pop_front() else {
                break;
            };
            self.pending_unload.remove(&coord);
            self.release(coord, factory);
            report.unloaded += 1;
            if self.wanted.contains(&coord) {
                self.enqueue_load(coord);
            }
        }

        for _ in 0..max_ops {
            let Some(coord) = self.load_queue.pop_front() else {
                break;
            };
            self.pending_load.remove(&coord);
            let record = self.materialize(coord, index, factory, &mut report);
            self.loaded.insert(coord, record);
            report.loaded += 1;
            if !self.wanted.contains(&coord) {
                self.enqueue_unload(coord);
            }
        }

        if !report.is_idle() {
            debug!(
                "stream tick: -{} +{} chunks ({} loaded, {} queued)",
                report.unloaded,
                report.loaded,
                self.loaded.len(),
                self.load_queue.len() + self.unload_queue.len()
            );
        }
        report
    }

    /// Releases every loaded chunk now, drops queued work, and rebuilds the
    /// neighbourhood of the last viewpoint from scratch.
    pub fn force_reload<F>(&mut self, factory: &mut F)
    where
        F: ArtifactFactory<Artifact = A>,
    {
        let coords: Vec<IVec2> = self.loaded.keys().copied().collect();
        for coord in coords {
            self.release(coord, factory);
        }
        self.load_queue.clear();
        self.unload_queue.clear();
        self.pending_load.clear();
        self.pending_unload.clear();
        self.viewpoint_chunk = NO_CHUNK;

        if let Some(hex) = self.viewpoint {
            self.update_viewpoint(hex);
        }
    }

    // ── Internals ──────────────────────────────────────────────────

    fn enqueue_load(&mut self, coord: IVec2) {
        debug_assert!(!self.pending_unload.contains(&coord));
        if self.pending_load.insert(coord) {
            self.load_queue.push_back(coord);
        }
    }

    fn enqueue_unload(&mut self, coord: IVec2) {
        debug_assert!(!self.pending_load.contains(&coord));
        if self.pending_unload.insert(coord) {
            self.unload_queue.push_back(coord);
        }
    }

    fn release<F>(&mut self, coord: IVec2, factory: &mut F)
    where
        F: ArtifactFactory<Artifact = A>,
    {
        if let Some(record) = self.loaded.remove(&coord) {
            for artifact in record.release() {
                factory.dispose(artifact);
            }
        }
    }

    fn materialize<F>(
        &self,
        coord: IVec2,
        index: &SpatialIndex,
        factory: &mut F,
        report: &mut TickReport,
    ) -> ChunkRecord<A>
    where
        F: ArtifactFactory<Artifact = A>,
    {
        let mut record = ChunkRecord::new(coord);
        let mut skipped = 0;
        let origin = coord * self.chunk_size;

        for r in origin.y..origin.y + self.chunk_size {
            for q in origin.x..origin.x + self.chunk_size {
                // Partial chunks at the map edge have no tiles past the extent.
                let Some(tile) = index.get(&Hex::new(q, r)) else {
                    continue;
                };

                let mut artifacts = vec![factory.create_tile(tile)];
                if let Some(structure) = tile.structure {
                    artifacts.push(factory.create_structure(tile, structure));
                } else if self.needs_decoration(tile.terrain) {
                    artifacts.push(self.decorate(tile, factory));
                }

                for artifact in artifacts {
                    match artifact {
                        Some(a) => record.push(a),
                        None => skipped += 1,
                    }
                }
            }
        }

        if skipped > 0 {
            warn!("chunk {coord}: {skipped} artifacts unavailable, cells left bare");
        }
        report.artifacts_created += record.artifacts().len();
        report.skipped += skipped;
        record
    }

    /// Asks the catalog when one is configured; without it the built-in
    /// visual list decides, so the missing catalog still gets reported.
    fn needs_decoration(&self, kind: TerrainKind) -> bool {
        match &self.decorations {
            Some(catalog) => catalog.requires_decoration(kind),
            None => !kind.has_builtin_visual(),
        }
    }

    fn decorate<F>(&self, tile: &TileRecord, factory: &mut F) -> Option<A>
    where
        F: ArtifactFactory<Artifact = A>,
    {
        let Some(catalog) = &self.decorations else {
            warn_once!("no decoration catalog configured; streaming without decorations");
            return None;
        };
        let seed = math::coordinate_seed(catalog.seed(), tile.hex);
        let decoration = catalog.decoration_for(tile.terrain, seed)?;
        factory.create_decoration(tile, &decoration)
    }
}
