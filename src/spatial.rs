//! Map extent and the in-memory tile index built from the generator.

use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use hexx::Hex;

use crate::catalog::TerrainKind;
use crate::error::ConfigError;
use crate::mapgen::{GenerationSettings, MapGenerator, TileRecord};

/// Rectangular map bounds in axial space: `0 <= q < width`, `0 <= r < height`.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct MapExtent {
    /// Cells along q.
    pub width: i32,
    /// Cells along r.
    pub height: i32,
    /// Designated center cell (castle site).
    pub center: Hex,
}

impl MapExtent {
    /// Extent with the center at `(width / 2, height / 2)`.
    pub fn centered(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            center: Hex::new(width / 2, height / 2),
        }
    }

    /// Whether `hex` lies inside the map.
    pub fn contains(&self, hex: Hex) -> bool {
        (0..self.width).contains(&hex.x) && (0..self.height).contains(&hex.y)
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    /// All cells in row-major order (r outer, q inner).
    pub fn cells(&self) -> impl Iterator<Item = Hex> + '_ {
        (0..self.height).flat_map(move |r| (0..self.width).map(move |q| Hex::new(q, r)))
    }

    /// Rejects empty extents and off-map centers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::EmptyExtent {
                width: self.width,
                height: self.height,
            });
        }
        if !self.contains(self.center) {
            return Err(ConfigError::CenterOutOfBounds {
                q: self.center.x,
                r: self.center.y,
            });
        }
        Ok(())
    }
}

impl Default for MapExtent {
    fn default() -> Self {
        Self::centered(60, 60)
    }
}

/// One [`TileRecord`] per in-bounds cell, built once and read-only afterwards.
pub struct SpatialIndex {
    extent: MapExtent,
    tiles: HashMap<Hex, TileRecord>,
}

impl SpatialIndex {
    /// Runs the full-map generator and indexes the result.
    pub fn build(generator: &MapGenerator) -> Self {
        let tiles = generator
            .generate()
            .into_iter()
            .map(|tile| (tile.hex, tile))
            .collect();
        Self {
            extent: *generator.extent(),
            tiles,
        }
    }

    /// Shorthand for `build(&MapGenerator::new(extent, settings))`.
    pub fn generate(extent: MapExtent, settings: &GenerationSettings) -> Self {
        Self::build(&MapGenerator::new(extent, settings.clone()))
    }

    /// Tile at `hex`, or `None` outside the map.
    pub fn get(&self, hex: &Hex) -> Option<&TileRecord> {
        self.tiles.get(hex)
    }

    /// Whether `hex` has a tile.
    pub fn contains(&self, hex: &Hex) -> bool {
        self.tiles.contains_key(hex)
    }

    /// Number of indexed tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True when the index holds no tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Bounds the index was built for.
    pub fn extent(&self) -> &MapExtent {
        &self.extent
    }

    /// All tiles, unordered.
    pub fn iter(&self) -> impl Iterator<Item = &TileRecord> {
        self.tiles.values()
    }

    /// Tile count per terrain kind, sorted by kind.
    pub fn terrain_histogram(&self) -> Vec<(TerrainKind, usize)> {
        let mut counts: HashMap<TerrainKind, usize> = HashMap::new();
        for tile in self.tiles.values() {
            *counts.entry(tile.terrain).or_default() += 1;
        }
        let mut out: Vec<_> = counts.into_iter().collect();
        out.sort_by_key(|(kind, _)| *kind);
        out
    }
}
