//! Deterministic procedural map generation.
//!
//! Each cell is classified by a fixed priority list: the castle at the center,
//! a swamp ring with corner towers, the inner road cross, the water and coast
//! bands along the map edges, scattered resource sites tiered by distance from
//! the center, and finally noise-driven natural terrain.
//!
//! Two entry points share the same classifier:
//! - [`MapGenerator::generate`] walks the whole extent row-major with one
//!   seeded stream. This is what the [`SpatialIndex`](crate::spatial::SpatialIndex)
//!   is built from.
//! - [`MapGenerator::generate_tile`] seeds a fresh stream per cell from
//!   `(seed, q, r)`, so it is independent of access order. Its random draws
//!   differ from the row-major walk; only the fixed rules agree between the two.

mod noise_field;
mod zones;

pub use noise_field::{NoiseField, NoiseSettings};
pub use zones::{MineSite, MineZones, ZONE_TIERS};

use bevy::prelude::*;
use hexx::Hex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::catalog::TerrainKind;
use crate::math;
use crate::spatial::MapExtent;

/// Fixed buildings placed by the generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum Structure {
    /// The capital at the map center.
    Castle,
    /// Watchtowers on the corners of the swamp ring.
    Tower,
}

/// Generated, immutable descriptor of one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRecord {
    /// Cell coordinate.
    pub hex: Hex,
    /// Terrain category.
    pub terrain: TerrainKind,
    /// Resource yield tier; 0 when the cell is not a resource site.
    pub resource_level: u8,
    /// Fixed building, if any.
    pub structure: Option<Structure>,
}

impl TileRecord {
    fn new(hex: Hex, terrain: TerrainKind) -> Self {
        Self {
            hex,
            terrain,
            resource_level: 0,
            structure: None,
        }
    }

    fn with_structure(mut self, structure: Structure) -> Self {
        self.structure = Some(structure);
        self
    }

    fn with_level(mut self, level: u8) -> Self {
        self.resource_level = level;
        self
    }
}

/// Tunables for map generation.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct GenerationSettings {
    /// Seed for noise and resource placement.
    pub seed: u64,
    /// Half-size of the inner (road/plains) square around the center.
    pub inner_radius: i32,
    /// Half-size of the outer square bounding the swamp ring.
    pub outer_radius: i32,
    /// Width of the water band along every border.
    pub edge_water: i32,
    /// Width of the coast band just inside the water band.
    pub coast_width: i32,
    /// Probability that an eligible cell rolls a resource site.
    pub mine_chance: f64,
    /// Probability that a plains cell becomes a farm.
    pub farm_chance: f64,
    /// Distance bands for resource tiering.
    pub zones: MineZones,
    /// Natural terrain sampling.
    pub noise: NoiseSettings,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            inner_radius: 2,
            outer_radius: 5,
            edge_water: 3,
            coast_width: 3,
            mine_chance: 0.03,
            farm_chance: 0.02,
            zones: MineZones::default(),
            noise: NoiseSettings::default(),
        }
    }
}

/// Tier given to farms rolled on plains.
const FARM_LEVEL: u8 = 1;

/// Turns coordinates into [`TileRecord`]s for one extent and settings.
pub struct MapGenerator {
    extent: MapExtent,
    settings: GenerationSettings,
    noise: NoiseField,
}

impl MapGenerator {
    /// Prepares a generator; noise tables are built here once.
    pub fn new(extent: MapExtent, settings: GenerationSettings) -> Self {
        let noise = NoiseField::new(settings.seed, &settings.noise);
        Self {
            extent,
            settings,
            noise,
        }
    }

    /// Map bounds.
    pub fn extent(&self) -> &MapExtent {
        &self.extent
    }

    /// Generation tunables.
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Generates every cell of the extent in row-major order from a single
    /// stream seeded with `settings.seed`. Bit-identical across calls.
    pub fn generate(&self) -> Vec<TileRecord> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.settings.seed);
        self.extent
            .cells()
            .map(|hex| self.classify(hex, &mut rng))
            .collect()
    }

    /// Generates a single cell from a stream seeded by `(seed, q, r)`.
    ///
    /// Total over all coordinates; cells outside the extent fall in the
    /// water band.
    pub fn generate_tile(&self, hex: Hex) -> TileRecord {
        let mut rng = ChaCha8Rng::seed_from_u64(math::coordinate_seed(self.settings.seed, hex));
        self.classify(hex, &mut rng)
    }

    fn classify<R: Rng>(&self, hex: Hex, rng: &mut R) -> TileRecord {
        if let Some(tile) = self.fixed_tile(hex) {
            return tile;
        }

        let s = &self.settings;
        if rng.gen_range(0.0_f64..1.0) < s.mine_chance {
            let distance = math::axial_distance(hex, self.extent.center);
            if let Some(site) = s.zones.place(distance, rng) {
                return TileRecord::new(hex, site.terrain).with_level(site.level);
            }
        }

        let (elevation, moisture) = self.noise.sample(hex);
        match self.noise.classify(elevation, moisture) {
            TerrainKind::Plains if rng.gen_range(0.0_f64..1.0) < s.farm_chance => {
                TileRecord::new(hex, TerrainKind::Farm).with_level(FARM_LEVEL)
            }
            terrain => TileRecord::new(hex, terrain),
        }
    }

    /// Coordinate-only rules: castle, swamp ring, inner cross, water, coast.
    fn fixed_tile(&self, hex: Hex) -> Option<TileRecord> {
        let s = &self.settings;
        let center = self.extent.center;
        // Widened so cells near the i32 limits cannot overflow.
        let dq = (i64::from(hex.x) - i64::from(center.x)).abs();
        let dr = (i64::from(hex.y) - i64::from(center.y)).abs();
        let inner = i64::from(s.inner_radius);
        let outer = i64::from(s.outer_radius);

        if dq == 0 && dr == 0 {
            return Some(
                TileRecord::new(hex, TerrainKind::Plains).with_structure(Structure::Castle),
            );
        }

        let in_inner = dq <= inner && dr <= inner;
        let in_outer = dq <= outer && dr <= outer;

        if in_outer && !in_inner {
            let swamp = TileRecord::new(hex, TerrainKind::Swamp);
            return Some(if dq == outer && dr == outer {
                swamp.with_structure(Structure::Tower)
            } else {
                swamp
            });
        }

        if in_inner {
            let terrain = if dq == 0 || dr == 0 {
                TerrainKind::Road
            } else {
                TerrainKind::Plains
            };
            return Some(TileRecord::new(hex, terrain));
        }

        let (q, r) = (i64::from(hex.x), i64::from(hex.y));
        let edge = q
            .min(r)
            .min(i64::from(self.extent.width) - 1 - q)
            .min(i64::from(self.extent.height) - 1 - r);
        let edge_water = i64::from(s.edge_water);
        if edge < edge_water {
            return Some(TileRecord::new(hex, TerrainKind::Water));
        }
        if edge < edge_water + i64::from(s.coast_width) {
            return Some(TileRecord::new(hex, TerrainKind::Coast));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(seed: u64) -> MapGenerator {
        MapGenerator::new(
            MapExtent::default(),
            GenerationSettings {
                seed,
                ..GenerationSettings::default()
            },
        )
    }

    fn tile_at(tiles: &[TileRecord], q: i32, r: i32) -> TileRecord {
        *tiles.iter().find(|t| t.hex == Hex::new(q, r)).unwrap()
    }

    #[test]
    fn full_generation_is_bit_identical() {
        let g = generator(42);
        assert_eq!(g.generate(), g.generate());
        assert_eq!(g.generate(), generator(42).generate());
    }

    #[test]
    fn generate_tile_is_deterministic() {
        let g = generator(42);
        for hex in g.extent().cells() {
            assert_eq!(g.generate_tile(hex), g.generate_tile(hex));
        }
    }

    #[test]
    fn generate_tile_is_total_outside_extent() {
        let g = generator(9);
        assert_eq!(g.generate_tile(Hex::new(-40, 7)).terrain, TerrainKind::Water);
        assert_eq!(g.generate_tile(Hex::new(500, 500)).terrain, TerrainKind::Water);
    }

    #[test]
    fn generate_tile_handles_extreme_coordinates() {
        let g = generator(9);
        for hex in [
            Hex::new(i32::MIN, 0),
            Hex::new(i32::MAX, i32::MAX),
            Hex::new(0, i32::MIN),
            Hex::new(i32::MIN, i32::MAX),
        ] {
            let tile = g.generate_tile(hex);
            assert_eq!(tile.terrain, TerrainKind::Water, "{hex:?}");
            assert_eq!(tile.structure, None);
        }
    }

    #[test]
    fn fixed_rules_agree_between_entry_points() {
        let g = generator(5);
        let tiles = g.generate();
        for tile in &tiles {
            if g.fixed_tile(tile.hex).is_some() {
                assert_eq!(*tile, g.generate_tile(tile.hex));
            }
        }
    }

    #[test]
    fn exactly_one_castle_at_center_on_plains() {
        for seed in [1, 42, 9001] {
            let g = generator(seed);
            let castles: Vec<_> = g
                .generate()
                .into_iter()
                .filter(|t| t.structure == Some(Structure::Castle))
                .collect();
            assert_eq!(castles.len(), 1);
            assert_eq!(castles[0].hex, g.extent().center);
            assert_eq!(castles[0].terrain, TerrainKind::Plains);
        }
    }

    #[test]
    fn swamp_ring_shape() {
        let g = generator(42);
        let tiles = g.generate();
        let c = g.extent().center;

        let corner = tile_at(&tiles, c.x + 5, c.y + 5);
        assert_eq!(corner.terrain, TerrainKind::Swamp);
        assert_eq!(corner.structure, Some(Structure::Tower));

        let edge = tile_at(&tiles, c.x + 5, c.y + 4);
        assert_eq!(edge.terrain, TerrainKind::Swamp);
        assert_eq!(edge.structure, None);

        let inner = tile_at(&tiles, c.x + 2, c.y + 2);
        assert!(matches!(inner.terrain, TerrainKind::Plains | TerrainKind::Road));
    }

    #[test]
    fn four_towers_on_outer_corners() {
        let g = generator(42);
        let c = g.extent().center;
        let mut towers: Vec<_> = g
            .generate()
            .into_iter()
            .filter(|t| t.structure == Some(Structure::Tower))
            .map(|t| (t.hex.x - c.x, t.hex.y - c.y))
            .collect();
        towers.sort();
        assert_eq!(towers, vec![(-5, -5), (-5, 5), (5, -5), (5, 5)]);
    }

    #[test]
    fn inner_square_is_road_cross_on_plains() {
        let g = generator(42);
        let tiles = g.generate();
        let c = g.extent().center;
        for dq in -2..=2 {
            for dr in -2..=2 {
                if dq == 0 && dr == 0 {
                    continue;
                }
                let tile = tile_at(&tiles, c.x + dq, c.y + dr);
                let expected = if dq == 0 || dr == 0 {
                    TerrainKind::Road
                } else {
                    TerrainKind::Plains
                };
                assert_eq!(tile.terrain, expected, "offset ({dq},{dr})");
            }
        }
    }

    #[test]
    fn borders_are_water_then_coast() {
        let g = generator(42);
        let tiles = g.generate();
        for r in 0..3 {
            assert_eq!(tile_at(&tiles, 20, r).terrain, TerrainKind::Water);
            assert_eq!(tile_at(&tiles, 59 - r, 20).terrain, TerrainKind::Water);
        }
        for r in 3..6 {
            assert_eq!(tile_at(&tiles, 20, r).terrain, TerrainKind::Coast);
            assert_eq!(tile_at(&tiles, 20, 59 - r).terrain, TerrainKind::Coast);
        }
        assert_ne!(tile_at(&tiles, 20, 6).terrain, TerrainKind::Coast);
    }

    #[test]
    fn resource_tiers_do_not_increase_with_distance() {
        for seed in [1, 7, 42, 1234, 99_999] {
            let g = generator(seed);
            let zones = &g.settings().zones;
            let mut max_tier = [0u8; 4];
            for tile in g.generate() {
                if tile.resource_level == 0 || tile.terrain == TerrainKind::Farm {
                    continue;
                }
                let distance = math::axial_distance(tile.hex, g.extent().center);
                let zone = zones.zone_of(distance).expect("mines only inside zones");
                max_tier[zone] = max_tier[zone].max(tile.resource_level);
            }
            for pair in max_tier.windows(2) {
                assert!(pair[0] >= pair[1] || pair[0] == 0, "seed {seed}: {max_tier:?}");
            }
        }
    }

    #[test]
    fn resource_levels_match_site_kinds() {
        let g = generator(42);
        for tile in g.generate() {
            if tile.terrain.is_resource_site() {
                assert!((1..=7).contains(&tile.resource_level), "{tile:?}");
            } else {
                assert_eq!(tile.resource_level, 0, "{tile:?}");
            }
            if tile.terrain == TerrainKind::Farm {
                assert_eq!(tile.resource_level, FARM_LEVEL);
            }
        }
    }

    #[test]
    fn different_seeds_give_different_maps() {
        assert_ne!(generator(1).generate(), generator(2).generate());
    }
}
