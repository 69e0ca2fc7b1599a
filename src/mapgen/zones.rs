use bevy::prelude::*;
use rand::Rng;

use crate::catalog::TerrainKind;

/// Yield tier range `(min, max)` per zone, nearest zone first.
pub const ZONE_TIERS: [(u8, u8); 4] = [(7, 7), (5, 6), (3, 4), (1, 2)];

/// Four concentric distance bands around the map center used to tier mines.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct MineZones {
    /// Outer radius of each zone, ascending.
    pub radii: [f32; 4],
}

impl Default for MineZones {
    fn default() -> Self {
        Self {
            radii: [10.0, 16.0, 22.0, 28.0],
        }
    }
}

/// A placed resource site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MineSite {
    /// Resource terrain kind.
    pub terrain: TerrainKind,
    /// Yield tier, 1..=7.
    pub level: u8,
    /// Zone index, 0 = nearest.
    pub zone: usize,
}

impl MineZones {
    /// Zone index for a distance from center, or `None` beyond the last zone.
    pub fn zone_of(&self, distance: f32) -> Option<usize> {
        self.radii.iter().position(|&outer| distance <= outer)
    }

    /// Picks the site kind and tier for a cell at `distance`.
    ///
    /// Draws from `rng` only when a zone matches.
    pub fn place<R: Rng>(&self, distance: f32, rng: &mut R) -> Option<MineSite> {
        let zone = self.zone_of(distance)?;
        let (lo, hi) = ZONE_TIERS[zone];
        let level = rng.gen_range(lo..=hi);
        let coin = rng.gen_range(0.0_f64..1.0) < 0.5;
        let terrain = match (zone, coin) {
            (0, true) => TerrainKind::GoldMine,
            (0, false) => TerrainKind::GemMine,
            (1, true) => TerrainKind::GoldMine,
            (1, false) => TerrainKind::Mine,
            (2, true) => TerrainKind::Mine,
            (2, false) => TerrainKind::Quarry,
            _ => TerrainKind::Quarry,
        };
        Some(MineSite {
            terrain,
            level,
            zone,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn zone_boundaries_are_inclusive() {
        let zones = MineZones::default();
        assert_eq!(zones.zone_of(0.0), Some(0));
        assert_eq!(zones.zone_of(10.0), Some(0));
        assert_eq!(zones.zone_of(10.01), Some(1));
        assert_eq!(zones.zone_of(22.0), Some(2));
        assert_eq!(zones.zone_of(28.0), Some(3));
        assert_eq!(zones.zone_of(28.5), None);
    }

    #[test]
    fn beyond_outer_zone_places_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert!(MineZones::default().place(40.0, &mut rng).is_none());
    }

    #[test]
    fn placed_tiers_stay_in_zone_range() {
        let zones = MineZones::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for step in 0..280 {
            let distance = step as f32 * 0.1;
            let site = zones.place(distance, &mut rng).expect("inside zones");
            let (lo, hi) = ZONE_TIERS[site.zone];
            assert!((lo..=hi).contains(&site.level), "{site:?}");
            assert!(site.terrain.is_resource_site());
        }
    }

    #[test]
    fn zone_kinds_match_tiering() {
        let zones = MineZones::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let inner = zones.place(1.0, &mut rng).unwrap();
            assert!(matches!(
                inner.terrain,
                TerrainKind::GoldMine | TerrainKind::GemMine
            ));
            let outer = zones.place(25.0, &mut rng).unwrap();
            assert_eq!(outer.terrain, TerrainKind::Quarry);
        }
    }

    #[test]
    fn tier_ceilings_never_increase_outward() {
        for pair in ZONE_TIERS.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }
}
