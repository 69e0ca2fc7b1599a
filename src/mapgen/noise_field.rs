use bevy::prelude::*;
use hexx::Hex;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::catalog::TerrainKind;
use crate::math;

/// Sampling scales and classification cut-offs for natural terrain.
///
/// The thresholds are empirically tuned; both samples are in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct NoiseSettings {
    /// Fbm octave count.
    pub octaves: usize,
    /// Cell-to-noise scale for the elevation sample.
    pub elevation_scale: f64,
    /// Offset added to elevation sample coordinates.
    pub elevation_offset: f64,
    /// Cell-to-noise scale for the moisture sample.
    pub moisture_scale: f64,
    /// Offset added to moisture sample coordinates.
    pub moisture_offset: f64,
    /// Elevation above which a cell is mountain.
    pub mountain_above: f32,
    /// Elevation above which a cell is hill.
    pub hill_above: f32,
    /// Elevation below which a cell is water.
    pub water_below: f32,
    /// Elevation below which a cell is swamp (checked after water).
    pub swamp_below: f32,
    /// Moisture above which a cell is forest.
    pub forest_above: f32,
    /// Moisture below which a cell is desert or snow.
    pub arid_below: f32,
    /// Arid cells above this elevation are snow, below it desert.
    pub snow_elevation: f32,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            octaves: 3,
            elevation_scale: 0.08,
            elevation_offset: 100.37,
            moisture_scale: 0.12,
            moisture_offset: 512.71,
            mountain_above: 0.72,
            hill_above: 0.63,
            water_below: 0.27,
            swamp_below: 0.33,
            forest_above: 0.62,
            arid_below: 0.36,
            snow_elevation: 0.5,
        }
    }
}

fn fold_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

/// Two independently scaled coherent-noise samples over the cell grid.
pub struct NoiseField {
    fbm: Fbm<Perlin>,
    settings: NoiseSettings,
}

impl NoiseField {
    /// Builds the sampler. The 64-bit seed is folded to the 32 bits the
    /// permutation table takes, so every seed bit affects the terrain.
    pub fn new(seed: u64, settings: &NoiseSettings) -> Self {
        let fbm: Fbm<Perlin> = Fbm::new(fold_seed(seed)).set_octaves(settings.octaves.max(1));
        Self {
            fbm,
            settings: settings.clone(),
        }
    }

    /// `(elevation, moisture)` for a cell, each in `[0, 1]`.
    pub fn sample(&self, hex: Hex) -> (f32, f32) {
        let s = &self.settings;
        let (q, r) = (hex.x as f64, hex.y as f64);
        let elevation = self.fbm.get([
            q * s.elevation_scale + s.elevation_offset,
            r * s.elevation_scale + s.elevation_offset,
        ]);
        let moisture = self.fbm.get([
            q * s.moisture_scale + s.moisture_offset,
            r * s.moisture_scale + s.moisture_offset,
        ]);
        (
            math::map_noise_to_range(elevation, 0.0, 1.0),
            math::map_noise_to_range(moisture, 0.0, 1.0),
        )
    }

    /// Natural terrain for a pair of samples. Plains is the default band.
    pub fn classify(&self, elevation: f32, moisture: f32) -> TerrainKind {
        let s = &self.settings;
        if elevation > s.mountain_above {
            TerrainKind::Mountain
        } else if elevation > s.hill_above {
            TerrainKind::Hill
        } else if elevation < s.water_below {
            TerrainKind::Water
        } else if elevation < s.swamp_below {
            TerrainKind::Swamp
        } else if moisture > s.forest_above {
            TerrainKind::Forest
        } else if moisture < s.arid_below {
            if elevation > s.snow_elevation {
                TerrainKind::Snow
            } else {
                TerrainKind::Desert
            }
        } else {
            TerrainKind::Plains
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> NoiseField {
        NoiseField::new(42, &NoiseSettings::default())
    }

    #[test]
    fn samples_are_normalised() {
        let f = field();
        for q in -20..20 {
            for r in -20..20 {
                let (e, m) = f.sample(Hex::new(q, r));
                assert!((0.0..=1.0).contains(&e), "elevation {e} at ({q},{r})");
                assert!((0.0..=1.0).contains(&m), "moisture {m} at ({q},{r})");
            }
        }
    }

    #[test]
    fn samples_are_deterministic() {
        let a = field();
        let b = field();
        let hex = Hex::new(17, -4);
        assert_eq!(a.sample(hex), b.sample(hex));
    }

    #[test]
    fn high_seed_bits_change_the_noise() {
        assert_ne!(fold_seed(42), fold_seed(42 | (1 << 32)));
        let low = NoiseField::new(42, &NoiseSettings::default());
        let high = NoiseField::new(42 | (1 << 32), &NoiseSettings::default());
        let differs = (0..10)
            .flat_map(|q| (0..10).map(move |r| Hex::new(q, r)))
            .any(|hex| low.sample(hex) != high.sample(hex));
        assert!(differs);
    }

    #[test]
    fn elevation_bands_win_over_moisture() {
        let f = field();
        assert_eq!(f.classify(0.9, 0.9), TerrainKind::Mountain);
        assert_eq!(f.classify(0.65, 0.1), TerrainKind::Hill);
        assert_eq!(f.classify(0.1, 0.9), TerrainKind::Water);
        assert_eq!(f.classify(0.3, 0.9), TerrainKind::Swamp);
    }

    #[test]
    fn moisture_bands() {
        let f = field();
        assert_eq!(f.classify(0.5, 0.8), TerrainKind::Forest);
        assert_eq!(f.classify(0.55, 0.1), TerrainKind::Snow);
        assert_eq!(f.classify(0.45, 0.1), TerrainKind::Desert);
        assert_eq!(f.classify(0.5, 0.5), TerrainKind::Plains);
    }
}
