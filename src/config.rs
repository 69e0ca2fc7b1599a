//! Nested application configuration.
//!
//! [`KingdomConfig`] bundles every tunable the core and the host read. It is
//! a Bevy resource so the world inspector can show it while debugging.

use bevy::prelude::*;

use crate::error::ConfigError;
use crate::lod::LodSettings;
use crate::mapgen::GenerationSettings;
use crate::spatial::MapExtent;
use crate::streaming::StreamingSettings;

/// Top-level configuration, one section per subsystem.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct KingdomConfig {
    /// Map rectangle and center cell.
    pub map: MapExtent,
    /// Seed, fixed-layout radii and terrain noise.
    pub generation: GenerationSettings,
    /// Chunk size, load radius and per-tick budget.
    pub streaming: StreamingSettings,
    /// Zoom thresholds and recompute throttling.
    pub lod: LodSettings,
    /// Top-down camera behaviour.
    pub camera: CameraSettings,
    /// How streamed tiles are laid out and drawn.
    pub render: RenderSettings,
}

/// Pan and zoom limits for the top-down camera.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct CameraSettings {
    /// Pan speed in world-units per second at `start_zoom`.
    pub pan_speed: f32,
    /// Zoom change per scroll line.
    pub zoom_step: f32,
    /// Zoom change per second while Q/E is held.
    pub zoom_speed: f32,
    /// Closest camera height.
    pub min_zoom: f32,
    /// Farthest camera height.
    pub max_zoom: f32,
    /// Camera height at startup.
    pub start_zoom: f32,
    /// Backward offset as a fraction of height; tilts the view.
    pub tilt: f32,
    /// Per-frame lerp factor toward the viewpoint.
    pub follow_lerp: f32,
}

/// Tile layout and scene dressing.
#[derive(Clone, Debug, Reflect)]
pub struct RenderSettings {
    /// Distance in world-units between adjacent hex centers.
    pub hex_spacing: f32,
    /// Visual hex radius as a fraction of spacing; the rest is a gap.
    pub tile_fill: f32,
    /// Background clear color.
    pub clear_color: Color,
}

impl Default for KingdomConfig {
    fn default() -> Self {
        Self {
            map: MapExtent::default(),
            generation: GenerationSettings::default(),
            streaming: StreamingSettings::default(),
            lod: LodSettings::default(),
            camera: CameraSettings::default(),
            render: RenderSettings {
                hex_spacing: 1.0,
                tile_fill: 0.94,
                clear_color: Color::srgb(0.05, 0.07, 0.1),
            },
        }
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            pan_speed: 20.0,
            zoom_step: 3.0,
            zoom_speed: 30.0,
            min_zoom: 8.0,
            max_zoom: 110.0,
            start_zoom: 30.0,
            tilt: 0.6,
            follow_lerp: 0.2,
        }
    }
}

impl KingdomConfig {
    /// Checks every section the core consumes; the first failure wins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.map.validate()?;
        self.streaming.validate()?;
        self.lod.validate()
    }

    /// Replaces the map with a `width` × `height` rectangle centered on its
    /// middle cell.
    pub fn resize_map(&mut self, width: i32, height: i32) {
        self.map = MapExtent::centered(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(KingdomConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validate_reports_streaming_errors() {
        let mut cfg = KingdomConfig::default();
        cfg.streaming.chunk_size = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidChunkSize(0)));
    }

    #[test]
    fn validate_reports_lod_errors() {
        let mut cfg = KingdomConfig::default();
        cfg.lod.thresholds = [50.0, 40.0, 60.0];
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::UnorderedLodThresholds(_))
        ));
    }

    #[test]
    fn resize_map_recenters() {
        let mut cfg = KingdomConfig::default();
        cfg.resize_map(10, 20);
        assert_eq!(cfg.map.width, 10);
        assert_eq!(cfg.map.height, 20);
        assert!(cfg.map.contains(cfg.map.center));
        assert_eq!(cfg.validate(), Ok(()));
    }
}
