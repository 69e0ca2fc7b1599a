//! Terrain kinds and their fixed gameplay properties.

use bevy::prelude::*;

/// Every terrain category a tile can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub enum TerrainKind {
    /// Open grassland.
    Plains,
    /// Woodland.
    Forest,
    /// Rolling hills.
    Hill,
    /// Impassable peaks.
    Mountain,
    /// Lakes and the sea around the map.
    Water,
    /// Dry sand.
    Desert,
    /// Frozen ground.
    Snow,
    /// Marsh.
    Swamp,
    /// Paved road.
    Road,
    /// Road crossing water.
    Bridge,
    /// Shoreline.
    Coast,
    /// Flowing water.
    River,
    /// Gentle incline.
    Slope,
    /// Steep incline.
    SteepSlope,
    /// Farmland resource site.
    Farm,
    /// Generic ore mine.
    Mine,
    /// Stone quarry.
    Quarry,
    /// Gold mine.
    GoldMine,
    /// Gem mine.
    GemMine,
}

/// Fixed per-terrain modifiers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainProperties {
    /// Movement cost multiplier (1.0 = plains).
    pub movement_multiplier: f32,
    /// Whether land units may enter.
    pub is_passable: bool,
    /// Additive defence modifier for a unit standing here.
    pub defense_bonus: f32,
    /// Additive attack modifier for a unit attacking from here.
    pub attack_bonus: f32,
    /// Additive stealth modifier.
    pub stealth_bonus: f32,
    /// Extra sight range in cells.
    pub vision_bonus: i32,
    /// Upkeep multiplier for units stationed here.
    pub food_consumption_multiplier: f32,
    /// Yield multiplier applied to the tile's resource level.
    pub resource_yield_multiplier: f32,
    /// Base colour used by the renderer.
    pub display_color: Color,
}

impl TerrainKind {
    /// All kinds in declaration order.
    pub const ALL: [TerrainKind; 19] = [
        TerrainKind::Plains,
        TerrainKind::Forest,
        TerrainKind::Hill,
        TerrainKind::Mountain,
        TerrainKind::Water,
        TerrainKind::Desert,
        TerrainKind::Snow,
        TerrainKind::Swamp,
        TerrainKind::Road,
        TerrainKind::Bridge,
        TerrainKind::Coast,
        TerrainKind::River,
        TerrainKind::Slope,
        TerrainKind::SteepSlope,
        TerrainKind::Farm,
        TerrainKind::Mine,
        TerrainKind::Quarry,
        TerrainKind::GoldMine,
        TerrainKind::GemMine,
    ];

    /// Gameplay properties for this kind.
    pub fn properties(self) -> TerrainProperties {
        use TerrainKind::*;
        // (move, passable, def, atk, stealth, vision, food, yield, color)
        let (m, p, d, a, s, v, f, y, c) = match self {
            Plains => (1.0, true, 0.0, 0.0, 0.0, 0, 1.0, 1.0, Color::srgb(0.56, 0.74, 0.36)),
            Forest => (1.5, true, 0.25, -0.1, 0.4, -1, 1.1, 1.0, Color::srgb(0.16, 0.42, 0.18)),
            Hill => (2.0, true, 0.3, 0.15, 0.1, 1, 1.2, 1.0, Color::srgb(0.55, 0.5, 0.3)),
            Mountain => (3.0, false, 0.5, 0.2, 0.2, 2, 1.5, 1.0, Color::srgb(0.45, 0.42, 0.4)),
            Water => (1.0, false, 0.0, 0.0, 0.0, 0, 1.0, 0.0, Color::srgb(0.15, 0.35, 0.7)),
            Desert => (1.5, true, -0.1, 0.0, -0.2, 1, 1.5, 0.5, Color::srgb(0.87, 0.78, 0.5)),
            Snow => (2.0, true, 0.0, -0.1, 0.1, 0, 1.4, 0.5, Color::srgb(0.92, 0.94, 0.97)),
            Swamp => (2.5, true, -0.2, -0.2, 0.3, -1, 1.3, 0.5, Color::srgb(0.33, 0.4, 0.28)),
            Road => (0.5, true, -0.1, 0.0, -0.3, 0, 1.0, 1.0, Color::srgb(0.6, 0.55, 0.45)),
            Bridge => (0.75, true, -0.2, 0.0, -0.3, 0, 1.0, 1.0, Color::srgb(0.5, 0.38, 0.25)),
            Coast => (1.25, true, -0.05, 0.0, 0.0, 1, 1.0, 1.0, Color::srgb(0.85, 0.82, 0.62)),
            River => (2.0, true, -0.25, -0.25, 0.0, 0, 1.0, 1.0, Color::srgb(0.25, 0.5, 0.8)),
            Slope => (1.5, true, 0.1, 0.05, 0.0, 0, 1.1, 1.0, Color::srgb(0.5, 0.6, 0.32)),
            SteepSlope => (2.5, true, 0.2, 0.1, 0.05, 1, 1.2, 1.0, Color::srgb(0.48, 0.48, 0.34)),
            Farm => (1.0, true, 0.0, 0.0, -0.1, 0, 0.8, 1.5, Color::srgb(0.8, 0.74, 0.3)),
            Mine => (1.25, true, 0.1, 0.0, 0.0, 0, 1.2, 1.25, Color::srgb(0.4, 0.36, 0.34)),
            Quarry => (1.25, true, 0.05, 0.0, 0.0, 0, 1.2, 1.0, Color::srgb(0.66, 0.64, 0.6)),
            GoldMine => (1.25, true, 0.1, 0.0, 0.0, 0, 1.2, 2.0, Color::srgb(0.9, 0.75, 0.2)),
            GemMine => (1.25, true, 0.1, 0.0, 0.0, 0, 1.2, 2.5, Color::srgb(0.6, 0.3, 0.75)),
        };
        TerrainProperties {
            movement_multiplier: m,
            is_passable: p,
            defense_bonus: d,
            attack_bonus: a,
            stealth_bonus: s,
            vision_bonus: v,
            food_consumption_multiplier: f,
            resource_yield_multiplier: y,
            display_color: c,
        }
    }

    /// Whether this kind is a yield-producing resource site.
    pub fn is_resource_site(self) -> bool {
        matches!(
            self,
            TerrainKind::Farm
                | TerrainKind::Mine
                | TerrainKind::Quarry
                | TerrainKind::GoldMine
                | TerrainKind::GemMine
        )
    }

    /// Kinds whose tile visual is complete on its own and never receive a
    /// separate decoration.
    pub fn has_builtin_visual(self) -> bool {
        matches!(
            self,
            TerrainKind::Plains
                | TerrainKind::Water
                | TerrainKind::Road
                | TerrainKind::Bridge
                | TerrainKind::Coast
                | TerrainKind::River
                | TerrainKind::Desert
                | TerrainKind::Snow
        )
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            TerrainKind::Plains => "plains",
            TerrainKind::Forest => "forest",
            TerrainKind::Hill => "hill",
            TerrainKind::Mountain => "mountain",
            TerrainKind::Water => "water",
            TerrainKind::Desert => "desert",
            TerrainKind::Snow => "snow",
            TerrainKind::Swamp => "swamp",
            TerrainKind::Road => "road",
            TerrainKind::Bridge => "bridge",
            TerrainKind::Coast => "coast",
            TerrainKind::River => "river",
            TerrainKind::Slope => "slope",
            TerrainKind::SteepSlope => "steep slope",
            TerrainKind::Farm => "farm",
            TerrainKind::Mine => "mine",
            TerrainKind::Quarry => "quarry",
            TerrainKind::GoldMine => "gold mine",
            TerrainKind::GemMine => "gem mine",
        }
    }
}
