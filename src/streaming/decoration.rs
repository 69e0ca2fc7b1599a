use std::f32::consts::TAU;

use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::catalog::TerrainKind;

/// Primitive silhouettes the host knows how to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum DecorationShape {
    /// Conifer.
    Tree,
    /// Boulder.
    Rock,
    /// Mountain peak.
    Peak,
    /// Marsh reeds.
    Reeds,
    /// Crop rows.
    Field,
    /// Mine headframe.
    Headframe,
    /// Gem cluster.
    Crystal,
}

/// Placement envelope for one terrain kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecorationRule {
    /// What to place.
    pub shape: DecorationShape,
    /// Smallest uniform scale.
    pub min_scale: f32,
    /// Largest uniform scale.
    pub max_scale: f32,
    /// Largest distance from the cell center, in cell units.
    pub max_offset: f32,
}

impl DecorationRule {
    const fn new(shape: DecorationShape, min_scale: f32, max_scale: f32, max_offset: f32) -> Self {
        Self {
            shape,
            min_scale,
            max_scale,
            max_offset,
        }
    }
}

/// A concrete decoration placement derived from a seed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decoration {
    /// What to place.
    pub shape: DecorationShape,
    /// Offset from the cell center, in cell units.
    pub offset: Vec2,
    /// Uniform scale.
    pub scale: f32,
    /// Yaw in radians.
    pub rotation: f32,
    /// Stable value in `[0, 1)` used to thin decorations at lower detail.
    pub rank: f32,
}

/// Terrain → decoration lookup with seeded placement.
#[derive(Clone, Debug, Default)]
pub struct DecorationCatalog {
    seed: u64,
    rules: HashMap<TerrainKind, DecorationRule>,
}

impl DecorationCatalog {
    /// Rules for every decorated kind the generator can produce.
    pub fn standard(seed: u64) -> Self {
        use DecorationShape::*;
        Self::empty(seed)
            .with_rule(TerrainKind::Forest, DecorationRule::new(Tree, 0.8, 1.3, 0.25))
            .with_rule(TerrainKind::Hill, DecorationRule::new(Rock, 0.7, 1.1, 0.3))
            .with_rule(TerrainKind::Mountain, DecorationRule::new(Peak, 0.9, 1.4, 0.1))
            .with_rule(TerrainKind::Swamp, DecorationRule::new(Reeds, 0.6, 1.0, 0.3))
            .with_rule(TerrainKind::Slope, DecorationRule::new(Rock, 0.5, 0.8, 0.3))
            .with_rule(TerrainKind::SteepSlope, DecorationRule::new(Rock, 0.8, 1.2, 0.2))
            .with_rule(TerrainKind::Farm, DecorationRule::new(Field, 1.0, 1.0, 0.0))
            .with_rule(TerrainKind::Mine, DecorationRule::new(Headframe, 0.9, 1.0, 0.1))
            .with_rule(TerrainKind::Quarry, DecorationRule::new(Rock, 1.0, 1.2, 0.1))
            .with_rule(TerrainKind::GoldMine, DecorationRule::new(Headframe, 1.0, 1.1, 0.1))
            .with_rule(TerrainKind::GemMine, DecorationRule::new(Crystal, 0.9, 1.1, 0.1))
    }

    /// Catalog with no rules.
    pub fn empty(seed: u64) -> Self {
        Self {
            seed,
            rules: HashMap::new(),
        }
    }

    /// Adds or replaces the rule for `kind`.
    pub fn with_rule(mut self, kind: TerrainKind, rule: DecorationRule) -> Self {
        self.rules.insert(kind, rule);
        self
    }

    /// Base seed mixed with cell coordinates for placements.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether tiles of `kind` should carry a decoration at all.
    pub fn requires_decoration(&self, kind: TerrainKind) -> bool {
        !kind.has_builtin_visual()
    }

    /// Placement for `kind` driven by `seed`, or `None` when no rule exists.
    pub fn decoration_for(&self, kind: TerrainKind, seed: u64) -> Option<Decoration> {
        let rule = self.rules.get(&kind)?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let angle = rng.gen_range(0.0..TAU);
        let radius = rng.gen_range(0.0..=rule.max_offset);
        Some(Decoration {
            shape: rule.shape,
            offset: Vec2::from_angle(angle) * radius,
            scale: rng.gen_range(rule.min_scale..=rule.max_scale),
            rotation: rng.gen_range(0.0..TAU),
            rank: rng.gen_range(0.0..1.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_placement() {
        let catalog = DecorationCatalog::standard(1);
        assert_eq!(
            catalog.decoration_for(TerrainKind::Forest, 99),
            catalog.decoration_for(TerrainKind::Forest, 99)
        );
    }

    #[test]
    fn placement_respects_rule_envelope() {
        let catalog = DecorationCatalog::standard(1);
        for seed in 0..500 {
            let d = catalog.decoration_for(TerrainKind::Hill, seed).unwrap();
            assert_eq!(d.shape, DecorationShape::Rock);
            assert!(d.offset.length() <= 0.3 + 1e-5);
            assert!((0.7..=1.1).contains(&d.scale));
            assert!((0.0..1.0).contains(&d.rank));
        }
    }

    #[test]
    fn builtin_visual_kinds_need_no_decoration() {
        let catalog = DecorationCatalog::standard(1);
        assert!(!catalog.requires_decoration(TerrainKind::Water));
        assert!(!catalog.requires_decoration(TerrainKind::Plains));
        assert!(catalog.requires_decoration(TerrainKind::Forest));
    }

    #[test]
    fn standard_catalog_covers_every_decorated_kind() {
        let catalog = DecorationCatalog::standard(1);
        for kind in TerrainKind::ALL {
            if catalog.requires_decoration(kind) {
                assert!(catalog.decoration_for(kind, 0).is_some(), "{kind:?}");
            }
        }
    }

    #[test]
    fn empty_catalog_has_no_placements() {
        assert!(DecorationCatalog::empty(1)
            .decoration_for(TerrainKind::Forest, 3)
            .is_none());
    }
}
