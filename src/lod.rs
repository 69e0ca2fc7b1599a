//! Zoom-driven level of detail.
//!
//! [`LodController`] classifies the camera zoom into one of four
//! [`DetailLevel`]s and tells registered [`LodObserver`]s when the level
//! changes. What each level means (hide decorations, drop shadows, ...) is up
//! to the observer; [`DetailPolicy`] is the stock mapping the renderer uses.

use bevy::log::info;
use bevy::prelude::Reflect;

use crate::error::ConfigError;

/// Discrete detail tiers, finest first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
pub enum DetailLevel {
    /// Everything drawn.
    #[default]
    Full,
    /// Decorations thinned.
    Medium,
    /// Few decorations.
    Low,
    /// Tiles and structures only.
    Minimal,
}

impl DetailLevel {
    /// Level for `zoom`: `Full <= t1 < Medium <= t2 < Low <= t3 < Minimal`.
    ///
    /// Total: NaN lands in `Minimal`.
    pub fn from_zoom(zoom: f32, settings: &LodSettings) -> Self {
        let [t1, t2, t3] = settings.thresholds;
        if zoom <= t1 {
            DetailLevel::Full
        } else if zoom <= t2 {
            DetailLevel::Medium
        } else if zoom <= t3 {
            DetailLevel::Low
        } else {
            DetailLevel::Minimal
        }
    }
}

/// Thresholds and recompute throttling.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct LodSettings {
    /// Upper zoom bound of Full, Medium and Low, strictly ascending.
    pub thresholds: [f32; 3],
    /// Seconds between forced recomputations.
    pub recompute_interval: f32,
    /// Zoom change that triggers an immediate recomputation.
    pub zoom_epsilon: f32,
}

impl Default for LodSettings {
    fn default() -> Self {
        Self {
            thresholds: [25.0, 45.0, 70.0],
            recompute_interval: 0.25,
            zoom_epsilon: 1.0,
        }
    }
}

impl LodSettings {
    /// Thresholds must be finite and strictly ascending.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [a, b, c] = self.thresholds;
        if a.is_finite() && b.is_finite() && c.is_finite() && a < b && b < c {
            Ok(())
        } else {
            Err(ConfigError::UnorderedLodThresholds(self.thresholds))
        }
    }
}

/// Receives the detail level on registration and on every change.
pub trait LodObserver: Send + Sync {
    /// Apply the policy for `level`.
    fn apply_detail(&mut self, level: DetailLevel);
}

/// Handle returned by [`LodController::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u32);

/// Classifies zoom into [`DetailLevel`] and notifies observers on change.
pub struct LodController {
    settings: LodSettings,
    current: DetailLevel,
    last_zoom: Option<f32>,
    since_recompute: f32,
    next_id: u32,
    observers: Vec<(ObserverId, Box<dyn LodObserver>)>,
}

impl LodController {
    /// Rejects unordered thresholds.
    pub fn new(settings: &LodSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            settings: settings.clone(),
            current: DetailLevel::default(),
            last_zoom: None,
            since_recompute: 0.0,
            next_id: 0,
            observers: Vec::new(),
        })
    }

    /// Current level.
    pub fn level(&self) -> DetailLevel {
        self.current
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Advances the throttle clock by `delta_secs` and, when due, reclassifies
    /// `zoom`. Observers hear only about actual level changes.
    pub fn update(&mut self, zoom: f32, delta_secs: f32) -> DetailLevel {
        self.since_recompute += delta_secs;
        let due = match self.last_zoom {
            None => true,
            Some(last) => {
                self.since_recompute >= self.settings.recompute_interval
                    || (zoom - last).abs() > self.settings.zoom_epsilon
            }
        };
        if !due {
            return self.current;
        }

        self.since_recompute = 0.0;
        self.last_zoom = Some(zoom);
        let level = DetailLevel::from_zoom(zoom, &self.settings);
        if level != self.current {
            info!("detail level {:?} -> {:?} at zoom {zoom:.1}", self.current, level);
            self.current = level;
            for (_, observer) in &mut self.observers {
                observer.apply_detail(level);
            }
        }
        self.current
    }

    /// Adds an observer and immediately applies the current level to it.
    pub fn register(&mut self, mut observer: Box<dyn LodObserver>) -> ObserverId {
        observer.apply_detail(self.current);
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Removes an observer. Unknown ids are ignored.
    pub fn unregister(&mut self, id: ObserverId) -> Option<Box<dyn LodObserver>> {
        let pos = self.observers.iter().position(|(oid, _)| *oid == id)?;
        Some(self.observers.remove(pos).1)
    }
}

/// Stock renderer policy per level.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct DetailPolicy {
    /// Fraction of decorations shown; a decoration is visible when its rank
    /// is below this.
    pub decoration_density: f32,
    /// Whether structures cast shadows.
    pub structure_shadows: bool,
}

impl DetailPolicy {
    /// Policy for `level`.
    pub fn for_level(level: DetailLevel) -> Self {
        let (decoration_density, structure_shadows) = match level {
            DetailLevel::Full => (1.0, true),
            DetailLevel::Medium => (0.6, true),
            DetailLevel::Low => (0.25, false),
            DetailLevel::Minimal => (0.0, false),
        };
        Self {
            decoration_density,
            structure_shadows,
        }
    }

    /// Whether a decoration with `rank` in `[0, 1)` is drawn.
    pub fn shows_decoration(&self, rank: f32) -> bool {
        rank < self.decoration_density
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Records every level it is told about.
    struct Recorder(Arc<Mutex<Vec<DetailLevel>>>);

    impl LodObserver for Recorder {
        fn apply_detail(&mut self, level: DetailLevel) {
            self.0.lock().unwrap().push(level);
        }
    }

    fn recorder() -> (Box<dyn LodObserver>, Arc<Mutex<Vec<DetailLevel>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (Box::new(Recorder(log.clone())), log)
    }

    fn controller() -> LodController {
        LodController::new(&LodSettings::default()).unwrap()
    }

    // ── Classification ─────────────────────────────────────────────

    #[test]
    fn threshold_edges_are_inclusive_upper_bounds() {
        let s = LodSettings::default();
        assert_eq!(DetailLevel::from_zoom(25.0, &s), DetailLevel::Full);
        assert_eq!(DetailLevel::from_zoom(25.01, &s), DetailLevel::Medium);
        assert_eq!(DetailLevel::from_zoom(45.0, &s), DetailLevel::Medium);
        assert_eq!(DetailLevel::from_zoom(70.0, &s), DetailLevel::Low);
        assert_eq!(DetailLevel::from_zoom(70.5, &s), DetailLevel::Minimal);
    }

    #[test]
    fn classification_is_monotonic_and_covers_all_levels() {
        let s = LodSettings::default();
        let levels: Vec<_> = (-100..=1500)
            .map(|i| DetailLevel::from_zoom(i as f32 * 0.1, &s))
            .collect();
        for w in levels.windows(2) {
            assert!(w[1] >= w[0], "level decreased as zoom grew");
        }
        for level in [
            DetailLevel::Full,
            DetailLevel::Medium,
            DetailLevel::Low,
            DetailLevel::Minimal,
        ] {
            assert!(levels.contains(&level), "{level:?} never produced");
        }
    }

    #[test]
    fn nan_zoom_is_minimal() {
        assert_eq!(
            DetailLevel::from_zoom(f32::NAN, &LodSettings::default()),
            DetailLevel::Minimal
        );
    }

    #[test]
    fn new_rejects_unordered_thresholds() {
        for thresholds in [[10.0, 10.0, 20.0], [30.0, 20.0, 40.0], [1.0, 2.0, f32::NAN]] {
            let s = LodSettings {
                thresholds,
                ..LodSettings::default()
            };
            assert!(matches!(
                LodController::new(&s),
                Err(ConfigError::UnorderedLodThresholds(_))
            ));
        }
    }

    // ── Update throttling ──────────────────────────────────────────

    #[test]
    fn update_follows_zoom_across_bands() {
        let mut lod = controller();
        assert_eq!(lod.update(10.0, 0.0), DetailLevel::Full);
        assert_eq!(lod.update(50.0, 0.0), DetailLevel::Low);
        assert_eq!(lod.update(100.0, 0.0), DetailLevel::Minimal);
        assert_eq!(lod.update(30.0, 0.0), DetailLevel::Medium);
    }

    #[test]
    fn small_zoom_change_holds_level_until_interval() {
        let mut lod = controller();
        lod.update(24.8, 0.0);
        assert_eq!(lod.level(), DetailLevel::Full);

        // Crosses t1 but moves less than epsilon and the interval has not passed.
        assert_eq!(lod.update(25.5, 0.1), DetailLevel::Full);
        // Interval elapsed: recomputed.
        assert_eq!(lod.update(25.5, 0.2), DetailLevel::Medium);
    }

    // ── Observers ──────────────────────────────────────────────────

    #[test]
    fn register_applies_current_level_immediately() {
        let mut lod = controller();
        lod.update(80.0, 0.0);
        let (observer, log) = recorder();
        lod.register(observer);
        assert_eq!(*log.lock().unwrap(), vec![DetailLevel::Minimal]);
    }

    #[test]
    fn observers_hear_changes_only() {
        let mut lod = controller();
        let (observer, log) = recorder();
        lod.register(observer);

        lod.update(5.0, 0.0);
        lod.update(10.0, 1.0);
        lod.update(40.0, 0.0);
        lod.update(42.0, 0.0);
        lod.update(90.0, 0.0);

        assert_eq!(
            *log.lock().unwrap(),
            vec![DetailLevel::Full, DetailLevel::Medium, DetailLevel::Minimal]
        );
    }

    #[test]
    fn unregistered_observer_stops_hearing() {
        let mut lod = controller();
        let (observer, log) = recorder();
        let id = lod.register(observer);
        assert!(lod.unregister(id).is_some());
        assert_eq!(lod.observer_count(), 0);

        lod.update(90.0, 0.0);
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn unregistering_unknown_id_is_a_noop() {
        let mut lod = controller();
        let (observer, _) = recorder();
        let id = lod.register(observer);
        lod.unregister(id);
        assert!(lod.unregister(id).is_none());
        assert!(lod.unregister(ObserverId(99)).is_none());
    }

    // ── Policy ─────────────────────────────────────────────────────

    #[test]
    fn policy_density_falls_with_detail() {
        let densities: Vec<f32> = [
            DetailLevel::Full,
            DetailLevel::Medium,
            DetailLevel::Low,
            DetailLevel::Minimal,
        ]
        .into_iter()
        .map(|l| DetailPolicy::for_level(l).decoration_density)
        .collect();
        for w in densities.windows(2) {
            assert!(w[0] > w[1]);
        }
        assert!(!DetailPolicy::for_level(DetailLevel::Minimal).shows_decoration(0.0));
        assert!(DetailPolicy::for_level(DetailLevel::Full).shows_decoration(0.999));
    }
}
