//! Pure computation helpers extracted for testability.
//!
//! All functions in this module are free of Bevy ECS dependencies and operate
//! on plain numeric / [`Hex`] inputs, making them straightforward to unit-test.

use bevy::prelude::IVec2;
use hexx::Hex;

/// Maps a noise value from the standard `[-1, 1]` range into `[min, max]`.
///
/// Fractal noise can overshoot `[-1, 1]` slightly, so the result is clamped.
pub fn map_noise_to_range(noise_val: f64, min: f32, max: f32) -> f32 {
    let t = ((noise_val as f32 + 1.0) / 2.0).clamp(0.0, 1.0);
    min + t * (max - min)
}

/// Straight-line distance between two cells, treating axial `(q, r)` as a
/// plain 2D vector.
pub fn axial_distance(a: Hex, b: Hex) -> f32 {
    let dq = (i64::from(a.x) - i64::from(b.x)) as f32;
    let dr = (i64::from(a.y) - i64::from(b.y)) as f32;
    (dq * dq + dr * dr).sqrt()
}

/// Chunk containing `hex` for square chunks of `chunk_size` cells.
///
/// Uses floor division so `(-1, -1)` lands in chunk `(-1, -1)`, not `(0, 0)`.
pub fn chunk_of(hex: Hex, chunk_size: i32) -> IVec2 {
    IVec2::new(hex.x.div_euclid(chunk_size), hex.y.div_euclid(chunk_size))
}

/// Number of chunks needed to cover `cells` cells along one axis.
pub fn chunks_to_cover(cells: i32, chunk_size: i32) -> i32 {
    (cells + chunk_size - 1).div_euclid(chunk_size)
}

/// Derives a well-mixed 64-bit seed from a base seed and a cell coordinate.
///
/// SplitMix64 finaliser over the packed coordinate; neighbouring cells get
/// uncorrelated streams.
pub fn coordinate_seed(seed: u64, hex: Hex) -> u64 {
    let packed = ((hex.x as u32 as u64) << 32) | (hex.y as u32 as u64);
    let mut z = seed ^ packed.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── map_noise_to_range ──────────────────────────────────────────

    #[test]
    fn noise_min_maps_to_range_min() {
        assert_eq!(map_noise_to_range(-1.0, 0.0, 10.0), 0.0);
    }

    #[test]
    fn noise_max_maps_to_range_max() {
        assert_eq!(map_noise_to_range(1.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn noise_zero_maps_to_midpoint() {
        let result = map_noise_to_range(0.0, 2.0, 6.0);
        assert!((result - 4.0).abs() < 1e-6);
    }

    #[test]
    fn noise_overshoot_is_clamped() {
        assert_eq!(map_noise_to_range(1.4, 0.0, 1.0), 1.0);
        assert_eq!(map_noise_to_range(-1.3, 0.0, 1.0), 0.0);
    }

    // ── axial_distance ──────────────────────────────────────────────

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(axial_distance(Hex::new(4, 7), Hex::new(4, 7)), 0.0);
    }

    #[test]
    fn distance_is_euclidean() {
        let d = axial_distance(Hex::new(0, 0), Hex::new(3, 4));
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn distance_between_extreme_cells_is_finite() {
        let d = axial_distance(Hex::new(i32::MIN, 0), Hex::new(i32::MAX, 0));
        assert!(d.is_finite());
        assert!(d > 4.0e9);
    }

    // ── chunk_of ────────────────────────────────────────────────────

    #[test]
    fn chunk_of_positive_cells() {
        assert_eq!(chunk_of(Hex::new(0, 0), 5), IVec2::new(0, 0));
        assert_eq!(chunk_of(Hex::new(4, 4), 5), IVec2::new(0, 0));
        assert_eq!(chunk_of(Hex::new(5, 9), 5), IVec2::new(1, 1));
    }

    #[test]
    fn chunk_of_negative_cells_floors() {
        assert_eq!(chunk_of(Hex::new(-1, -5), 5), IVec2::new(-1, -1));
        assert_eq!(chunk_of(Hex::new(-6, 0), 5), IVec2::new(-2, 0));
    }

    #[test]
    fn chunks_to_cover_rounds_up() {
        assert_eq!(chunks_to_cover(10, 5), 2);
        assert_eq!(chunks_to_cover(11, 5), 3);
        assert_eq!(chunks_to_cover(60, 8), 8);
    }

    // ── coordinate_seed ─────────────────────────────────────────────

    #[test]
    fn coordinate_seed_is_stable() {
        let a = coordinate_seed(42, Hex::new(3, 9));
        let b = coordinate_seed(42, Hex::new(3, 9));
        assert_eq!(a, b);
    }

    #[test]
    fn coordinate_seed_differs_between_cells_and_seeds() {
        let base = coordinate_seed(42, Hex::new(3, 9));
        assert_ne!(base, coordinate_seed(42, Hex::new(9, 3)));
        assert_ne!(base, coordinate_seed(43, Hex::new(3, 9)));
    }
}
