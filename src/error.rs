//! Configuration errors raised when the map core is initialised.
//!
//! Everything else in the core is total: out-of-bounds lookups yield `None`
//! and missing collaborators are logged and skipped.

/// Fatal configuration problems. A streamer or LOD controller built from an
/// invalid configuration refuses to start.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Chunk edge length was zero or negative.
    #[error("chunk size must be positive, got {0}")]
    InvalidChunkSize(i32),

    /// Load radius (in chunks) was negative.
    #[error("load radius must not be negative, got {0}")]
    NegativeLoadRadius(i32),

    /// `max_ops_per_tick` was zero, so the queues could never drain.
    #[error("per-tick operation budget must be at least 1")]
    ZeroTickBudget,

    /// Map width or height was not positive.
    #[error("map extent must be non-empty, got {width}x{height}")]
    EmptyExtent {
        /// Configured width.
        width: i32,
        /// Configured height.
        height: i32,
    },

    /// The designated center cell is not inside the map.
    #[error("map center ({q}, {r}) lies outside the extent")]
    CenterOutOfBounds {
        /// Center q.
        q: i32,
        /// Center r.
        r: i32,
    },

    /// LOD zoom thresholds were NaN/infinite or not strictly ascending.
    #[error("LOD thresholds must be finite and strictly ascending, got {0:?}")]
    UnorderedLodThresholds([f32; 3]),
}
