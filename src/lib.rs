//! Trefoil Spin - a two-sided mechanical marble puzzle engine
//!
//! Core modules:
//! - `puzzle`: Deterministic puzzle mechanics (tracks, modes, flips, commands)
//! - `persistence`: Save/load with strict validation
//! - `records`: Solve records with snapshot deduplication
//! - `metrics`: Disorder scoring over canonical snapshots

pub mod metrics;
pub mod persistence;
pub mod puzzle;
pub mod records;

pub use records::RecordBook;

/// Puzzle geometry constants
pub mod consts {
    /// Marbles per leaf
    pub const LEAF_LEN: usize = 10;
    /// Leaves per side
    pub const N_LEAVES: usize = 3;
    /// Marbles per side
    pub const SIDE_LEN: usize = N_LEAVES * LEAF_LEN;
    /// Marbles in the whole puzzle (both sides)
    pub const TOTAL_MARBLES: usize = 2 * SIDE_LEN;

    /// Angular spacing between adjacent marbles in a leaf (degrees)
    pub const STEP: f64 = 360.0 / LEAF_LEN as f64;
    /// In border mode the unified ring packs three leaves into one
    /// coordinate space, so the effective step shrinks by this factor.
    pub const BORDER_DIVISOR: f64 = 12.0;
    /// Detent step of the internal disk (degrees)
    pub const DISK_STEP: f64 = 60.0;
    /// Margin around a critical angle inside which two angles are
    /// treated as equal (degrees)
    pub const TOLERANCE: f64 = 5.0;

    /// Marbles in the shared leaf/disk coupling zone
    pub const COUPLING_LEN: usize = 3;
    /// Marbles exchanged between the two sides during a leaf flip
    pub const HINGE_SPAN: usize = 5;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_deg(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}
