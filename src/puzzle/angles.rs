//! Angular zone classification for the internal disk
//!
//! The mode state machine branches on a handful of tolerance windows
//! around the disk's detent angles (0/60/120/240/300/360 degrees).
//! Classifying the phase once here keeps the boundary arithmetic out
//! of the rotation code.

use crate::consts::{DISK_STEP, TOLERANCE};
use crate::normalize_deg;

/// True if `angle` lies within [`TOLERANCE`] of `center`, wrap-aware.
pub fn near(angle: f64, center: f64) -> bool {
    let d = normalize_deg(angle - center);
    d <= TOLERANCE || d >= 360.0 - TOLERANCE
}

/// Direction of the coupling-zone marble exchange triggered when the
/// disk phase crosses into a swap band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    /// North -> East -> West (disk crossed +120 degrees)
    Forward,
    /// West -> East -> North (disk crossed -120 degrees)
    Reverse,
}

/// Classify a prospective disk phase into a swap band, if any.
///
/// The forward band is [120-tol, 240-tol); the reverse band is the
/// closed window [240-tol, 240+tol]. Both expect a phase already
/// normalized to [0, 360).
pub fn swap_band(phase: f64) -> Option<SwapDirection> {
    if (2.0 * DISK_STEP - TOLERANCE..4.0 * DISK_STEP - TOLERANCE).contains(&phase) {
        Some(SwapDirection::Forward)
    } else if (4.0 * DISK_STEP - TOLERANCE..=4.0 * DISK_STEP + TOLERANCE).contains(&phase) {
        Some(SwapDirection::Reverse)
    } else {
        None
    }
}

/// True if the disk phase sits at one of the alignments where
/// independent leaf rotation is geometrically valid: 0/120/240/360.
pub fn disk_aligned(phase: f64) -> bool {
    near(phase, 0.0) || near(phase, 2.0 * DISK_STEP) || near(phase, 4.0 * DISK_STEP)
}

/// Which coupling window (if either) the disk phase sits in. These are
/// the +-60 degree alignments where the leaf rails fuse into the
/// border ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouplingWindow {
    /// Disk near +60 degrees
    Plus,
    /// Disk near -60 degrees (i.e. 300)
    Minus,
}

pub fn coupling_window(phase: f64) -> Option<CouplingWindow> {
    let p = normalize_deg(phase);
    if near(p, DISK_STEP) {
        Some(CouplingWindow::Plus)
    } else if near(p, 360.0 - DISK_STEP) {
        Some(CouplingWindow::Minus)
    } else {
        None
    }
}

/// True if a leaf phase leaves a marble straddling the half-step
/// boundary, where the logical "first marble" would be ambiguous.
/// `step` and `tolerance` shrink together in border mode.
pub fn on_half_step(phase: f64, step: f64, tolerance: f64) -> bool {
    let alpha = normalize_deg(phase).rem_euclid(step);
    step / 2.0 - tolerance < alpha && alpha < step / 2.0 + tolerance
}
