//! One side of the trefoil: marble storage, phase angles, mode machine
//!
//! The marble array is in physical/storage order. Which slot is the
//! logical "first marble" of a leaf (or of the border ring) is derived
//! from the phase angles, so plain rotations never touch the array.
//! The array is reshuffled only at the discrete re-indexing events:
//! entering/leaving border mode and the internal-disk coupling swaps.

use log::debug;
use serde::{Deserialize, Serialize};

use super::angles::{self, SwapDirection};
use super::marble::{Marble, MarbleColor};
use crate::consts::{BORDER_DIVISOR, COUPLING_LEN, DISK_STEP, LEAF_LEN, N_LEAVES, SIDE_LEN, STEP, TOLERANCE};
use crate::normalize_deg;

/// Logical sections of a side. `Border` addresses the unified ring,
/// `Center` the internal disk; both are pseudo-leaves used by the
/// command layer and iteration, not storage sections of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Leaf {
    North,
    East,
    West,
    Border,
    Center,
}

impl Leaf {
    /// The three real leaves, in storage order
    pub const LOBES: [Leaf; N_LEAVES] = [Leaf::North, Leaf::East, Leaf::West];

    /// Storage index for a real leaf; `None` for the pseudo-leaves
    pub fn lobe_index(self) -> Option<usize> {
        match self {
            Leaf::North => Some(0),
            Leaf::East => Some(1),
            Leaf::West => Some(2),
            Leaf::Border | Leaf::Center => None,
        }
    }

    /// Mirrored leaf on the other side of the puzzle. The flip hinge
    /// reflects East/West but not North.
    pub fn opposite(self) -> Leaf {
        match self {
            Leaf::East => Leaf::West,
            Leaf::West => Leaf::East,
            other => other,
        }
    }
}

/// Mechanical state of a side. Transitions are driven only by the disk
/// phase crossing its tolerance windows, or by an explicit spin
/// start/stop; never set arbitrarily.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Leaf rails closed: marbles rotate within a single leaf
    LeafRotation,
    /// Leaf rails fused into one ring: marbles rotate along the border
    BorderRotation,
    /// A leaf is spinning around its axis; all rotation is rejected
    LeafSpinning,
    /// The internal disk is between alignments; rotation is rejected
    Transitional,
}

/// Wrapping, non-mutating index over a leaf's (or the ring's) slots in
/// the shared marble array.
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    base: usize,
    len: usize,
    pos: i64,
}

impl Cursor {
    fn new(base: usize, len: usize, pos: i64) -> Self {
        Self { base, len, pos }
    }

    /// Physical slot the cursor currently points at
    pub fn slot(&self) -> usize {
        self.base + self.pos.rem_euclid(self.len as i64) as usize
    }

    /// Slot at a relative offset, without moving the cursor
    pub fn peek(&self, delta: i64) -> usize {
        self.base + (self.pos + delta).rem_euclid(self.len as i64) as usize
    }

    pub fn advance(&mut self, delta: i64) {
        self.pos += delta;
    }
}

/// A single side of the trefoil.
///
/// Created by move-constructing an externally supplied marble array;
/// the array length is the only validated property (enforced by the
/// type). Tracks are plain values and are never aliased: the game owns
/// both of them and borrows them exclusively for cross-side swaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    marbles: [Marble; SIDE_LEN],
    leaf_phase: [f64; N_LEAVES],
    disk_phase: f64,
    leaf_blocked: [bool; N_LEAVES],
    /// [previous, current]
    mode_history: [Mode; 2],
}

impl Track {
    pub fn new(marbles: [Marble; SIDE_LEN]) -> Self {
        Self {
            marbles,
            leaf_phase: [0.0; N_LEAVES],
            disk_phase: 0.0,
            leaf_blocked: [false; N_LEAVES],
            mode_history: [Mode::Transitional, Mode::LeafRotation],
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode_history[1]
    }

    pub fn previous_mode(&self) -> Mode {
        self.mode_history[0]
    }

    fn push_mode(&mut self, mode: Mode) {
        self.mode_history[0] = self.mode_history[1];
        self.mode_history[1] = mode;
    }

    pub fn marbles(&self) -> &[Marble; SIDE_LEN] {
        &self.marbles
    }

    pub(crate) fn marbles_mut(&mut self) -> &mut [Marble; SIDE_LEN] {
        &mut self.marbles
    }

    pub fn leaf_phase(&self, leaf: Leaf) -> f64 {
        leaf.lobe_index().map_or(0.0, |i| self.leaf_phase[i])
    }

    pub fn disk_phase(&self) -> f64 {
        self.disk_phase
    }

    pub fn is_leaf_blocked(&self, leaf: Leaf) -> bool {
        leaf.lobe_index().is_some_and(|i| self.leaf_blocked[i])
    }

    /// Angular spacing between adjacent marbles under the current mode
    fn step(&self) -> f64 {
        if self.mode() == Mode::BorderRotation {
            STEP / BORDER_DIVISOR
        } else {
            STEP
        }
    }

    /// Position delta and residual sub-step angle of the logical first
    /// marble, derived from a phase angle: shift by half a step, reduce
    /// mod 360, floor-divide by the step.
    fn start_for_phase(theta: f64, step: f64) -> (i64, f64) {
        let t = normalize_deg(theta + step / 2.0);
        let pos = -(t / step).floor();
        (pos as i64, theta + pos * step)
    }

    /// Logical start of a leaf under the current mode: the position
    /// delta from the leaf's base slot, plus the residual angle of that
    /// marble relative to its equilibrium position.
    pub fn logical_start(&self, leaf: Leaf) -> (i64, f64) {
        Self::start_for_phase(self.leaf_phase(leaf), self.step())
    }

    /// Logical start of the unified ring (from the North phase)
    pub fn ring_start(&self) -> (i64, f64) {
        Self::start_for_phase(self.leaf_phase[0], self.step())
    }

    /// Cursor positioned at a leaf's logical first marble
    pub fn cursor(&self, leaf: Leaf) -> Cursor {
        let base = leaf.lobe_index().unwrap_or(0) * LEAF_LEN;
        let (pos, _) = self.logical_start(leaf);
        Cursor::new(base, LEAF_LEN, pos)
    }

    /// Cursor positioned at the ring's logical first marble
    pub fn ring_cursor(&self) -> Cursor {
        let (pos, _) = self.ring_start();
        Cursor::new(0, SIDE_LEN, pos)
    }

    /// Rotate the marbles of a leaf (or, in border mode, the whole
    /// ring) by `angle` degrees; positive is clockwise. Entering border
    /// mode happens here when the disk sits in a coupling window.
    /// Returns false if the current mode forbids rotation.
    pub fn rotate_marbles(&mut self, leaf: Leaf, angle: f64) -> bool {
        if self.can_enter_border() {
            self.enter_border();
            self.push_mode(Mode::BorderRotation);
            debug!("entered border rotation, disk at {:.1}", self.disk_phase);
        }
        match self.mode() {
            Mode::Transitional | Mode::LeafSpinning => false,
            Mode::LeafRotation => self.rotate_leaf(leaf, angle),
            // leaf argument is irrelevant: the three leaves move in
            // lock-step as one ring, at 1/12 resolution
            Mode::BorderRotation => self.rotate_border(angle / BORDER_DIVISOR),
        }
    }

    fn rotate_leaf(&mut self, leaf: Leaf, angle: f64) -> bool {
        let Some(i) = leaf.lobe_index() else {
            return false;
        };
        self.leaf_phase[i] = normalize_deg(self.leaf_phase[i] + angle);
        self.update_blocked(i);
        true
    }

    fn rotate_border(&mut self, angle: f64) -> bool {
        for i in 0..N_LEAVES {
            self.leaf_phase[i] = normalize_deg(self.leaf_phase[i] + angle);
        }
        self.update_blocked_all();
        true
    }

    fn update_blocked(&mut self, lobe: usize) {
        let (step, tol) = if self.mode() == Mode::BorderRotation {
            (STEP / BORDER_DIVISOR, TOLERANCE / BORDER_DIVISOR)
        } else {
            (STEP, TOLERANCE)
        };
        self.leaf_blocked[lobe] = angles::on_half_step(self.leaf_phase[lobe], step, tol);
    }

    fn update_blocked_all(&mut self) {
        for i in 0..N_LEAVES {
            self.update_blocked(i);
        }
    }

    /// True while the disk is mid-transition and parked in a coupling
    /// window, i.e. the next marble rotation fuses the leaves into the
    /// border ring.
    fn can_enter_border(&self) -> bool {
        self.mode() == Mode::Transitional
            && angles::coupling_window(normalize_deg(self.disk_phase)).is_some()
    }

    /// Leaf -> Border re-index: read the three logical leaf runs into
    /// ring order, zero the phases, then reconcile the seam marbles.
    fn enter_border(&mut self) {
        let mut tmp = self.marbles;
        let mut k = 0;
        for leaf in Leaf::LOBES {
            let mut cur = self.cursor(leaf);
            for _ in 0..LEAF_LEN {
                tmp[k] = self.marbles[cur.slot()];
                cur.advance(1);
                k += 1;
            }
        }
        self.marbles = tmp;
        self.leaf_phase = [0.0; N_LEAVES];
        self.reconcile_seams();
    }

    /// Border -> Leaf re-index: the symmetric inverse of
    /// [`Track::enter_border`], reading the ring back into leaf runs.
    fn leave_border(&mut self) {
        let mut tmp = self.marbles;
        let mut cur = self.ring_cursor();
        for slot in tmp.iter_mut() {
            *slot = self.marbles[cur.slot()];
            cur.advance(1);
        }
        self.marbles = tmp;
        self.leaf_phase = [0.0; N_LEAVES];
        self.reconcile_seams();
    }

    /// Fix up the marbles nearest each leaf-to-leaf junction after a
    /// re-index. At +60 the seams line up with a simple adjacent swap
    /// per leaf; at -60 they need a 3-way rotation across all three
    /// seams and the disk phase recenters by +120.
    ///
    /// Phases are zero when this runs, so logical order equals storage
    /// order and the seams sit at fixed slots.
    fn reconcile_seams(&mut self) {
        const NORTH: usize = 0;
        const EAST: usize = LEAF_LEN;
        const WEST: usize = 2 * LEAF_LEN;
        match angles::coupling_window(self.disk_phase) {
            Some(angles::CouplingWindow::Plus) => {
                for base in [NORTH, EAST, WEST] {
                    self.marbles.swap(base + LEAF_LEN - 3, base + LEAF_LEN - 1);
                }
            }
            Some(angles::CouplingWindow::Minus) => {
                self.marbles.swap(NORTH + LEAF_LEN - 3, EAST + LEAF_LEN - 1);
                self.marbles.swap(NORTH + LEAF_LEN - 2, EAST + LEAF_LEN - 2);
                self.marbles.swap(NORTH + LEAF_LEN - 1, EAST + LEAF_LEN - 3);
                self.marbles.swap(WEST + LEAF_LEN - 3, EAST + LEAF_LEN - 1);
                self.marbles.swap(WEST + LEAF_LEN - 2, EAST + LEAF_LEN - 2);
                self.marbles.swap(WEST + LEAF_LEN - 1, EAST + LEAF_LEN - 3);
                self.marbles.swap(WEST + LEAF_LEN - 1, WEST + LEAF_LEN - 3);
                self.disk_phase = normalize_deg(self.disk_phase + 2.0 * DISK_STEP);
            }
            None => debug_assert!(false, "seam reconciliation outside a coupling window"),
        }
        // shared origin phase, recomputed from North and applied to all
        // three leaves
        let (_, origin) = Self::start_for_phase(self.leaf_phase[0], STEP);
        self.leaf_phase = [origin; N_LEAVES];
        self.update_blocked_all();
    }

    /// Rotate the internal disk by `angle` degrees. Rejected while any
    /// leaf is blocked or a leaf is spinning. Crossing the 120/240
    /// windows cycles the coupling-zone marbles between the leaves and
    /// recenters the phase; landing on an alignment restores
    /// independent leaf rotation.
    pub fn rotate_internal_disk(&mut self, angle: f64) -> bool {
        if self.mode() == Mode::LeafSpinning {
            return false;
        }
        if self.leaf_blocked.iter().any(|&b| b) {
            return false;
        }
        let old_phase = normalize_deg(self.disk_phase);
        let new_phase = normalize_deg(old_phase + angle);

        if self.mode() == Mode::BorderRotation
            && angles::coupling_window(old_phase).is_some()
        {
            self.leave_border();
            debug!("left border rotation, disk at {old_phase:.1}");
        }

        self.push_mode(Mode::Transitional);

        match angles::swap_band(new_phase) {
            Some(SwapDirection::Forward) => {
                self.cycle_coupling_marbles(SwapDirection::Forward);
                self.disk_phase = new_phase - 2.0 * DISK_STEP;
            }
            Some(SwapDirection::Reverse) => {
                self.cycle_coupling_marbles(SwapDirection::Reverse);
                self.disk_phase = new_phase - 4.0 * DISK_STEP;
            }
            None => self.disk_phase = new_phase,
        }

        if angles::disk_aligned(new_phase) {
            self.push_mode(Mode::LeafRotation);
        }
        true
    }

    /// 3-way cyclic swap of the coupling-zone marbles at each leaf's
    /// disk-facing seam (the marbles just before each logical start).
    fn cycle_coupling_marbles(&mut self, dir: SwapDirection) {
        let north = self.cursor(Leaf::North);
        let east = self.cursor(Leaf::East);
        let west = self.cursor(Leaf::West);
        for i in 1..=COUPLING_LEN as i64 {
            let (n, e, w) = (north.peek(-i), east.peek(-i), west.peek(-i));
            match dir {
                SwapDirection::Forward => {
                    self.marbles.swap(n, w);
                    self.marbles.swap(e, w);
                }
                SwapDirection::Reverse => {
                    self.marbles.swap(n, e);
                    self.marbles.swap(e, w);
                }
            }
        }
    }

    /// True if the stored blocked flags match what the phases imply;
    /// used when validating loaded state.
    pub(crate) fn blocked_flags_consistent(&self) -> bool {
        let (step, tol) = if self.mode() == Mode::BorderRotation {
            (STEP / BORDER_DIVISOR, TOLERANCE / BORDER_DIVISOR)
        } else {
            (STEP, TOLERANCE)
        };
        (0..N_LEAVES)
            .all(|i| self.leaf_blocked[i] == angles::on_half_step(self.leaf_phase[i], step, tol))
    }

    pub fn is_spin_possible(&self, leaf: Leaf) -> bool {
        leaf.lobe_index().is_some_and(|i| !self.leaf_blocked[i])
    }

    /// Enter the spinning state for a flip's two-phase protocol. While
    /// spinning, every rotation (leaf, border, disk) is rejected until
    /// [`Track::end_spinning_leaf`] restores the previous mode.
    pub fn start_spinning_leaf(&mut self, leaf: Leaf) -> bool {
        if !self.is_spin_possible(leaf) {
            return false;
        }
        self.push_mode(Mode::LeafSpinning);
        true
    }

    pub fn end_spinning_leaf(&mut self) -> bool {
        if self.mode() != Mode::LeafSpinning {
            return false;
        }
        self.push_mode(self.previous_mode());
        true
    }

    /// Cursor at the first flip-window marble of a leaf: one past the
    /// logical start, or one past the leaf's block within the ring when
    /// the side is in border mode.
    pub(crate) fn flip_window(&self, leaf: Leaf) -> Cursor {
        if self.mode() == Mode::BorderRotation {
            let mut cur = self.ring_cursor();
            cur.advance(leaf.lobe_index().unwrap_or(0) as i64 * LEAF_LEN as i64 + 1);
            cur
        } else {
            let mut cur = self.cursor(leaf);
            cur.advance(1);
            cur
        }
    }

    /// Colors of the side in canonical logical order: the ring sequence
    /// in border mode, otherwise the North, East, West leaf sequences.
    /// The logical start folds away the sub-step phase residual, so
    /// sides that differ only by a sub-step perturbation produce
    /// identical output. A full-step rotation shifts the logical start
    /// by a marble and yields a different sequence.
    pub fn logical_colors(&self) -> [MarbleColor; SIDE_LEN] {
        let mut out = [self.marbles[0].color; SIDE_LEN];
        if self.mode() == Mode::BorderRotation {
            let mut cur = self.ring_cursor();
            for c in out.iter_mut() {
                *c = self.marbles[cur.slot()].color;
                cur.advance(1);
            }
        } else {
            let mut k = 0;
            for leaf in Leaf::LOBES {
                let mut cur = self.cursor(leaf);
                for _ in 0..LEAF_LEN {
                    out[k] = self.marbles[cur.slot()].color;
                    cur.advance(1);
                    k += 1;
                }
            }
        }
        out
    }

    /// True if every marble in the leaf's logical run shares one color
    pub fn leaf_uniform(&self, leaf: Leaf) -> bool {
        let mut cur = self.cursor(leaf);
        let first = self.marbles[cur.slot()].color;
        for _ in 1..LEAF_LEN {
            cur.advance(1);
            if self.marbles[cur.slot()].color != first {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_marbles() -> [Marble; SIDE_LEN] {
        let colors = [MarbleColor::Blue, MarbleColor::Green, MarbleColor::Magenta];
        std::array::from_fn(|i| Marble::new(i as u32, colors[i / LEAF_LEN]))
    }

    fn ids(track: &Track, leaf: Leaf) -> Vec<u32> {
        let mut cur = track.cursor(leaf);
        (0..LEAF_LEN)
            .map(|_| {
                let id = track.marbles()[cur.slot()].id;
                cur.advance(1);
                id
            })
            .collect()
    }

    fn ring_ids(track: &Track) -> Vec<u32> {
        let mut cur = track.ring_cursor();
        (0..SIDE_LEN)
            .map(|_| {
                let id = track.marbles()[cur.slot()].id;
                cur.advance(1);
                id
            })
            .collect()
    }

    #[test]
    fn test_pristine_logical_start() {
        let track = Track::new(test_marbles());
        for leaf in Leaf::LOBES {
            assert_eq!(track.logical_start(leaf), (0, 0.0));
        }
        assert_eq!(ids(&track, Leaf::North), (0..10).collect::<Vec<_>>());
        assert_eq!(ids(&track, Leaf::East), (10..20).collect::<Vec<_>>());
        assert_eq!(ids(&track, Leaf::West), (20..30).collect::<Vec<_>>());
    }

    #[test]
    fn test_rotation_shifts_logical_start_without_moving_marbles() {
        let mut track = Track::new(test_marbles());
        let stored = *track.marbles();
        assert!(track.rotate_marbles(Leaf::North, STEP));
        assert_eq!(stored, *track.marbles());
        let (pos, residual) = track.logical_start(Leaf::North);
        assert_eq!(pos, -1);
        assert!(residual.abs() < 1e-9);
        assert_eq!(ids(&track, Leaf::North)[0], 9);
    }

    #[test]
    fn test_double_rotation_is_idempotent() {
        let mut track = Track::new(test_marbles());
        assert!(track.rotate_marbles(Leaf::East, 3.0 * STEP));
        assert!(track.rotate_marbles(Leaf::East, -3.0 * STEP));
        let (pos, residual) = track.logical_start(Leaf::East);
        assert_eq!(pos, 0);
        assert!(residual.abs() < 1e-9);
        assert_eq!(ids(&track, Leaf::East)[0], 10);
    }

    #[test]
    fn test_half_step_blocks_leaf_and_disk() {
        let mut track = Track::new(test_marbles());
        assert!(track.rotate_marbles(Leaf::West, STEP / 2.0));
        assert!(track.is_leaf_blocked(Leaf::West));
        assert!(!track.rotate_internal_disk(60.0));
        // moving off the boundary unblocks the disk again
        assert!(track.rotate_marbles(Leaf::West, STEP / 2.0));
        assert!(!track.is_leaf_blocked(Leaf::West));
        assert!(track.rotate_internal_disk(60.0));
    }

    #[test]
    fn test_disk_crossing_120_cycles_coupling_marbles() {
        let mut track = Track::new(test_marbles());
        assert!(track.rotate_internal_disk(120.0));
        // north seam marbles came from west, east's from north, west's
        // from east; everything else stays put
        assert_eq!(ids(&track, Leaf::North), vec![0, 1, 2, 3, 4, 5, 6, 27, 28, 29]);
        assert_eq!(ids(&track, Leaf::East), vec![10, 11, 12, 13, 14, 15, 16, 7, 8, 9]);
        assert_eq!(ids(&track, Leaf::West), vec![20, 21, 22, 23, 24, 25, 26, 17, 18, 19]);
        // phase recentered onto an alignment: leaves rotate again
        assert!(track.disk_phase().abs() < 1e-9);
        assert_eq!(track.mode(), Mode::LeafRotation);
    }

    #[test]
    fn test_disk_forward_then_reverse_restores_arrangement() {
        let mut track = Track::new(test_marbles());
        assert!(track.rotate_internal_disk(120.0));
        assert!(track.rotate_internal_disk(-120.0));
        assert_eq!(ids(&track, Leaf::North), (0..10).collect::<Vec<_>>());
        assert_eq!(ids(&track, Leaf::East), (10..20).collect::<Vec<_>>());
        assert_eq!(ids(&track, Leaf::West), (20..30).collect::<Vec<_>>());
        assert_eq!(track.mode(), Mode::LeafRotation);
    }

    #[test]
    fn test_disk_at_60_parks_in_transitional() {
        let mut track = Track::new(test_marbles());
        assert!(track.rotate_internal_disk(60.0));
        assert_eq!(track.mode(), Mode::Transitional);
        // transitional rejects until a marble rotation fuses the ring
        assert_eq!(track.disk_phase(), 60.0);
    }

    #[test]
    fn test_border_entry_and_rotation() {
        let mut track = Track::new(test_marbles());
        assert!(track.rotate_internal_disk(60.0));
        // the rotation attempt performs the leaf->border re-index
        assert!(track.rotate_marbles(Leaf::North, 36.0));
        assert_eq!(track.mode(), Mode::BorderRotation);
        // all three phases moved in lock-step at 1/12 resolution
        for leaf in Leaf::LOBES {
            assert!((track.leaf_phase(leaf) - 3.0).abs() < 1e-9);
        }
        // permutation intact
        let mut seen: Vec<u32> = track.marbles().iter().map(|m| m.id).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..30).collect::<Vec<_>>());
    }

    #[test]
    fn test_border_round_trip_restores_arrangement() {
        let mut track = Track::new(test_marbles());
        let before = *track.marbles();
        let colors_before = track.logical_colors();
        assert!(track.rotate_internal_disk(60.0));
        assert!(track.rotate_marbles(Leaf::North, 36.0));
        assert_eq!(track.mode(), Mode::BorderRotation);
        assert!(track.rotate_marbles(Leaf::North, -36.0));
        // leaving via the inverse disk rotation reproduces the exact
        // pre-transition arrangement
        assert!(track.rotate_internal_disk(-60.0));
        assert_eq!(track.mode(), Mode::LeafRotation);
        assert_eq!(before, *track.marbles());
        assert_eq!(colors_before, track.logical_colors());
    }

    #[test]
    fn test_border_round_trip_from_minus_60() {
        let mut track = Track::new(test_marbles());
        let colors_before = track.logical_colors();
        assert!(track.rotate_internal_disk(-60.0));
        assert_eq!(normalize_deg(track.disk_phase()), 300.0);
        assert!(track.rotate_marbles(Leaf::North, 36.0));
        assert_eq!(track.mode(), Mode::BorderRotation);
        // entering from -60 recenters the disk onto +60
        assert_eq!(normalize_deg(track.disk_phase()), 60.0);
        assert!(track.rotate_marbles(Leaf::North, -36.0));
        // net disk travel is -60 + 60 = 0, so exiting clockwise undoes
        // the entry exactly (the +120 recenter absorbed one detent)
        assert!(track.rotate_internal_disk(60.0));
        assert_eq!(track.mode(), Mode::LeafRotation);
        assert!(track.disk_phase().abs() < 1e-9);
        assert_eq!(colors_before, track.logical_colors());
        assert_eq!(
            track.marbles().iter().map(|m| m.id).collect::<Vec<_>>(),
            (0..30).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_ring_cursor_covers_all_slots_once() {
        let mut track = Track::new(test_marbles());
        assert!(track.rotate_internal_disk(60.0));
        assert!(track.rotate_marbles(Leaf::North, 5.0 * 36.0));
        let mut ring = ring_ids(&track);
        assert_eq!(ring.len(), SIDE_LEN);
        ring.sort_unstable();
        ring.dedup();
        assert_eq!(ring.len(), SIDE_LEN);
    }

    #[test]
    fn test_spinning_serializes_all_rotation() {
        let mut track = Track::new(test_marbles());
        assert!(track.start_spinning_leaf(Leaf::North));
        assert_eq!(track.mode(), Mode::LeafSpinning);
        assert!(!track.rotate_marbles(Leaf::North, STEP));
        assert!(!track.rotate_internal_disk(60.0));
        assert!(track.end_spinning_leaf());
        assert_eq!(track.mode(), Mode::LeafRotation);
        assert!(track.rotate_marbles(Leaf::North, STEP));
    }

    #[test]
    fn test_spinning_blocked_leaf_rejected() {
        let mut track = Track::new(test_marbles());
        assert!(track.rotate_marbles(Leaf::East, STEP / 2.0));
        assert!(track.is_leaf_blocked(Leaf::East));
        assert!(!track.start_spinning_leaf(Leaf::East));
        assert!(track.start_spinning_leaf(Leaf::North));
    }

    #[test]
    fn test_end_spinning_requires_spinning() {
        let mut track = Track::new(test_marbles());
        assert!(!track.end_spinning_leaf());
    }

    #[test]
    fn test_pseudo_leaves_never_rotate_in_leaf_mode() {
        let mut track = Track::new(test_marbles());
        assert!(!track.rotate_marbles(Leaf::Border, STEP));
        assert!(!track.rotate_marbles(Leaf::Center, STEP));
    }

    #[test]
    fn test_logical_colors_ignore_rotation_history() {
        let mut track = Track::new(test_marbles());
        let baseline = track.logical_colors();
        assert!(track.rotate_marbles(Leaf::North, 4.0 * STEP));
        assert!(track.rotate_marbles(Leaf::West, -2.0 * STEP));
        assert_eq!(baseline, track.logical_colors());
    }
}
