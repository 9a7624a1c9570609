//! Two-sided puzzle orchestration
//!
//! The game owns both tracks and is the only component that moves
//! marbles between them (during a leaf flip). All single-side actions
//! delegate to the active track.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::marble::{Marble, MarbleColor};
use super::track::{Leaf, Mode, Track};
use crate::consts::{HINGE_SPAN, LEAF_LEN, N_LEAVES, SIDE_LEN, TOTAL_MARBLES};

/// One face of the trefoil
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Front,
    Back,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Front => Side::Back,
            Side::Back => Side::Front,
        }
    }

    fn index(self) -> usize {
        match self {
            Side::Front => 0,
            Side::Back => 1,
        }
    }
}

/// The full two-sided puzzle: front and back tracks, the active-side
/// selector, and per-leaf flip progress angles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    sides: [Track; 2],
    active: Side,
    /// How far a leaf flip has progressed, per North/East/West.
    /// Accumulates within (-90, 90]; a side swap folds each angle into
    /// the complementary (90, 270] band, the same position seen from
    /// the other side of the hinge.
    spin_progress: [f64; N_LEAVES],
    /// Input focus for the command layer; transient, not persisted
    #[serde(skip)]
    selected: Option<Leaf>,
}

/// Canonical solved marbles for the front side: one color per leaf
pub fn front_marbles() -> [Marble; SIDE_LEN] {
    let colors = [MarbleColor::Blue, MarbleColor::Green, MarbleColor::Magenta];
    std::array::from_fn(|i| Marble::new(i as u32, colors[i / LEAF_LEN]))
}

/// Canonical solved marbles for the back side
pub fn back_marbles() -> [Marble; SIDE_LEN] {
    let colors = [MarbleColor::Cyan, MarbleColor::Red, MarbleColor::Yellow];
    std::array::from_fn(|i| Marble::new((SIDE_LEN + i) as u32, colors[i / LEAF_LEN]))
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Create the canonical solved puzzle
    pub fn new() -> Self {
        Self::with_marbles(front_marbles(), back_marbles())
    }

    /// Create a puzzle from explicit marble arrays (front, back)
    pub fn with_marbles(front: [Marble; SIDE_LEN], back: [Marble; SIDE_LEN]) -> Self {
        Self {
            sides: [Track::new(front), Track::new(back)],
            active: Side::Front,
            spin_progress: [0.0; N_LEAVES],
            selected: None,
        }
    }

    /// Reset to the canonical solved configuration
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn active_side(&self) -> Side {
        self.active
    }

    pub fn selected_leaf(&self) -> Option<Leaf> {
        self.selected
    }

    pub(crate) fn select_leaf(&mut self, leaf: Leaf) {
        self.selected = Some(leaf);
    }

    pub fn side(&self, side: Side) -> &Track {
        &self.sides[side.index()]
    }

    pub fn side_mut(&mut self, side: Side) -> &mut Track {
        &mut self.sides[side.index()]
    }

    pub fn spin_progress(&self, leaf: Leaf) -> f64 {
        leaf.lobe_index().map_or(0.0, |i| self.spin_progress[i])
    }

    /// Rotate marbles in a leaf of the active side
    pub fn rotate_marbles(&mut self, leaf: Leaf, angle: f64) -> bool {
        self.sides[self.active.index()].rotate_marbles(leaf, angle)
    }

    /// Rotate the active side's internal disk
    pub fn rotate_internal_disk(&mut self, angle: f64) -> bool {
        self.sides[self.active.index()].rotate_internal_disk(angle)
    }

    /// Spin a leaf around its hinge axis by `angle` degrees.
    ///
    /// Progress accumulates until it leaves (-90, 90]; crossing that
    /// band swaps the five hinge marbles with the mirrored leaf on the
    /// opposite side and refolds the progress angle. Returns true only
    /// when marbles actually crossed.
    pub fn spin_leaf(&mut self, leaf: Leaf, angle: f64) -> bool {
        let Some(lobe) = leaf.lobe_index() else {
            return false;
        };
        if self.sides[self.active.index()].is_leaf_blocked(leaf) {
            return false;
        }

        let updated = self.spin_progress[lobe] + angle % 360.0;
        if -90.0 < updated && updated <= 90.0 {
            self.spin_progress[lobe] = updated;
            return false;
        }

        let opposite_leaf = leaf.opposite();
        // both tracks borrowed mutably at once: the cross-side swap is
        // a single coordinated operation and cannot be observed
        // half-done
        let [front, back] = &mut self.sides;
        let (active, opposite) = match self.active {
            Side::Front => (front, back),
            Side::Back => (back, front),
        };

        let mut cur_active = active.flip_window(leaf);
        let mut cur_opposite = opposite.flip_window(opposite_leaf);
        for _ in 0..HINGE_SPAN {
            std::mem::swap(
                &mut active.marbles_mut()[cur_active.slot()],
                &mut opposite.marbles_mut()[cur_opposite.slot()],
            );
            cur_active.advance(1);
            cur_opposite.advance(1);
        }
        debug!("flipped {leaf:?}: swapped {HINGE_SPAN} marbles with {opposite_leaf:?}");

        self.spin_progress[lobe] = fold_spin_angle(updated);
        true
    }

    /// Flip a leaf by a full half-turn
    pub fn flip_leaf(&mut self, leaf: Leaf) -> bool {
        self.spin_leaf(leaf, 180.0)
    }

    /// Swap the active side. The visible hinge frame inverts, so all
    /// three spin-progress angles are refolded into the complementary
    /// band.
    pub fn swap_side(&mut self) {
        self.active = self.active.opposite();
        for progress in self.spin_progress.iter_mut() {
            *progress = fold_spin_angle(*progress);
        }
    }

    /// Solved: both sides at rest in leaf rotation and each of the six
    /// leaves uniform in color
    pub fn is_solved(&self) -> bool {
        self.sides
            .iter()
            .all(|side| side.mode() == Mode::LeafRotation)
            && self
                .sides
                .iter()
                .all(|side| Leaf::LOBES.iter().all(|&leaf| side.leaf_uniform(leaf)))
    }

    /// Verify the marble-id permutation: every id in 0..60 appears
    /// exactly once across both sides. A failure here is an internal
    /// logic defect, never a user error.
    pub fn check_consistency(&self) -> bool {
        let mut counts = [0u8; TOTAL_MARBLES];
        for side in &self.sides {
            for marble in side.marbles() {
                let Some(count) = counts.get_mut(marble.id as usize) else {
                    warn!("consistency: marble id {} out of range", marble.id);
                    return false;
                };
                *count += 1;
            }
        }
        let ok = counts.iter().all(|&c| c == 1);
        if !ok {
            warn!("consistency: duplicate or missing marble ids");
        }
        ok
    }

    /// Canonical snapshot: the logical color arrangement of both sides
    /// as one fixed-length array (front first). Sub-step phase
    /// perturbations fold away, so games that differ only by them
    /// produce identical snapshots; full-step rotations of a mixed
    /// leaf change the arrangement and the snapshot with it.
    pub fn snapshot(&self) -> [MarbleColor; TOTAL_MARBLES] {
        let front = self.sides[0].logical_colors();
        let back = self.sides[1].logical_colors();
        std::array::from_fn(|i| {
            if i < SIDE_LEN {
                front[i]
            } else {
                back[i - SIDE_LEN]
            }
        })
    }
}

/// Fold a flip angle into the complementary band: the same leaf
/// position seen from the other side of the hinge.
fn fold_spin_angle(angle: f64) -> f64 {
    if angle >= 90.0 {
        angle - 180.0
    } else {
        angle + 180.0
    }
}
