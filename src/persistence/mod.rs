//! Save/load with strict validation
//!
//! A versioned JSON envelope over the full internal state: active side,
//! spin-progress angles, and for each track the raw marble array in
//! physical storage order plus its phases and mode history. Save->load
//! round-trips to an identical internal representation, not merely an
//! equivalent logical snapshot. Loading re-validates the mechanical
//! invariants so a malformed file can never produce an inconsistent
//! game.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::TOTAL_MARBLES;
use crate::puzzle::{Game, Leaf, Side};

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed save data: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported save version {found} (expected {SAVE_VERSION})")]
    Version { found: u32 },
    #[error("marble ids are not a permutation of 0..{TOTAL_MARBLES}")]
    BadMarbleIds,
    #[error("{field} angle out of range: {value}")]
    AngleOutOfRange { field: &'static str, value: f64 },
    #[error("blocked flags disagree with the stored phases")]
    InconsistentBlockedFlags,
}

/// Versioned envelope for one saved game
#[derive(Debug, Serialize, Deserialize)]
struct SaveFile {
    version: u32,
    game: Game,
}

/// Serialize the full game state to the textual save form
pub fn save_to_string(game: &Game) -> Result<String, serde_json::Error> {
    serde_json::to_string(&SaveFile {
        version: SAVE_VERSION,
        game: game.clone(),
    })
}

/// Parse and validate a saved game
pub fn load_from_str(data: &str) -> Result<Game, LoadError> {
    let save: SaveFile = serde_json::from_str(data)?;
    if save.version != SAVE_VERSION {
        warn!("rejecting save with version {}", save.version);
        return Err(LoadError::Version {
            found: save.version,
        });
    }
    validate(&save.game)?;
    debug!("loaded game, active side {:?}", save.game.active_side());
    Ok(save.game)
}

fn validate(game: &Game) -> Result<(), LoadError> {
    if !game.check_consistency() {
        return Err(LoadError::BadMarbleIds);
    }
    for side in [Side::Front, Side::Back] {
        let track = game.side(side);
        for leaf in Leaf::LOBES {
            let phase = track.leaf_phase(leaf);
            if !phase.is_finite() || !(0.0..360.0).contains(&phase) {
                return Err(LoadError::AngleOutOfRange {
                    field: "leaf phase",
                    value: phase,
                });
            }
        }
        // the disk phase may sit slightly negative right after a
        // recenter; anything beyond a full turn is corrupt
        let disk = track.disk_phase();
        if !disk.is_finite() || !(-360.0..360.0).contains(&disk) {
            return Err(LoadError::AngleOutOfRange {
                field: "disk phase",
                value: disk,
            });
        }
        if !track.blocked_flags_consistent() {
            return Err(LoadError::InconsistentBlockedFlags);
        }
    }
    for leaf in Leaf::LOBES {
        let progress = game.spin_progress(leaf);
        if !progress.is_finite() || !(-360.0..=360.0).contains(&progress) {
            return Err(LoadError::AngleOutOfRange {
                field: "spin progress",
                value: progress,
            });
        }
    }
    Ok(())
}
