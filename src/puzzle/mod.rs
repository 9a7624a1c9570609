//! Deterministic puzzle mechanics
//!
//! All game logic lives here. This module must be pure and deterministic:
//! - Finite, synchronous state transitions only
//! - Seeded RNG only (shuffling takes an explicit generator)
//! - No rendering or platform dependencies

pub mod angles;
pub mod command;
pub mod game;
pub mod marble;
pub mod track;

pub use command::{Command, Key, random_keys};
pub use game::{Game, Side, back_marbles, front_marbles};
pub use marble::{Marble, MarbleColor, N_COLORS};
pub use track::{Cursor, Leaf, Mode, Track};
