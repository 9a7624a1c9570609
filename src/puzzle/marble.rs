//! Marble identity and color categories

use serde::{Deserialize, Serialize};

/// Color category of a marble. Six categories, one per leaf of the
/// solved puzzle (three on each side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarbleColor {
    Blue,
    Green,
    Magenta,
    Cyan,
    Red,
    Yellow,
}

/// Number of distinct marble colors
pub const N_COLORS: usize = 6;

impl MarbleColor {
    /// All colors, in palette order (front side first)
    pub const ALL: [MarbleColor; N_COLORS] = [
        MarbleColor::Blue,
        MarbleColor::Green,
        MarbleColor::Magenta,
        MarbleColor::Cyan,
        MarbleColor::Red,
        MarbleColor::Yellow,
    ];

    /// Stable palette index, used by histogram-based metrics
    pub fn index(self) -> usize {
        match self {
            MarbleColor::Blue => 0,
            MarbleColor::Green => 1,
            MarbleColor::Magenta => 2,
            MarbleColor::Cyan => 3,
            MarbleColor::Red => 4,
            MarbleColor::Yellow => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MarbleColor::Blue => "blue",
            MarbleColor::Green => "green",
            MarbleColor::Magenta => "magenta",
            MarbleColor::Cyan => "cyan",
            MarbleColor::Red => "red",
            MarbleColor::Yellow => "yellow",
        }
    }
}

/// A single marble: a unique identity plus a color category.
///
/// Identity is load-bearing: the consistency checks rely on each id
/// appearing exactly once across both sides of the puzzle. Marbles are
/// created only at puzzle construction/reset and afterwards only swap
/// storage slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marble {
    pub id: u32,
    pub color: MarbleColor,
}

impl Marble {
    pub fn new(id: u32, color: MarbleColor) -> Self {
        Self { id, color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_index_matches_palette_order() {
        for (i, color) in MarbleColor::ALL.iter().enumerate() {
            assert_eq!(color.index(), i);
        }
    }

    #[test]
    fn test_marble_serde_round_trip() {
        let m = Marble::new(17, MarbleColor::Green);
        let json = serde_json::to_string(&m).unwrap();
        let back: Marble = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }
}
