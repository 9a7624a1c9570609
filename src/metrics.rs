//! Disorder scoring over canonical snapshots

use crate::consts::{LEAF_LEN, TOTAL_MARBLES};
use crate::puzzle::{Game, N_COLORS};

/// Naive disorder of a game, in [0, 1] with 0.0 for any solved
/// arrangement.
///
/// The snapshot is split into its six leaf runs; each color is
/// credited with the largest count it reaches in any single leaf, and
/// the total credit is scaled against the perfect 60.
pub fn naive_disorder(game: &Game) -> f64 {
    let snapshot = game.snapshot();
    let mut best = [0u32; N_COLORS];
    for run in snapshot.chunks(LEAF_LEN) {
        let mut counts = [0u32; N_COLORS];
        for color in run {
            counts[color.index()] += 1;
        }
        for (best, &count) in best.iter_mut().zip(counts.iter()) {
            *best = (*best).max(count);
        }
    }
    let credit: u32 = best.iter().sum();
    1.0 - f64::from(credit) / TOTAL_MARBLES as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Leaf;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_solved_game_has_zero_disorder() {
        assert_eq!(naive_disorder(&Game::new()), 0.0);
    }

    #[test]
    fn test_rotation_within_leaf_keeps_zero_disorder() {
        let mut game = Game::new();
        assert!(game.rotate_marbles(Leaf::North, 2.0 * crate::consts::STEP));
        assert_eq!(naive_disorder(&game), 0.0);
    }

    #[test]
    fn test_flip_raises_disorder() {
        let mut game = Game::new();
        assert!(game.flip_leaf(Leaf::North));
        let disorder = naive_disorder(&game);
        assert!(disorder > 0.0);
        assert!(disorder <= 1.0);
    }

    #[test]
    fn test_shuffled_game_stays_in_range() {
        let mut game = Game::new();
        let mut rng = Pcg32::seed_from_u64(11);
        game.shuffle(&mut rng, 1000, false);
        let disorder = naive_disorder(&game);
        assert!((0.0..=1.0).contains(&disorder));
    }
}
