//! Trefoil Spin entry point
//!
//! Command-line scrambler: builds a solved puzzle, shuffles it with a
//! seeded generator, and prints a summary plus a save/load round trip.
//!
//! Usage: trefoil-spin [SEED] [STEPS]

use rand::SeedableRng;
use rand_pcg::Pcg32;

use trefoil_spin::metrics::naive_disorder;
use trefoil_spin::persistence::{load_from_str, save_to_string};
use trefoil_spin::puzzle::Game;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| std::time::UNIX_EPOCH.elapsed().map_or(0, |d| d.as_secs()));
    let steps: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(1000);

    log::info!("Trefoil Spin starting with seed {seed}, {steps} shuffle steps");

    let mut game = Game::new();
    let mut rng = Pcg32::seed_from_u64(seed);
    let keys = game.shuffle(&mut rng, steps, true);

    println!("seed:        {seed}");
    println!("steps:       {}", keys.len());
    println!("active side: {:?}", game.active_side());
    println!("disorder:    {:.3}", naive_disorder(&game));
    println!("solved:      {}", game.is_solved());
    println!("consistent:  {}", game.check_consistency());

    match save_to_string(&game) {
        Ok(saved) => match load_from_str(&saved) {
            Ok(loaded) => {
                println!(
                    "save/load:   ok ({} bytes, snapshots match: {})",
                    saved.len(),
                    loaded.snapshot() == game.snapshot()
                );
            }
            Err(e) => eprintln!("save/load:   load failed: {e}"),
        },
        Err(e) => eprintln!("save/load:   save failed: {e}"),
    }
}
