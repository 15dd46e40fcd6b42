//! Grapple Run headless demo
//!
//! Runs the simulation at a fixed timestep with a tiny autopilot and
//! prints the result. Useful for sanity-checking balance changes and
//! profiling the sim without a renderer.
//!
//! Usage: `grapple-run [seed] [config.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use grapple_run::persistence::FileStore;
    use grapple_run::sim::{Game, RunPhase, TickInput, tick};
    use grapple_run::Config;

    // 120 Hz fixed timestep; cap the run at five simulated minutes
    const SIM_DT: f32 = 1.0 / 120.0;
    const MAX_TICKS: u64 = 120 * 300;

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    let config = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => match Config::from_json(&json) {
                Ok(cfg) => cfg,
                Err(e) => {
                    log::warn!("Bad config {}: {}, using defaults", path, e);
                    Config::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}, using defaults", path, e);
                Config::default()
            }
        },
        None => Config::default(),
    };

    let mut game = Game::new(config, seed, Box::new(FileStore::new()));
    log::info!("Seed {}, best so far {}", seed, game.run.best_score);

    let mut ticks = 0u64;
    let mut held = false;
    while game.run.phase == RunPhase::Playing && ticks < MAX_TICKS {
        let input = autopilot(&game, &mut held);
        tick(&mut game, &input, SIM_DT);
        ticks += 1;
    }

    println!(
        "score {}  best {}{}  distance {:.0}  scrolls {}  ({} ticks, {:.1}s survived)",
        game.run.score,
        game.run.best_score,
        if game.run.is_new_best() { " (new best)" } else { "" },
        game.run.distance_traveled,
        game.run.scrolls_collected,
        ticks,
        game.run.game_time_ms / 1000.0,
    );
}

/// Grab the rope while falling, let go while rising fast. Crude, but
/// enough to carry the sim across a few difficulty ramps.
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(
    game: &grapple_run::sim::Game,
    held: &mut bool,
) -> grapple_run::sim::TickInput {
    let was_held = *held;
    let want = if game.rope.is_attached() {
        // Ride the swing until it carries the actor upward
        game.player.vel.y > -40.0
    } else {
        game.player.vel.y > 0.0
    };
    *held = want;
    grapple_run::sim::TickInput {
        held: want,
        released: was_held && !want,
    }
}

/// Browser builds drive the library from the host; there is no native
/// entry point on wasm.
#[cfg(target_arch = "wasm32")]
fn main() {}
