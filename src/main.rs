//! Ricochet Rumble entry point
//!
//! Native builds run a headless, seeded self-play match through the intent
//! API and log the event stream. The browser build is driven from
//! JavaScript through `ricochet_rumble::wasm` instead.
//!
//! Usage: `ricochet-rumble [seed] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use ricochet_rumble::Settings;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    log::info!("Ricochet Rumble (native) starting, seed {}", seed);
    self_play::run(seed, settings);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is ricochet_rumble::wasm::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod self_play {
    use rand::seq::IndexedRandom;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use ricochet_rumble::Settings;
    use ricochet_rumble::sim::{
        self, GameEvent, GameState, Intent, PieceKind, format_clock, legal_moves,
    };

    /// Give up on matches that refuse to end
    const MAX_TURNS: u32 = 400;

    pub fn run(seed: u64, settings: Settings) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut state = GameState::new(settings);

        for _ in 0..MAX_TURNS {
            // Simulated thinking time
            let think_ms = rng.random_range(200..4000);
            report(&sim::advance(&mut state, think_ms));
            if state.is_over() {
                break;
            }

            let player = state.current_player();
            let has_cannon = state.board().find(player, PieceKind::Cannon).is_some();
            let moves = legal_moves(state.board(), player, state.settings().capture_on_move);

            let intent = match moves.choose(&mut rng) {
                Some(_) if has_cannon && rng.random_bool(0.1) => Intent::Fire { player },
                Some((piece, to)) => Intent::Move { piece: piece.id, to: *to },
                None if has_cannon => Intent::Fire { player },
                None => {
                    log::warn!("{} has no legal action, stopping", player);
                    break;
                }
            };

            match sim::apply(&mut state, intent) {
                Ok(events) => report(&events),
                Err(e) => log::warn!("{} rejected: {}", player, e),
            }

            // Now and then take a move back and replay it
            if !state.is_over() && rng.random_bool(0.05) {
                for intent in [Intent::Undo, Intent::Redo] {
                    if let Ok(events) = sim::apply(&mut state, intent) {
                        log::info!("{:?}", intent);
                        report(&events);
                    }
                }
            }
        }

        println!("{}", state.board().render());
        match state.result() {
            Some(result) => println!("{} wins ({:?})", result.winner, result.reason),
            None => println!("No result after {} turns", MAX_TURNS),
        }
        let view = state.view();
        println!(
            "Clocks: black {} / white {}",
            format_clock(view.time_remaining.black),
            format_clock(view.time_remaining.white)
        );
    }

    fn report(events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::PieceMoved { piece, from, to } => {
                    log::info!("{} moved {} -> {}", piece, from, to)
                }
                GameEvent::ShotFired {
                    shooter,
                    origin,
                    replay,
                } => log::info!(
                    "{} fired from {} ({} steps, {} ms replay)",
                    shooter,
                    origin,
                    replay.steps.len(),
                    replay.duration_ms()
                ),
                GameEvent::BulletStep { from, to } => log::debug!("bullet {} -> {}", from, to),
                GameEvent::PieceCaptured {
                    kind, owner, at, ..
                } => log::info!("captured {} {} at {}", owner, kind, at),
                GameEvent::GameOver { winner, reason } => {
                    log::info!("game over: {} wins ({:?})", winner, reason)
                }
                GameEvent::PieceSelected { piece, destinations } => {
                    log::debug!("selected {}: {:?}", piece, destinations)
                }
                GameEvent::StateChanged { state } => log::debug!(
                    "turn: {}, clocks {}/{}",
                    state.current_player,
                    format_clock(state.time_remaining.black),
                    format_clock(state.time_remaining.white)
                ),
            }
        }
    }
}
