//! Flingers entry point
//!
//! Headless native driver: runs the simulation on simulated time with a
//! scripted player, logging what happens. Set `RUST_LOG=debug` for per-entity
//! detail. An optional first argument names a tuning JSON file.

use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;

use flingers::platform::LogNotifier;
use flingers::sim::{GameMode, SpringState};
use flingers::{Game, Tuning};

/// Simulated frame interval (seconds)
const FRAME: f64 = 1.0 / 60.0;
/// Length of the demo run (seconds)
const DEMO_SECONDS: f64 = 120.0;

const VIEWPORT: (f32, f32) = (320.0, 480.0);

fn load_tuning() -> Tuning {
    let Some(path) = std::env::args().nth(1) else {
        return Tuning::default();
    };
    let loaded = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
    match loaded {
        Ok(tuning) => tuning,
        Err(e) => {
            log::warn!("Ignoring tuning file {}: {}", path, e);
            Tuning::default()
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Flingers (headless) starting...");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut game = Game::new(seed, load_tuning(), Box::new(LogNotifier));
    game.set_viewport(VIEWPORT.0, VIEWPORT.1);

    let mut now = 0.0;
    game.advance(now);
    game.pointer_down(Vec2::ZERO);

    let mut aim = 0usize;
    while now < DEMO_SECONDS && game.mode() == GameMode::Playing {
        now += FRAME;
        game.advance(now);

        // Pull back and let go whenever the pocket is loaded
        if game.state().spring.state == SpringState::Resting {
            let projection = &game.state().projection;
            let pocket = projection
                .project(game.state().spring.head.extend(0.0))
                .pos();
            let sway = [-60.0, -20.0, 20.0, 60.0][aim % 4];
            let pull = Vec2::new(VIEWPORT.0 / 2.0 - sway, VIEWPORT.1 + 40.0);
            aim += 1;

            game.pointer_down(pocket);
            game.pointer_move(pull);
            game.pointer_up(pull);
        }
    }

    log::info!(
        "Demo finished after {:.1}s: level {}, score {}, mode {:?}",
        now,
        game.level(),
        game.score(),
        game.mode()
    );
}
