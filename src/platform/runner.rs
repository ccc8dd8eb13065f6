//! Shared game handle and background simulation thread
//!
//! Every external call takes the game lock for its whole duration, so a
//! reader never sees a half-finished tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::game::Game;

/// A `Game` behind one mutex
#[derive(Clone)]
pub struct SharedGame(Arc<Mutex<Game>>);

impl SharedGame {
    pub fn new(game: Game) -> Self {
        Self(Arc::new(Mutex::new(game)))
    }

    /// Run `f` with exclusive access to the game
    pub fn with<R>(&self, f: impl FnOnce(&mut Game) -> R) -> R {
        // State is consistent between calls, so a poisoned lock is still usable
        let mut game = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut game)
    }
}

/// Drives `Game::advance` from a background thread until stopped
pub struct SimRunner {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SimRunner {
    /// Start ticking `game` every `interval` of real time
    pub fn spawn(game: SharedGame, interval: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            let start = Instant::now();
            while !flag.load(Ordering::Acquire) {
                let now = start.elapsed().as_secs_f64();
                game.with(|g| g.advance(now));
                thread::sleep(interval);
            }
            log::debug!("Simulation runner stopped");
        });
        log::debug!("Simulation runner started ({:?} interval)", interval);
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Signal the thread and wait for it; the current tick always completes
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Simulation thread panicked");
            }
        }
    }
}

impl Drop for SimRunner {
    fn drop(&mut self) {
        self.shutdown();
    }
}
