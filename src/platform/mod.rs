//! Platform abstraction layer
//!
//! Contracts between the simulation and the host application:
//! - Notification hooks (status text, score text, haptics)
//! - Abstract input (pointer phases, start keys)
//! - Threading: one lock per tick, background runner

pub mod runner;

pub use runner::{SharedGame, SimRunner};

use crate::sim::HapticTier;

/// Fire-and-forget hooks implemented by the host
///
/// Called after the simulation lock work is done for a frame or input event;
/// implementations must not block.
pub trait Notifier {
    /// Status text changed (empty hides it)
    fn on_message(&mut self, _text: &str) {}
    fn on_score_changed(&mut self, _score: u32) {}
    fn on_haptic_pulse(&mut self, _tier: HapticTier) {}
}

/// Ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {}

/// Writes notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn on_message(&mut self, text: &str) {
        if !text.is_empty() {
            log::info!("Message: {}", text);
        }
    }

    fn on_score_changed(&mut self, score: u32) {
        log::info!("Score: {}", score);
    }

    fn on_haptic_pulse(&mut self, tier: HapticTier) {
        log::trace!("Haptic {:?} ({} ms)", tier, tier.duration_ms());
    }
}

/// Keys the game reacts to, already translated from device codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    S,
    Other,
}

impl Key {
    /// Keys that start a game or resume from pause
    pub fn is_start(self) -> bool {
        matches!(self, Key::Up | Key::Down | Key::S)
    }
}

/// Pointer gesture phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}
