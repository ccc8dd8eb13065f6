//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (pool order, ids allocated monotonically)
//! - No rendering or platform dependencies

pub mod flower;
pub mod level;
pub mod projection;
pub mod render;
pub mod shot;
pub mod spring;
pub mod state;
pub mod target;
pub mod tick;

pub use level::{pause, reset, set_mode, start_game_input, unpause};
pub use projection::{Projection, ScreenPoint};
pub use render::{DisplayList, RenderItem};
pub use spring::{Launch, Spring, SpringState};
pub use state::{
    Body, EntityId, Flower, FlowerState, GameEvent, GameMode, GameState, HapticTier, ScorePhase,
    Shot, Target, TargetState,
};
pub use tick::{substeps, tick};
