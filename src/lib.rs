//! Flingers - slingshot arcade game simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spring, shots, bugs, flowers, levels)
//! - `game`: Wall-clock driver and input/notification façade
//! - `platform`: Collaborator contracts (hooks, abstract input, shared runner)
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use tuning::{Tuning, TuningError};

/// Playfield and projection constants
pub mod consts {
    /// Projection: vertical stretch of playfield depth on screen
    pub const YSCALE: f32 = 5.5;
    /// Projection: screen rows below the canvas bottom where depth 0 lands
    pub const YOFFSET: f32 = 120.0;
    /// Projection: perspective scale numerator
    pub const ZSCALE: f32 = 100.0;
    /// Projection: depth offset so y = 0 has a finite scale
    pub const ZOFFSET: f32 = 120.0;
    /// Inverse projection rejects denominators at or below this
    pub const UNPROJECT_MIN_DENOM: f32 = 1.0;

    /// Spring anchor height (playfield y)
    pub const ANCHOR_HEIGHT: f32 = 150.0;
    /// Distance between the two spring anchors
    pub const ANCHOR_WIDTH: f32 = 400.0;
    /// Widest drawn band stroke
    pub const BAND_MAX_WIDTH: f32 = 8.0;
    /// Touches are clamped to no higher than this far beyond the anchors
    pub const TOUCH_DEPTH_MARGIN: f32 = 50.0;

    /// Spawn cone apex depth (cone half-width is zero here)
    pub const TARGET_MIN_CONE_Y: f32 = 0.0;
    /// Nearest spawn depth
    pub const TARGET_MIN_Y: f32 = 200.0;
    /// Farthest spawn depth
    pub const TARGET_MAX_Y: f32 = 2200.0;
    /// Depth used to locate the horizon line
    pub const HORIZON_Y: f32 = 10000.0;
    /// The game leaves INVALID once the cone is at least this wide
    pub const MIN_PLAYABLE_HALF_WIDTH: f32 = 100.0;

    /// Shot radius used by renderers
    pub const SHOT_RADIUS: f32 = 40.0;

    /// Escaping flies must clear the canvas edge by this much
    pub const ESCAPE_MARGIN: f32 = 50.0;
    /// Per-unit-scale extra escape margin (covers the fly's body)
    pub const ESCAPE_BODY_MARGIN: f32 = 200.0;
}

/// Clamp `x` into `[min, max]`
#[inline]
pub fn clamp(x: f32, min: f32, max: f32) -> f32 {
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}

/// Returns 0 at `x == min`, 1 at `x == max`, linear in between, clamped to [0, 1].
///
/// `min > max` is allowed and yields a falling ramp.
#[inline]
pub fn make_lerper(x: f32, min: f32, max: f32) -> f32 {
    clamp((x - min) / (max - min), 0.0, 1.0)
}

/// Linear blend from `min` to `max` by `t`
#[inline]
pub fn lerp(t: f32, min: f32, max: f32) -> f32 {
    min + (max - min) * t
}

/// State timer threshold test: once `timer >= limit`, subtract `limit` (keeping
/// the overshoot) and return true
#[inline]
pub fn timer_check(timer: &mut f32, limit: f32) -> bool {
    if *timer >= limit {
        *timer -= limit;
        true
    } else {
        false
    }
}

/// Planar distance
#[inline]
pub fn distance(x0: f32, y0: f32, x1: f32, y1: f32) -> f32 {
    let dx = x1 - x0;
    let dy = y1 - y0;
    (dx * dx + dy * dy).sqrt()
}

/// 3D distance
#[inline]
pub fn distance3(x0: f32, y0: f32, z0: f32, x1: f32, y1: f32, z1: f32) -> f32 {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let dz = z1 - z0;
    (dx * dx + dy * dy + dz * dz).sqrt()
}
