//! Two-anchor elastic launcher
//!
//! The pocket ("head") hangs between two fixed anchors on elastic bands. While
//! held it follows the finger; once let go the bands pull it forward and the
//! shot leaves the pocket at peak speed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::projection::Projection;
use super::state::{GameEvent, HapticTier};
use crate::clamp;
use crate::consts::*;
use crate::tuning::SpringTuning;

/// Launcher state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpringState {
    /// Loaded and idle, may be grabbed
    Resting,
    /// Following the finger
    Held,
    /// Let go with enough stretch: bands are accelerating the shot
    Released,
    /// Shot has left, reloading
    Emitted { reload: f32 },
}

/// A shot leaving the pocket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Planar launch speed
    pub speed: f32,
}

/// The launcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    pub state: SpringState,
    pub anchors: [Vec2; 2],
    /// Pocket position on the ground plane
    pub head: Vec2,
    pub head_vel: Vec2,
    pub band_lengths: [f32; 2],
    /// Last stretch reported for haptic ticks
    stretch_effect: f32,
}

impl Default for Spring {
    fn default() -> Self {
        Self::new()
    }
}

impl Spring {
    pub fn new() -> Self {
        let mut spring = Self {
            state: SpringState::Resting,
            anchors: [
                Vec2::new(-ANCHOR_WIDTH / 2.0, ANCHOR_HEIGHT),
                Vec2::new(ANCHOR_WIDTH / 2.0, ANCHOR_HEIGHT),
            ],
            head: Vec2::ZERO,
            head_vel: Vec2::ZERO,
            band_lengths: [0.0; 2],
            stretch_effect: 0.0,
        };
        spring.reset();
        spring
    }

    /// Pocket back to the middle, at rest
    pub fn reset(&mut self) {
        self.head = (self.anchors[0] + self.anchors[1]) / 2.0;
        self.head_vel = Vec2::ZERO;
        self.state = SpringState::Resting;
        self.compute_band_lengths();
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        !matches!(self.state, SpringState::Emitted { .. })
    }

    pub fn longest_band(&self) -> f32 {
        self.band_lengths[0].max(self.band_lengths[1])
    }

    /// Drawn band stroke width: thinner as the bands stretch
    pub fn band_width(&self) -> f32 {
        let span = self.anchors[1].x - self.anchors[0].x;
        let total = self.band_lengths[0] + self.band_lengths[1];
        if total <= 0.0 {
            return BAND_MAX_WIDTH;
        }
        clamp(BAND_MAX_WIDTH * span / total, 1.0, BAND_MAX_WIDTH)
    }

    fn compute_band_lengths(&mut self) {
        self.band_lengths = [
            self.anchors[0].distance(self.head),
            self.anchors[1].distance(self.head),
        ];
    }

    /// Grab the pocket if the touch is near it (or near its hotspot)
    ///
    /// Returns whether the spring is now held.
    pub fn hold(&mut self, touch: Vec2, projection: &Projection, tuning: &SpringTuning) -> bool {
        if self.state != SpringState::Resting {
            return self.state == SpringState::Held;
        }
        let pocket = projection.project(self.head.extend(0.0)).pos();
        let hotspot = touch - Vec2::new(0.0, tuning.hotspot_setback);
        if touch.distance(pocket) <= tuning.grab_distance
            || hotspot.distance(pocket) <= tuning.grab_distance
        {
            self.state = SpringState::Held;
            log::debug!("Spring grabbed at ({:.0}, {:.0})", touch.x, touch.y);
        }
        self.state == SpringState::Held
    }

    /// Drag the held pocket to follow a screen point
    pub fn move_to(&mut self, touch: Vec2, projection: &Projection, tuning: &SpringTuning) {
        if self.state != SpringState::Held {
            return;
        }
        let sy = touch.y.max(projection.touch_height());
        let Some(ground) = projection.unproject(Vec2::new(touch.x, sy - tuning.hotspot_setback))
        else {
            return;
        };
        self.head = ground;
        self.compute_band_lengths();
    }

    /// Let go: fire if stretched far enough, otherwise snap back unarmed
    pub fn release(&mut self, tuning: &SpringTuning) {
        if self.state != SpringState::Held {
            return;
        }
        if self.longest_band() > tuning.release_length {
            self.state = SpringState::Released;
            log::debug!("Spring released, band {:.0}", self.longest_band());
        } else {
            self.state = SpringState::Resting;
        }
        self.head_vel = Vec2::ZERO;
    }

    /// Haptic tick whenever total stretch crosses another step
    fn stretch_effect(&mut self, tuning: &SpringTuning) -> bool {
        let stretch = (self.band_lengths[0] - tuning.rest_length).max(0.0)
            + (self.band_lengths[1] - tuning.rest_length).max(0.0);
        let s1 = (stretch / tuning.stretch_step) as i32;
        let s0 = (self.stretch_effect / tuning.stretch_step) as i32;
        self.stretch_effect = stretch;
        s1 != s0
    }

    /// Advance band physics by one sub-tick
    ///
    /// Returns the launch if the shot left the pocket during this step.
    pub fn update(
        &mut self,
        dt: f32,
        tuning: &SpringTuning,
        events: &mut Vec<GameEvent>,
    ) -> Option<Launch> {
        if self.stretch_effect(tuning) {
            events.push(GameEvent::Haptic(HapticTier::Tick));
        }
        if self.state == SpringState::Held {
            return None;
        }

        // Two independent one-sided springs
        let mut force = Vec2::ZERO;
        for (anchor, length) in self.anchors.iter().zip(self.band_lengths) {
            if length > tuning.rest_length {
                let pull = (length - tuning.rest_length) * tuning.band_k;
                force += (*anchor - self.head).normalize_or_zero() * pull;
            }
        }

        let mass = match self.state {
            SpringState::Emitted { .. } => tuning.unloaded_mass,
            _ => tuning.loaded_mass,
        };

        let vel0 = self.head_vel;
        self.head_vel += force / mass * dt;

        if self.state != SpringState::Released {
            let c0 = (-dt / tuning.damping_time).exp();
            let max = Vec2::splat(tuning.max_head_speed);
            self.head_vel = (self.head_vel * c0).clamp(-max, max);
        }

        // Average-velocity integration
        self.head += (self.head_vel + vel0) / 2.0 * dt;
        self.compute_band_lengths();

        let speed0 = vel0.length();
        let speed1 = self.head_vel.length();

        let mut launch = None;
        if self.state == SpringState::Released && speed1 < speed0 {
            // Peak speed: the bands have done their work
            self.state = SpringState::Emitted { reload: 0.0 };
            launch = Some(Launch {
                pos: self.head,
                vel: self.head_vel,
                speed: speed1,
            });
        }

        if let SpringState::Emitted { reload } = &mut self.state {
            *reload += dt;
            if *reload > tuning.reload_time {
                self.state = SpringState::Resting;
            }
        }

        launch
    }
}
