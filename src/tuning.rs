//! Game balance data
//!
//! Every gameplay timing, speed and score value lives here so a level designer
//! can override any subset from JSON. Missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::ANCHOR_WIDTH;

/// Errors from loading tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value `{field}` must be positive")]
    NonPositive { field: &'static str },
    #[error("tuning range `{field}` is inverted")]
    InvertedRange { field: &'static str },
}

/// Wall-clock to sub-tick conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockTuning {
    /// Longest real-time gap simulated in one frame (seconds)
    pub max_frame: f32,
    /// Longest single sub-tick (seconds)
    pub max_substep: f32,
    /// Delay before simulation restarts after reset/resume (seconds)
    pub resume_delay: f64,
}

impl Default for ClockTuning {
    fn default() -> Self {
        Self {
            max_frame: 0.2,
            max_substep: 0.017,
            resume_delay: 0.1,
        }
    }
}

/// Launcher band physics and grab handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringTuning {
    /// Screen-space grab radius around the pocket
    pub grab_distance: f32,
    /// Screen offset between the finger and the pocket
    pub hotspot_setback: f32,
    pub reload_time: f32,
    pub band_k: f32,
    pub rest_length: f32,
    /// Longest band must exceed this on release to fire
    pub release_length: f32,
    pub loaded_mass: f32,
    pub unloaded_mass: f32,
    /// Damping time constant while not firing (seconds)
    pub damping_time: f32,
    pub max_head_speed: f32,
    /// Total stretch change that triggers one haptic tick
    pub stretch_step: f32,
}

impl Default for SpringTuning {
    fn default() -> Self {
        Self {
            grab_distance: 60.0,
            hotspot_setback: 40.0,
            reload_time: 0.5,
            band_k: 200.0,
            rest_length: 40.0,
            release_length: ANCHOR_WIDTH / 2.0 + 20.0,
            loaded_mass: 2.0,
            unloaded_mass: 1.0,
            damping_time: 0.1,
            max_head_speed: 1000.0,
            stretch_step: 10.0,
        }
    }
}

/// Projectile flight and scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotTuning {
    pub gravity: f32,
    /// Launch height velocity as a fraction of planar launch speed
    pub dz_factor: f32,
    pub hit_reward: i32,
    pub land_penalty: i32,
}

impl Default for ShotTuning {
    fn default() -> Self {
        Self {
            gravity: 250.0,
            dz_factor: 0.15,
            hit_reward: 5,
            land_penalty: 1,
        }
    }
}

/// Bug life cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetTuning {
    pub egg_time: f32,
    pub open_time: f32,
    pub pre_rise_time: f32,
    pub rise_time: f32,
    pub dwell_time: f32,
    pub drop_time: f32,
    pub close_time: f32,
    pub die_time: f32,
    /// Munch time at walk speed factor 1.0
    pub munch_time: f32,
    pub shrivel_time: f32,
    pub burrow_time: f32,
    pub pupate_time: f32,
    pub fly_rise_time: f32,
    pub lay_egg_time: f32,
    /// Walk speed at walk speed factor 1.0
    pub walk_speed: f32,
    pub fly_speed: f32,
    pub max_radius: f32,
    pub max_hole_radius: f32,
    /// Walk legs that may end without food before the bug gives up
    pub max_failed_walks: u32,
    /// Placement attempts before target creation gives up
    pub placement_retries: u32,
    /// Rejection-sampling attempts for one valid spot
    pub spot_attempts: u32,
    /// Hatch delay for staggered eggs (seconds)
    pub egg_predelay: f32,
    /// Score lost when a larva closes back up unfed
    pub close_penalty: i32,
}

impl Default for TargetTuning {
    fn default() -> Self {
        Self {
            egg_time: 1.0,
            open_time: 1.0,
            pre_rise_time: 0.5,
            rise_time: 0.1,
            dwell_time: 3.0,
            drop_time: 0.1,
            close_time: 1.0,
            die_time: 0.25,
            munch_time: 3.0,
            shrivel_time: 1.0,
            burrow_time: 1.0,
            pupate_time: 3.0,
            fly_rise_time: 1.0,
            lay_egg_time: 2.0,
            walk_speed: 400.0,
            fly_speed: 800.0,
            max_radius: 200.0,
            max_hole_radius: 100.0,
            max_failed_walks: 2,
            placement_retries: 100,
            spot_attempts: 64,
            egg_predelay: 0.5,
            close_penalty: 1,
        }
    }
}

/// Flower growth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowerTuning {
    pub sprout_time: f32,
    pub grow_time: f32,
    pub bud_time: f32,
    /// Time for the bloom to open fully (presentation ramp)
    pub bloom_open_time: f32,
    pub seed_time: f32,
}

impl Default for FlowerTuning {
    fn default() -> Self {
        Self {
            sprout_time: 0.5,
            grow_time: 0.5,
            bud_time: 0.5,
            bloom_open_time: 0.5,
            seed_time: 1.0,
        }
    }
}

/// Level-end sequence, bonuses and game-over pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    pub message_time: f32,
    pub score_flower_interval: f32,
    pub move_flower_interval: f32,
    pub add_egg_interval: f32,
    /// A bonus flower is awarded every time the score passes a multiple of this
    pub bonus_flower_interval: u32,
    /// GAME_OVER reverts to ATTRACT after this long
    pub game_over_time: f32,
    /// GAME_OVER ignores start input until this long has passed
    pub restart_dwell: f32,
    pub initial_targets: u32,
    pub initial_flowers: u32,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            message_time: 2.0,
            score_flower_interval: 0.5,
            move_flower_interval: 0.5,
            add_egg_interval: 0.5,
            bonus_flower_interval: 1000,
            game_over_time: 15.0,
            restart_dwell: 3.0,
            initial_targets: 5,
            initial_flowers: 5,
        }
    }
}

/// Complete game balance table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub clock: ClockTuning,
    pub spring: SpringTuning,
    pub shot: ShotTuning,
    pub target: TargetTuning,
    pub flower: FlowerTuning,
    pub scoring: ScoringTuning,
}

impl Tuning {
    /// Parse tuning JSON (partial documents allowed) and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let c = &self.clock;
        let s = &self.spring;
        let t = &self.target;
        let f = &self.flower;
        let sc = &self.scoring;

        let positive: [(&'static str, f32); 36] = [
            ("clock.max_frame", c.max_frame),
            ("clock.max_substep", c.max_substep),
            ("spring.grab_distance", s.grab_distance),
            ("spring.reload_time", s.reload_time),
            ("spring.band_k", s.band_k),
            ("spring.loaded_mass", s.loaded_mass),
            ("spring.unloaded_mass", s.unloaded_mass),
            ("spring.damping_time", s.damping_time),
            ("spring.max_head_speed", s.max_head_speed),
            ("spring.stretch_step", s.stretch_step),
            ("target.egg_time", t.egg_time),
            ("target.open_time", t.open_time),
            ("target.pre_rise_time", t.pre_rise_time),
            ("target.rise_time", t.rise_time),
            ("target.dwell_time", t.dwell_time),
            ("target.drop_time", t.drop_time),
            ("target.close_time", t.close_time),
            ("target.die_time", t.die_time),
            ("target.munch_time", t.munch_time),
            ("target.shrivel_time", t.shrivel_time),
            ("target.burrow_time", t.burrow_time),
            ("target.pupate_time", t.pupate_time),
            ("target.fly_rise_time", t.fly_rise_time),
            ("target.lay_egg_time", t.lay_egg_time),
            ("target.walk_speed", t.walk_speed),
            ("target.fly_speed", t.fly_speed),
            ("target.max_radius", t.max_radius),
            ("flower.sprout_time", f.sprout_time),
            ("flower.grow_time", f.grow_time),
            ("flower.bud_time", f.bud_time),
            ("flower.bloom_open_time", f.bloom_open_time),
            ("flower.seed_time", f.seed_time),
            ("scoring.message_time", sc.message_time),
            ("scoring.score_flower_interval", sc.score_flower_interval),
            ("scoring.move_flower_interval", sc.move_flower_interval),
            ("scoring.add_egg_interval", sc.add_egg_interval),
        ];
        // `!(v > 0)` also rejects NaN
        if let Some(&(field, _)) = positive.iter().find(|(_, v)| !(*v > 0.0)) {
            return Err(TuningError::NonPositive { field });
        }
        if sc.bonus_flower_interval == 0 {
            return Err(TuningError::NonPositive {
                field: "scoring.bonus_flower_interval",
            });
        }
        if t.spot_attempts == 0 {
            return Err(TuningError::NonPositive {
                field: "target.spot_attempts",
            });
        }
        if c.max_substep > c.max_frame {
            return Err(TuningError::InvertedRange {
                field: "clock.max_substep..clock.max_frame",
            });
        }
        if sc.restart_dwell > sc.game_over_time {
            return Err(TuningError::InvertedRange {
                field: "scoring.restart_dwell..scoring.game_over_time",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "shot": { "hit_reward": 10 } }"#).unwrap();
        assert_eq!(tuning.shot.hit_reward, 10);
        assert_eq!(tuning.shot.land_penalty, 1);
        assert_eq!(tuning.target, TargetTuning::default());
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        let err = Tuning::from_json(r#"{ "target": { "egg_time": 0.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::NonPositive {
                field: "target.egg_time"
            }
        ));
    }

    #[test]
    fn test_rejects_zero_phase_intervals() {
        for (json, expected) in [
            (r#"{ "scoring": { "move_flower_interval": 0.0 } }"#, "scoring.move_flower_interval"),
            (r#"{ "scoring": { "add_egg_interval": 0.0 } }"#, "scoring.add_egg_interval"),
            (r#"{ "flower": { "bloom_open_time": 0.0 } }"#, "flower.bloom_open_time"),
            (r#"{ "flower": { "seed_time": -1.0 } }"#, "flower.seed_time"),
            (r#"{ "target": { "die_time": 0.0 } }"#, "target.die_time"),
        ] {
            match Tuning::from_json(json) {
                Err(TuningError::NonPositive { field }) => assert_eq!(field, expected),
                other => panic!("{} accepted: {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_rejects_inverted_clock() {
        let err =
            Tuning::from_json(r#"{ "clock": { "max_frame": 0.01, "max_substep": 0.02 } }"#)
                .unwrap_err();
        assert!(matches!(err, TuningError::InvertedRange { .. }));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_json_round_trip_preserves_defaults() {
        let json = Tuning::default().to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), Tuning::default());
    }
}
