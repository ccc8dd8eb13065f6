//! Fixed timestep simulation tick
//!
//! One sub-tick runs every subsystem once, in a fixed order: spring, flowers,
//! targets, shots, then the level controller.

use super::flower::update_flowers;
use super::level::update_game;
use super::shot::update_shots;
use super::state::{GameState, Shot};
use super::target::update_targets;

/// Advance the game state by one sub-tick
pub fn tick(state: &mut GameState, dt: f32) {
    state.game_timer += dt;

    if let Some(launch) = state
        .spring
        .update(dt, &state.tuning.spring, &mut state.events)
    {
        let id = state.next_entity_id();
        let shot = Shot::from_launch(id, &launch, state.tuning.shot.dz_factor);
        log::debug!(
            "Shot {} launched at speed {:.0}, dz {:.0}",
            id,
            launch.speed,
            shot.body.vel.z
        );
        state.shots.push(shot);
    }

    update_flowers(state, dt);
    update_targets(state, dt);
    update_shots(state, dt);
    update_game(state, dt);
}

/// Split `elapsed` seconds into equal sub-ticks no longer than `max_step`
///
/// Yields nothing for a non-positive `elapsed`.
pub fn substeps(elapsed: f32, max_step: f32) -> impl Iterator<Item = f32> {
    let n = if elapsed > 0.0 && max_step > 0.0 {
        // Tolerance keeps exact multiples from gaining an extra sliver
        ((elapsed / max_step - 1e-6).ceil() as usize).max(1)
    } else {
        0
    };
    let step = if n > 0 { elapsed / n as f32 } else { 0.0 };
    (0..n).map(move |_| step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::set_mode;
    use crate::sim::projection::Projection;
    use crate::sim::spring::SpringState;
    use crate::sim::state::{Body, GameMode, Target, TargetState};
    use crate::tuning::Tuning;
    use glam::{Vec2, Vec3};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        state.projection = Projection::new(320.0, 480.0);
        set_mode(&mut state, GameMode::Playing);
        state
    }

    #[test]
    fn test_substeps_half_second() {
        let steps: Vec<f32> = substeps(0.5, 0.017).collect();
        assert_eq!(steps.len(), (0.5f32 / 0.017).ceil() as usize);
        let total: f32 = steps.iter().sum();
        assert!((total - 0.5).abs() < 1e-4);
        assert!(steps.iter().all(|&s| s <= 0.017));
    }

    #[test]
    fn test_substeps_degenerate() {
        assert_eq!(substeps(0.0, 0.017).count(), 0);
        assert_eq!(substeps(-1.0, 0.017).count(), 0);
        assert_eq!(substeps(0.001, 0.017).collect::<Vec<_>>(), vec![0.001]);
        assert_eq!(substeps(0.034, 0.017).count(), 2);
    }

    #[test]
    fn test_release_fires_exactly_one_shot() {
        let mut state = playing(5);
        let tuning = state.tuning.spring.clone();
        let pocket = state.projection.project(state.spring.head.extend(0.0)).pos();
        assert!(state.spring.hold(pocket, &state.projection, &tuning));
        state
            .spring
            .move_to(Vec2::new(160.0, 520.0), &state.projection, &tuning);
        state.spring.release(&tuning);
        assert_eq!(state.spring.state, SpringState::Released);

        let mut shot_ids = HashSet::new();
        for _ in 0..200 {
            tick(&mut state, 0.01);
            shot_ids.extend(state.shots.iter().map(|s| s.id));
        }
        assert_eq!(shot_ids.len(), 1);
        assert_eq!(state.spring.state, SpringState::Resting);
    }

    #[test]
    fn test_short_pull_fires_nothing() {
        let mut state = playing(6);
        let tuning = state.tuning.spring.clone();
        let pocket = state.projection.project(state.spring.head.extend(0.0)).pos();
        assert!(state.spring.hold(pocket, &state.projection, &tuning));
        state.spring.release(&tuning);
        for _ in 0..100 {
            tick(&mut state, 0.01);
            assert!(state.shots.is_empty());
        }
    }

    #[test]
    fn test_game_timer_accumulates() {
        let mut state = playing(7);
        for dt in substeps(0.2, 0.017) {
            tick(&mut state, dt);
        }
        assert!((state.game_timer - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_fly_shot_mid_lay_drops_no_egg() {
        let mut state = GameState::new(8, Tuning::default());
        state.projection = Projection::new(320.0, 480.0);
        state.mode = GameMode::Playing;
        state.create_flower();

        let fly_id = state.next_entity_id();
        let mut fly = Target::new(fly_id, Vec2::new(0.0, 1200.0), state.tuning.target.max_radius);
        fly.state = TargetState::FlyLayEgg;
        fly.timer = state.tuning.target.lay_egg_time - 0.005;
        state.targets.push(fly);
        let shot_id = state.next_entity_id();
        state.shots.push(Shot {
            id: shot_id,
            body: Body::at(Vec3::new(0.0, 1200.0, 50.0)),
            bounced: false,
        });

        tick(&mut state, 0.001);
        assert_eq!(state.target(fly_id).map(|t| t.body.alive), Some(false));

        tick(&mut state, 0.01);
        assert!(state.targets.is_empty());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = playing(99999);
        let mut state2 = playing(99999);

        for _ in 0..2000 {
            tick(&mut state1, 0.017);
            tick(&mut state2, 0.017);
        }

        assert_eq!(state1.targets, state2.targets);
        assert_eq!(state1.flowers, state2.flowers);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.mode, state2.mode);
    }

    proptest! {
        #[test]
        fn prop_substeps_bounded_and_complete(elapsed in 0.0001f32..0.2, max in 0.001f32..0.05) {
            let steps: Vec<f32> = substeps(elapsed, max).collect();
            prop_assert!(!steps.is_empty());
            let total: f32 = steps.iter().sum();
            prop_assert!((total - elapsed).abs() < 1e-4);
            for s in steps {
                prop_assert!(s <= max * (1.0 + 1e-5));
            }
        }
    }
}
