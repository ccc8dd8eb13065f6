//! Flower growth
//!
//! Sprout → grow → bud → bloom, then bloom holds until eaten or replanted.

use super::state::{Flower, FlowerState, GameState};
use crate::tuning::FlowerTuning;
use crate::{make_lerper, timer_check};

impl Flower {
    /// Advance growth by one sub-tick (at most one stage)
    pub fn update(&mut self, dt: f32, tuning: &FlowerTuning) {
        self.timer += dt;
        match self.state {
            FlowerState::Sprout => {
                if timer_check(&mut self.timer, tuning.sprout_time) {
                    self.state = FlowerState::Grow;
                }
            }
            FlowerState::Grow => {
                if timer_check(&mut self.timer, tuning.grow_time) {
                    self.state = FlowerState::Bud;
                }
            }
            FlowerState::Bud => {
                if timer_check(&mut self.timer, tuning.bud_time) {
                    self.state = FlowerState::Bloom;
                }
            }
            // Blooms indefinitely; seeding is not wired up yet
            FlowerState::Bloom => {}
            FlowerState::Seed => {
                if timer_check(&mut self.timer, tuning.seed_time) {
                    self.state = FlowerState::Sprout;
                }
            }
        }
    }

    /// Stem height as a fraction of full height
    pub fn stem_factor(&self, tuning: &FlowerTuning) -> f32 {
        match self.state {
            FlowerState::Seed => 0.0,
            FlowerState::Sprout => 0.1,
            FlowerState::Grow => 0.1 + 0.9 * make_lerper(self.timer, 0.0, tuning.grow_time),
            FlowerState::Bud | FlowerState::Bloom => 1.0,
        }
    }

    /// How far the petals have opened (0 unless blooming)
    pub fn bloom_factor(&self, tuning: &FlowerTuning) -> f32 {
        if self.state == FlowerState::Bloom {
            make_lerper(self.timer, 0.0, tuning.bloom_open_time)
        } else {
            0.0
        }
    }
}

/// Grow every flower
pub fn update_flowers(state: &mut GameState, dt: f32) {
    let tuning = &state.tuning.flower;
    for flower in &mut state.flowers {
        flower.update(dt, tuning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_grows_to_bloom_and_holds() {
        let tuning = FlowerTuning::default();
        let mut flower = Flower::new(1, Vec2::new(0.0, 500.0));
        let mut seen = vec![flower.state];
        for _ in 0..1000 {
            flower.update(0.01, &tuning);
            if seen.last() != Some(&flower.state) {
                seen.push(flower.state);
            }
        }
        assert_eq!(
            seen,
            vec![
                FlowerState::Sprout,
                FlowerState::Grow,
                FlowerState::Bud,
                FlowerState::Bloom
            ]
        );
        assert!(flower.is_edible());
    }

    #[test]
    fn test_timer_carries_over() {
        let tuning = FlowerTuning::default();
        let mut flower = Flower::new(1, Vec2::ZERO);
        flower.update(0.7, &tuning);
        assert_eq!(flower.state, FlowerState::Grow);
        assert!((flower.timer - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_negative_timer_delays_growth() {
        let tuning = FlowerTuning::default();
        let mut flower = Flower::new(1, Vec2::ZERO);
        flower.timer = -1.0;
        flower.update(1.0, &tuning);
        assert_eq!(flower.state, FlowerState::Sprout);
    }

    #[test]
    fn test_dead_bloom_not_edible() {
        let mut flower = Flower::new(1, Vec2::ZERO);
        flower.state = FlowerState::Bloom;
        flower.body.alive = false;
        assert!(!flower.is_edible());
    }

    #[test]
    fn test_growth_factors() {
        let tuning = FlowerTuning::default();
        let mut flower = Flower::new(1, Vec2::ZERO);
        assert_eq!(flower.stem_factor(&tuning), 0.1);
        assert_eq!(flower.bloom_factor(&tuning), 0.0);
        flower.state = FlowerState::Grow;
        flower.timer = tuning.grow_time / 2.0;
        assert!((flower.stem_factor(&tuning) - 0.55).abs() < 1e-6);
        flower.state = FlowerState::Bloom;
        flower.timer = tuning.bloom_open_time;
        assert_eq!(flower.bloom_factor(&tuning), 1.0);
    }
}
