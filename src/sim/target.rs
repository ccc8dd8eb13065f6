//! Bug life cycle
//!
//! Egg → larva (look) → walk/munch → burrow → pupate → fly → lay eggs → escape.
//! Each state is timed; crossing the threshold subtracts it from the timer and
//! advances at most one state per sub-tick.

use glam::{Vec2, Vec3};

use super::level::{max_eggs_to_lay, munch_time, walk_speed_factor};
use super::state::{GameState, Target, TargetState};
use crate::tuning::TargetTuning;
use crate::{make_lerper, timer_check};

/// Legs shorter than this count as already arrived
const MIN_TRAVEL_DISTANCE: f32 = 1.0;

impl Target {
    /// Shots can only hit a bug while it is exposed
    pub fn hit_radius(&self) -> f32 {
        match self.state {
            TargetState::Egg
            | TargetState::Pupate
            | TargetState::Shrivel
            | TargetState::LookOpen
            | TargetState::LookPreRise
            | TargetState::LookClose
            | TargetState::LarvaDie => 0.0,
            _ => self.max_radius,
        }
    }

    /// Radius of the burrow opening drawn under the bug
    pub fn hole_radius(&self, tuning: &TargetTuning) -> f32 {
        let f = match self.state {
            TargetState::LookOpen => make_lerper(self.timer, 0.0, tuning.open_time),
            TargetState::LookPreRise
            | TargetState::LookRise
            | TargetState::LookDwellBeforeDrop
            | TargetState::LookDrop
            | TargetState::Burrow
            | TargetState::FlyRise => 1.0,
            TargetState::LookClose => make_lerper(self.timer, tuning.close_time, 0.0),
            TargetState::LarvaDie => make_lerper(self.timer, tuning.die_time, 0.0),
            _ => 0.0,
        };
        tuning.max_hole_radius * f.clamp(0.0, 1.0)
    }

    /// Aim at `dest` at `speed` and set the leg duration
    fn set_course(&mut self, dest: Vec2, speed: f32) {
        let offset = dest - self.body.ground_pos();
        let dist = offset.length();
        if dist < MIN_TRAVEL_DISTANCE {
            self.body.vel = Vec3::ZERO;
            self.travel_time = 0.0;
        } else {
            self.body.dir = offset / dist;
            self.body.vel = (self.body.dir * speed).extend(0.0);
            self.travel_time = dist / speed;
        }
    }

    #[inline]
    fn advance_position(&mut self, dt: f32) {
        self.body.pos += self.body.vel * dt;
    }
}

/// Update every bug, then add freshly laid eggs and prune the dead
pub fn update_targets(state: &mut GameState, dt: f32) {
    let mut targets = std::mem::take(&mut state.targets);
    let mut eggs_to_spawn = Vec::new();

    // Bugs shot earlier this tick wait for the prune below
    for target in targets.iter_mut().filter(|t| t.body.alive) {
        update_target(state, target, dt, &mut eggs_to_spawn);
    }

    targets.append(&mut eggs_to_spawn);
    state.targets = targets;
    state.prune_targets_and_flowers();
}

fn update_target(state: &mut GameState, t: &mut Target, dt: f32, eggs: &mut Vec<Target>) {
    t.timer += dt;
    let tuning = state.tuning.target.clone();

    match t.state {
        TargetState::Egg => {
            if timer_check(&mut t.timer, tuning.egg_time) {
                t.state = TargetState::LookOpen;
                log::debug!("Target {} hatched", t.id);
            }
        }
        TargetState::LookOpen => {
            if timer_check(&mut t.timer, tuning.open_time) {
                t.state = TargetState::LookPreRise;
            }
        }
        TargetState::LookPreRise => {
            if timer_check(&mut t.timer, tuning.pre_rise_time) {
                t.state = TargetState::LookRise;
            }
        }
        TargetState::LookRise => {
            if timer_check(&mut t.timer, tuning.rise_time) {
                walk_towards_flower(state, t);
            }
        }
        TargetState::LookDwellBeforeDrop => {
            if timer_check(&mut t.timer, tuning.dwell_time) {
                t.state = TargetState::LookDrop;
            }
        }
        TargetState::LookDrop => {
            if timer_check(&mut t.timer, tuning.drop_time) {
                t.state = TargetState::LookClose;
            }
        }
        TargetState::LookClose => {
            if timer_check(&mut t.timer, tuning.close_time) {
                t.body.alive = false;
                state.add_score(-tuning.close_penalty);
                log::debug!("Target {} closed up unfed", t.id);
            }
        }
        // Terminal; nothing enters this state yet
        TargetState::LarvaDie => {}

        TargetState::Walk => {
            t.advance_position(dt);
            if timer_check(&mut t.timer, t.travel_time) {
                t.walked_count += 1;
                let at_food = t
                    .flower_to_eat
                    .and_then(|id| state.flower(id))
                    .is_some_and(|f| f.is_edible());
                if at_food {
                    t.state = TargetState::Munch;
                } else {
                    walk_towards_flower(state, t);
                }
            }
        }
        TargetState::Munch => {
            if timer_check(&mut t.timer, munch_time(&tuning, state.level)) {
                let flower = match t.flower_to_eat.take() {
                    Some(id) => state.flower_mut(id).filter(|f| f.body.alive),
                    None => None,
                };
                match flower {
                    Some(flower) => {
                        flower.body.alive = false;
                        log::debug!("Target {} ate flower {}", t.id, flower.id);
                        t.state = TargetState::Burrow;
                    }
                    None => {
                        log::debug!("Target {} missed its flower", t.id);
                        t.state = TargetState::Shrivel;
                    }
                }
            }
        }
        TargetState::Shrivel => {
            if timer_check(&mut t.timer, tuning.shrivel_time) {
                t.body.alive = false;
                log::debug!("Target {} shriveled", t.id);
            }
        }
        TargetState::Burrow => {
            if timer_check(&mut t.timer, tuning.burrow_time) {
                t.state = TargetState::Pupate;
            }
        }
        TargetState::Pupate => {
            if timer_check(&mut t.timer, tuning.pupate_time) {
                t.state = TargetState::FlyRise;
            }
        }
        TargetState::FlyRise => {
            if timer_check(&mut t.timer, tuning.fly_rise_time) {
                fly_to_location(state, t);
            }
        }
        TargetState::Fly => {
            t.advance_position(dt);
            if timer_check(&mut t.timer, t.travel_time) {
                t.body.dir = Vec2::new(0.0, -1.0);
                t.state = TargetState::FlyLayEgg;
            }
        }
        TargetState::FlyLayEgg => {
            if timer_check(&mut t.timer, tuning.lay_egg_time) {
                let id = state.next_entity_id();
                eggs.push(Target::new(id, t.body.ground_pos(), tuning.max_radius));
                t.eggs_laid += 1;
                log::debug!("Target {} laid egg {}", t.id, id);

                if t.eggs_laid < max_eggs_to_lay(state.level) {
                    fly_to_location(state, t);
                } else {
                    // Head for the nearer side edge
                    let side = if t.body.pos.x < 0.0 { -1.0 } else { 1.0 };
                    t.body.dir = Vec2::new(side, 0.0);
                    t.body.vel = Vec3::new(side * tuning.fly_speed, 0.0, 0.0);
                    t.state = TargetState::FlyEscape;
                }
            }
        }
        TargetState::FlyEscape => {
            t.advance_position(dt);
            if state.projection.is_past_side_edge(t.body.pos) {
                t.body.alive = false;
                log::debug!("Target {} escaped", t.id);
            }
        }
    }
}

/// Start a walk leg toward an edible flower (or anywhere, if none)
///
/// A bug that has already walked too many legs gives up and shrivels.
fn walk_towards_flower(state: &mut GameState, t: &mut Target) {
    if t.walked_count > state.tuning.target.max_failed_walks {
        t.state = TargetState::Shrivel;
        t.flower_to_eat = None;
        log::debug!("Target {} gave up after {} walks", t.id, t.walked_count);
        return;
    }

    t.flower_to_eat = state.find_edible_flower();
    let dest = match t.flower_to_eat.and_then(|id| state.flower(id)) {
        Some(flower) => flower.body.ground_pos(),
        None => state.pick_valid_spot(),
    };
    let speed = state.tuning.target.walk_speed * walk_speed_factor(state.level);
    t.set_course(dest, speed);
    t.state = TargetState::Walk;
}

/// Start a flight leg to a random valid spot
fn fly_to_location(state: &mut GameState, t: &mut Target) {
    let dest = state.pick_valid_spot();
    t.set_course(dest, state.tuning.target.fly_speed);
    t.state = TargetState::Fly;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::projection::Projection;
    use crate::sim::state::{FlowerState, GameMode};
    use crate::tuning::Tuning;

    fn test_state() -> GameState {
        let mut state = GameState::new(42, Tuning::default());
        state.projection = Projection::new(320.0, 480.0);
        state.mode = GameMode::Playing;
        state
    }

    fn spawn(state: &mut GameState, target_state: TargetState, pos: Vec2) -> usize {
        let id = state.next_entity_id();
        let mut target = Target::new(id, pos, state.tuning.target.max_radius);
        target.state = target_state;
        state.targets.push(target);
        state.targets.len() - 1
    }

    fn bloom_at(state: &mut GameState, pos: Vec2) -> u32 {
        let id = state.create_flower();
        let flower = state.flower_mut(id).unwrap();
        flower.body.pos = pos.extend(0.0);
        flower.state = FlowerState::Bloom;
        id
    }

    #[test]
    fn test_egg_hatch_carries_over() {
        let mut state = test_state();
        let i = spawn(&mut state, TargetState::Egg, Vec2::new(0.0, 1000.0));
        state.targets[i].timer = 1.25;
        update_targets(&mut state, 0.05);
        assert_eq!(state.targets[i].state, TargetState::LookOpen);
        assert!((state.targets[i].timer - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_one_transition_per_tick() {
        let mut state = test_state();
        let i = spawn(&mut state, TargetState::Egg, Vec2::new(0.0, 1000.0));
        state.targets[i].timer = 5.0;
        update_targets(&mut state, 0.0);
        assert_eq!(state.targets[i].state, TargetState::LookOpen);
        assert!((state.targets[i].timer - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_delayed_egg_waits() {
        let mut state = test_state();
        let i = spawn(&mut state, TargetState::Egg, Vec2::new(0.0, 1000.0));
        state.targets[i].timer = -0.5;
        update_targets(&mut state, 1.0);
        assert_eq!(state.targets[i].state, TargetState::Egg);
    }

    #[test]
    fn test_hit_radius_by_state() {
        let mut target = Target::new(1, Vec2::ZERO, 200.0);
        assert_eq!(target.hit_radius(), 0.0);
        target.state = TargetState::Walk;
        assert_eq!(target.hit_radius(), 200.0);
        target.state = TargetState::Pupate;
        assert_eq!(target.hit_radius(), 0.0);
        target.state = TargetState::FlyEscape;
        assert_eq!(target.hit_radius(), 200.0);
    }

    #[test]
    fn test_hole_radius_ramps() {
        let tuning = TargetTuning::default();
        let mut target = Target::new(1, Vec2::ZERO, 200.0);
        target.state = TargetState::LookOpen;
        target.timer = tuning.open_time / 2.0;
        assert!((target.hole_radius(&tuning) - 50.0).abs() < 1e-3);
        target.state = TargetState::Burrow;
        assert_eq!(target.hole_radius(&tuning), tuning.max_hole_radius);
        target.state = TargetState::LookClose;
        target.timer = 0.0;
        assert_eq!(target.hole_radius(&tuning), tuning.max_hole_radius);
        target.state = TargetState::Walk;
        assert_eq!(target.hole_radius(&tuning), 0.0);
    }

    #[test]
    fn test_rise_walks_toward_edible_flower() {
        let mut state = test_state();
        let flower = bloom_at(&mut state, Vec2::new(400.0, 1000.0));
        let i = spawn(&mut state, TargetState::LookRise, Vec2::new(0.0, 1000.0));
        state.targets[i].timer = state.tuning.target.rise_time;
        update_targets(&mut state, 0.0);

        let t = &state.targets[i];
        assert_eq!(t.state, TargetState::Walk);
        assert_eq!(t.flower_to_eat, Some(flower));
        assert!(t.body.vel.x > 0.0);
        assert!(t.body.vel.y.abs() < 1e-3);
        let speed = state.tuning.target.walk_speed * walk_speed_factor(state.level);
        assert!((t.travel_time - 400.0 / speed).abs() < 1e-4);
    }

    #[test]
    fn test_near_zero_leg_arrives_next_tick() {
        let mut state = test_state();
        let pos = Vec2::new(100.0, 900.0);
        bloom_at(&mut state, pos);
        let i = spawn(&mut state, TargetState::LookRise, pos);
        state.targets[i].timer = state.tuning.target.rise_time;
        update_targets(&mut state, 0.0);
        assert_eq!(state.targets[i].travel_time, 0.0);
        assert_eq!(state.targets[i].body.vel, Vec3::ZERO);

        update_targets(&mut state, 0.01);
        assert_eq!(state.targets[i].state, TargetState::Munch);
        assert_eq!(state.targets[i].walked_count, 1);
    }

    #[test]
    fn test_munch_eats_flower() {
        let mut state = test_state();
        let flower = bloom_at(&mut state, Vec2::new(0.0, 800.0));
        let i = spawn(&mut state, TargetState::Munch, Vec2::new(0.0, 800.0));
        state.targets[i].flower_to_eat = Some(flower);
        state.targets[i].timer = munch_time(&state.tuning.target, state.level);
        update_targets(&mut state, 0.0);

        assert_eq!(state.targets[i].state, TargetState::Burrow);
        assert_eq!(state.targets[i].flower_to_eat, None);
        assert!(state.flowers.is_empty());
    }

    #[test]
    fn test_munch_missed_flower_shrivels() {
        let mut state = test_state();
        let flower = bloom_at(&mut state, Vec2::new(0.0, 800.0));
        let i = spawn(&mut state, TargetState::Munch, Vec2::new(0.0, 800.0));
        state.targets[i].flower_to_eat = Some(flower);
        state.flower_mut(flower).unwrap().body.alive = false;
        state.targets[i].timer = munch_time(&state.tuning.target, state.level);
        update_targets(&mut state, 0.0);
        assert_eq!(state.targets[i].state, TargetState::Shrivel);

        // Shrivel then despawn
        let shrivel = state.tuning.target.shrivel_time;
        update_targets(&mut state, shrivel);
        assert!(state.targets.is_empty());
    }

    #[test]
    fn test_gives_up_after_failed_walks() {
        let mut state = test_state();
        let i = spawn(&mut state, TargetState::Walk, Vec2::new(0.0, 800.0));
        state.targets[i].walked_count = state.tuning.target.max_failed_walks;
        state.targets[i].travel_time = 0.5;
        state.targets[i].timer = 0.5;
        update_targets(&mut state, 0.0);
        assert_eq!(state.targets[i].state, TargetState::Shrivel);
    }

    #[test]
    fn test_walk_without_food_rewalks() {
        let mut state = test_state();
        let i = spawn(&mut state, TargetState::Walk, Vec2::new(0.0, 800.0));
        state.targets[i].travel_time = 0.5;
        state.targets[i].timer = 0.5;
        update_targets(&mut state, 0.0);
        let t = &state.targets[i];
        assert_eq!(t.state, TargetState::Walk);
        assert_eq!(t.walked_count, 1);
        assert_eq!(t.flower_to_eat, None);
    }

    #[test]
    fn test_lay_egg_then_escape() {
        let mut state = test_state();
        let pos = Vec2::new(-50.0, 1200.0);
        let i = spawn(&mut state, TargetState::FlyLayEgg, pos);
        state.targets[i].timer = state.tuning.target.lay_egg_time;
        update_targets(&mut state, 0.0);

        assert_eq!(state.targets.len(), 2);
        let egg = &state.targets[1];
        assert_eq!(egg.state, TargetState::Egg);
        assert_eq!(egg.body.ground_pos(), pos);

        // Level 1 lays a single egg, then escapes toward the nearer (left) edge
        let fly = &state.targets[i];
        assert_eq!(fly.eggs_laid, 1);
        assert_eq!(fly.state, TargetState::FlyEscape);
        assert!(fly.body.vel.x < 0.0);

        let fly_id = fly.id;
        for _ in 0..1000 {
            update_targets(&mut state, 0.017);
            if state.target(fly_id).is_none() {
                break;
            }
        }
        assert!(state.target(fly_id).is_none());
    }

    #[test]
    fn test_lays_more_eggs_on_later_levels() {
        let mut state = test_state();
        state.level = 3;
        let i = spawn(&mut state, TargetState::FlyLayEgg, Vec2::new(0.0, 1200.0));
        state.targets[i].timer = state.tuning.target.lay_egg_time;
        update_targets(&mut state, 0.0);
        assert_eq!(state.targets[i].state, TargetState::Fly);
    }

    #[test]
    fn test_dead_fly_lays_nothing() {
        let mut state = test_state();
        let i = spawn(&mut state, TargetState::FlyLayEgg, Vec2::new(0.0, 1200.0));
        state.targets[i].timer = state.tuning.target.lay_egg_time;
        state.targets[i].body.alive = false;
        update_targets(&mut state, 0.01);
        assert!(state.targets.is_empty());
    }

    #[test]
    fn test_dead_muncher_leaves_flower() {
        let mut state = test_state();
        state.add_score(5);
        let flower = bloom_at(&mut state, Vec2::new(0.0, 800.0));
        let i = spawn(&mut state, TargetState::Munch, Vec2::new(0.0, 800.0));
        state.targets[i].flower_to_eat = Some(flower);
        state.targets[i].timer = munch_time(&state.tuning.target, state.level);
        state.targets[i].body.alive = false;
        let j = spawn(&mut state, TargetState::LookClose, Vec2::new(0.0, 900.0));
        state.targets[j].timer = state.tuning.target.close_time;
        state.targets[j].body.alive = false;

        update_targets(&mut state, 0.0);
        assert!(state.targets.is_empty());
        assert!(state.flower(flower).is_some_and(|f| f.body.alive));
        assert_eq!(state.score, 5);
    }

    #[test]
    fn test_close_costs_a_point() {
        let mut state = test_state();
        state.add_score(5);
        let i = spawn(&mut state, TargetState::LookClose, Vec2::new(0.0, 800.0));
        state.targets[i].timer = state.tuning.target.close_time;
        update_targets(&mut state, 0.0);
        assert!(state.targets.is_empty());
        assert_eq!(state.score, 4);
    }
}
