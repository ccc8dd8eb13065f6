//! Game modes, level setup and the end-of-level scoring sequence

use super::state::{Flower, GameMode, GameState, ScorePhase};
use crate::lerp;
use crate::tuning::TargetTuning;

const PAUSE_MESSAGE: &str = "Paused -- Touch Screen To Resume";

/// Walk speed multiplier, indexed directly by level (level 1 gets 0.75)
const WALK_SPEED_FACTORS: [f32; 4] = [0.50, 0.75, 0.90, 1.00];

/// Eggs a fly lays before escaping
pub fn max_eggs_to_lay(level: u32) -> u32 {
    match level {
        0..=2 => 1,
        3..=4 => 2,
        _ => (2 + (level - 4) / 2).min(5),
    }
}

/// Eggs added at the end of a level
pub fn eggs_to_add(level: u32) -> u32 {
    match level {
        0..=2 => 4,
        3..=4 => 5,
        _ => 6 + (level - 5),
    }
}

/// Bonus for the `index`th surviving flower
pub fn score_flower_amount(index: usize) -> i32 {
    match index {
        0 => 25,
        1 => 50,
        2 => 100,
        _ => 200,
    }
}

pub fn walk_speed_factor(level: u32) -> f32 {
    let i = (level as usize).min(WALK_SPEED_FACTORS.len() - 1);
    WALK_SPEED_FACTORS[i]
}

/// Munching is slower when walking is slower
pub fn munch_time(tuning: &TargetTuning, level: u32) -> f32 {
    tuning.munch_time / walk_speed_factor(level)
}

/// Pause between chomps (presentation)
pub fn munch_pause_time(level: u32) -> f32 {
    match level {
        0..=4 => 0.75,
        5..=8 => 0.50,
        _ => 0.25,
    }
}

/// Switch the top-level mode
pub fn set_mode(state: &mut GameState, mode: GameMode) {
    let previous = state.mode;
    state.mode = mode;
    state.game_timer = 0.0;
    unpause(state);

    match mode {
        GameMode::Invalid => {}
        GameMode::Attract => {
            if previous == GameMode::Invalid {
                reset(state);
            }
            state.set_message("Touch Screen To Start");
        }
        GameMode::Playing => {
            reset(state);
            state.set_message("");
        }
        GameMode::GameOver => {
            state.set_message("Game Over");
            let tuning = state.tuning.spring.clone();
            state.spring.release(&tuning);
        }
    }
    log::info!("Mode {:?} -> {:?}", previous, mode);
}

/// Start a fresh game at level 1
pub fn reset(state: &mut GameState) {
    state.reset_score();
    state.level = 1;
    state.score_phase = ScorePhase::None;
    state.shots.clear();
    init_level(state);
    state.spring.reset();
    state.clock_resync = true;
}

/// Populate the field with staggered eggs and sprouts
pub fn init_level(state: &mut GameState) {
    let predelay = state.tuning.target.egg_predelay;
    state.targets.clear();
    for _ in 0..state.tuning.scoring.initial_targets {
        if let Some(id) = state.create_target() {
            let t = state.random_unit();
            if let Some(target) = state.targets.iter_mut().find(|x| x.id == id) {
                target.timer = lerp(t, -2.0 * predelay, -predelay);
            }
        }
    }

    let sprout = state.tuning.flower.sprout_time;
    state.flowers.clear();
    while state.flowers.len() < state.tuning.scoring.initial_flowers as usize {
        let id = state.create_flower();
        let t = state.random_unit();
        if let Some(flower) = state.flower_mut(id) {
            flower.timer = lerp(t, -1.0, sprout);
        }
    }
    log::info!(
        "Level {} started with {} targets, {} flowers",
        state.level,
        state.targets.len(),
        state.flowers.len()
    );
}

pub fn pause(state: &mut GameState) {
    state.paused = true;
    state.set_message(PAUSE_MESSAGE);
}

pub fn unpause(state: &mut GameState) {
    state.clock_resync = true;
    state.set_message("");
    state.paused = false;
}

/// Handle a "start" input outside of play; returns true if a game started
pub fn start_game_input(state: &mut GameState) -> bool {
    let ready = match state.mode {
        GameMode::Attract => true,
        GameMode::GameOver => state.game_timer > state.tuning.scoring.restart_dwell,
        _ => false,
    };
    if ready {
        set_mode(state, GameMode::Playing);
    }
    ready
}

/// Mode checks and the scoring sequence, once per sub-tick
pub fn update_game(state: &mut GameState, _dt: f32) {
    if state.mode == GameMode::Playing {
        if state.flowers.is_empty() {
            log::info!("Game over at level {} with score {}", state.level, state.score);
            set_mode(state, GameMode::GameOver);
            return;
        }
        if state.targets.is_empty() && state.score_phase == ScorePhase::None {
            log::info!("Level {} cleared", state.level);
            state.score_phase = ScorePhase::Message;
            state.game_timer = 0.0;
            state.set_message("Nice Job!");
        }
        update_score_phase(state);
    } else if state.mode == GameMode::Attract && state.targets.is_empty() {
        // The attract screen stops ticking once nothing is left moving
        pause(state);
    }

    if state.mode == GameMode::GameOver && state.game_timer > state.tuning.scoring.game_over_time {
        set_mode(state, GameMode::Attract);
    }
}

/// Advance the scoring sequence by at most one step
fn update_score_phase(state: &mut GameState) {
    let scoring = state.tuning.scoring.clone();
    match state.score_phase {
        ScorePhase::None => {}
        ScorePhase::Message => {
            if crate::timer_check(&mut state.game_timer, scoring.message_time) {
                state.set_message("");
                state.score_phase = ScorePhase::ScoreFlowers { scored: 0 };
            }
        }
        ScorePhase::ScoreFlowers { scored } => {
            if crate::timer_check(&mut state.game_timer, scoring.score_flower_interval) {
                if scored < state.flowers.len() {
                    state.add_score(score_flower_amount(scored));
                    state.score_phase = ScorePhase::ScoreFlowers { scored: scored + 1 };
                } else {
                    state.game_timer = 0.0;
                    state.score_phase = ScorePhase::MoveFlowers { next: 0 };
                }
            }
        }
        ScorePhase::MoveFlowers { next } => {
            if crate::timer_check(&mut state.game_timer, scoring.move_flower_interval) {
                if next < state.flowers.len() {
                    let spot = state.pick_valid_spot();
                    let id = state.next_entity_id();
                    state.flowers[next] = Flower::new(id, spot);
                    state.score_phase = ScorePhase::MoveFlowers { next: next + 1 };
                } else {
                    state.score_phase = ScorePhase::AddEggs {
                        remaining: eggs_to_add(state.level),
                    };
                }
            }
        }
        ScorePhase::AddEggs { remaining } => {
            if crate::timer_check(&mut state.game_timer, scoring.add_egg_interval) {
                if remaining > 0 {
                    let predelay = state.tuning.target.egg_predelay;
                    if let Some(id) = state.create_target() {
                        if let Some(target) = state.targets.iter_mut().find(|t| t.id == id) {
                            // Give the new flowers time to bloom first
                            target.timer -= predelay;
                        }
                    }
                    state.score_phase = ScorePhase::AddEggs {
                        remaining: remaining - 1,
                    };
                } else {
                    state.level += 1;
                    state.score_phase = ScorePhase::None;
                    log::info!("Advancing to level {}", state.level);
                }
            }
        }
    }
}
