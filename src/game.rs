//! Game façade
//!
//! Owns the simulation state and is the only way in from the host: wall-clock
//! time, abstract input, viewport and mode control, read-only snapshots.
//! Pending notifications are delivered to the `Notifier` after every call.

use glam::Vec2;

use crate::platform::{Key, Notifier, PointerPhase};
use crate::sim::{
    DisplayList, Flower, GameEvent, GameMode, GameState, Projection, Shot, Target, level, substeps,
    tick,
};
use crate::tuning::Tuning;

/// Game instance holding all state
pub struct Game {
    state: GameState,
    /// Wall-clock anchor in seconds; may be in the future after a resync
    last_time: Option<f64>,
    notifier: Box<dyn Notifier + Send>,
    display: DisplayList,
}

impl Game {
    pub fn new(seed: u64, tuning: Tuning, notifier: Box<dyn Notifier + Send>) -> Self {
        log::info!("Flingers initialized with seed: {}", seed);
        Self {
            state: GameState::new(seed, tuning),
            last_time: None,
            notifier,
            display: DisplayList::new(),
        }
    }

    /// Run the simulation up to wall-clock time `now` (seconds)
    ///
    /// Calls with a timestamp not after the previous one do nothing.
    pub fn advance(&mut self, now: f64) {
        self.step_to(now);
        self.dispatch_events();
    }

    fn step_to(&mut self, now: f64) {
        if self.state.mode == GameMode::Invalid {
            if !self.state.projection.is_playable() {
                return;
            }
            level::set_mode(&mut self.state, GameMode::Attract);
        }
        if self.state.paused {
            return;
        }

        if self.state.clock_resync {
            // Hold the simulation briefly after a reset or resume
            self.state.clock_resync = false;
            self.last_time = Some(now + self.state.tuning.clock.resume_delay);
            return;
        }

        let Some(last) = self.last_time else {
            self.last_time = Some(now);
            return;
        };
        if now <= last {
            return;
        }
        self.last_time = Some(now);

        let max_frame = self.state.tuning.clock.max_frame;
        let max_substep = self.state.tuning.clock.max_substep;
        let elapsed = ((now - last) as f32).clamp(0.0, max_frame);
        for dt in substeps(elapsed, max_substep) {
            tick(&mut self.state, dt);
            if self.state.paused {
                break;
            }
        }
    }

    // --- Input ---

    /// Apply one pointer event; returns whether the game used it
    pub fn pointer(&mut self, phase: PointerPhase, point: Vec2) -> bool {
        let handled = self.apply_pointer(phase, point);
        self.dispatch_events();
        handled
    }

    pub fn pointer_down(&mut self, point: Vec2) -> bool {
        self.pointer(PointerPhase::Down, point)
    }

    pub fn pointer_move(&mut self, point: Vec2) -> bool {
        self.pointer(PointerPhase::Move, point)
    }

    pub fn pointer_up(&mut self, point: Vec2) -> bool {
        self.pointer(PointerPhase::Up, point)
    }

    fn apply_pointer(&mut self, phase: PointerPhase, point: Vec2) -> bool {
        let state = &mut self.state;
        if state.mode != GameMode::Playing {
            return phase == PointerPhase::Down && level::start_game_input(state);
        }
        if state.paused {
            level::unpause(state);
            return true;
        }

        let spring = &mut state.spring;
        let projection = &state.projection;
        let tuning = &state.tuning.spring;
        match phase {
            PointerPhase::Down => {
                spring.hold(point, projection, tuning);
                spring.move_to(point, projection, tuning);
            }
            PointerPhase::Move => spring.move_to(point, projection, tuning),
            PointerPhase::Up | PointerPhase::Cancel => {
                spring.move_to(point, projection, tuning);
                spring.release(tuning);
            }
        }
        true
    }

    /// Apply a key press; returns whether the game used it
    pub fn key(&mut self, key: Key) -> bool {
        let handled = if !key.is_start() {
            false
        } else if self.state.mode == GameMode::Playing {
            let resumed = self.state.paused;
            if resumed {
                level::unpause(&mut self.state);
            }
            resumed
        } else {
            level::start_game_input(&mut self.state)
        };
        self.dispatch_events();
        handled
    }

    // --- Control ---

    /// Resize the viewport; re-derives the projection and recenters the spring
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.state.projection = Projection::new(width, height);
        self.state.spring.reset();
        log::info!(
            "Viewport {}x{} (spawn half-width {:.0})",
            width,
            height,
            self.state.projection.target_max_x()
        );
    }

    pub fn pause(&mut self) {
        level::pause(&mut self.state);
        self.dispatch_events();
    }

    pub fn resume(&mut self) {
        level::unpause(&mut self.state);
        self.dispatch_events();
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        level::set_mode(&mut self.state, mode);
        self.dispatch_events();
    }

    // --- Snapshots ---

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn message(&self) -> &str {
        &self.state.message
    }

    pub fn mode(&self) -> GameMode {
        self.state.mode
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn targets(&self) -> &[Target] {
        &self.state.targets
    }

    pub fn flowers(&self) -> &[Flower] {
        &self.state.flowers
    }

    pub fn shots(&self) -> &[Shot] {
        &self.state.shots
    }

    /// Read-only view of the whole simulation
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Render records for the current state, farthest first
    pub fn display_list(&mut self) -> &DisplayList {
        self.display.rebuild(&self.state);
        &self.display
    }

    fn dispatch_events(&mut self) {
        for event in self.state.take_events() {
            match event {
                GameEvent::Message(text) => self.notifier.on_message(&text),
                GameEvent::ScoreChanged(score) => self.notifier.on_score_changed(score),
                GameEvent::Haptic(tier) => self.notifier.on_haptic_pulse(tier),
            }
        }
    }
}
