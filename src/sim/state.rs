//! Game state and core simulation types
//!
//! `GameState` is the single simulation context: every subsystem update takes
//! it by `&mut` and nothing else holds simulation data.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::projection::Projection;
use super::spring::Spring;
use crate::consts::*;
use crate::distance;
use crate::tuning::Tuning;

/// Stable entity handle, unique for the lifetime of a `GameState`
pub type EntityId = u32;

/// Shared physical attributes of shots, bugs and flowers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// x/y on the ground plane, z is height above ground
    pub pos: Vec3,
    pub vel: Vec3,
    /// Facing for oriented movement/animation (not normalized velocity)
    pub dir: Vec2,
    pub alive: bool,
}

impl Body {
    pub fn at(pos: Vec3) -> Self {
        Self {
            pos,
            vel: Vec3::ZERO,
            dir: Vec2::ZERO,
            alive: true,
        }
    }

    #[inline]
    pub fn ground_pos(&self) -> Vec2 {
        self.pos.truncate()
    }
}

/// A projectile launched by the spring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub id: EntityId,
    pub body: Body,
    /// Set once the shot has reflected off the near ground edge
    pub bounced: bool,
}

/// Bug life cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetState {
    Egg,

    // Larva
    LookOpen,
    LookPreRise,
    LookRise,
    LookDwellBeforeDrop,
    LookDrop,
    LookClose,

    /// Dying larva animation. Nothing transitions here yet.
    LarvaDie,

    Walk,
    Munch,
    Burrow,
    Shrivel,

    // Pupa + fly
    Pupate,
    FlyRise,
    Fly,
    FlyLayEgg,
    FlyEscape,
}

/// A bug: hatches, hunts flowers, pupates, flies off laying eggs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: EntityId,
    pub body: Body,
    pub state: TargetState,
    /// Seconds in the current state. Negative means "not started yet".
    pub timer: f32,
    pub max_radius: f32,
    /// Duration of the current walk/fly leg
    pub travel_time: f32,
    /// Flower this bug is heading for or eating (walk/munch only)
    pub flower_to_eat: Option<EntityId>,
    /// Walk legs completed so far
    pub walked_count: u32,
    pub eggs_laid: u32,
}

impl Target {
    pub fn new(id: EntityId, pos: Vec2, max_radius: f32) -> Self {
        Self {
            id,
            body: Body::at(pos.extend(0.0)),
            state: TargetState::Egg,
            timer: 0.0,
            max_radius,
            travel_time: 0.0,
            flower_to_eat: None,
            walked_count: 0,
            eggs_laid: 0,
        }
    }
}

/// Flower growth stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowerState {
    Sprout,
    Grow,
    Bud,
    Bloom,
    /// Seeding stage. Bloom never advances here yet.
    Seed,
}

/// A flower the bugs want to eat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flower {
    pub id: EntityId,
    pub body: Body,
    pub state: FlowerState,
    pub timer: f32,
}

impl Flower {
    pub fn new(id: EntityId, pos: Vec2) -> Self {
        Self {
            id,
            body: Body::at(pos.extend(0.0)),
            state: FlowerState::Sprout,
            timer: 0.0,
        }
    }

    /// Alive and in full bloom
    #[inline]
    pub fn is_edible(&self) -> bool {
        self.body.alive && self.state == FlowerState::Bloom
    }
}

/// Top-level game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// No game yet (viewport not set)
    Invalid,
    /// Demo: bugs roam, waiting for a start input
    Attract,
    Playing,
    GameOver,
}

/// End-of-level scoring sequence, with the counters each step needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScorePhase {
    /// Normal play
    None,
    /// "Nice Job!" on screen
    Message,
    /// Awarding per-flower bonuses, `scored` so far
    ScoreFlowers { scored: usize },
    /// Replanting flowers, `next` is the next flower index to move
    MoveFlowers { next: usize },
    /// Adding the next level's eggs
    AddEggs { remaining: u32 },
}

impl ScorePhase {
    /// Index of the flower whose bonus was most recently awarded
    pub fn flower_being_scored(&self) -> Option<usize> {
        match *self {
            ScorePhase::ScoreFlowers { scored } if scored > 0 => Some(scored - 1),
            _ => None,
        }
    }
}

/// Haptic feedback strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HapticTier {
    /// Band stretched past another step
    Tick,
    /// Hit after a ground bounce
    BankShot,
    /// Direct hit
    Hit,
}

impl HapticTier {
    /// Suggested vibration length
    pub fn duration_ms(&self) -> u32 {
        match self {
            HapticTier::Tick => 5,
            HapticTier::BankShot => 20,
            HapticTier::Hit => 30,
        }
    }
}

/// Notifications for collaborators, drained after every frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Status text (empty hides it)
    Message(String),
    ScoreChanged(u32),
    Haptic(HapticTier),
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    pub projection: Projection,
    pub mode: GameMode,
    pub paused: bool,
    /// Seconds since the last mode change (also paces the scoring sequence)
    pub game_timer: f32,
    pub score: u32,
    /// Current level (1-based)
    pub level: u32,
    last_bonus_score: u32,
    pub score_phase: ScorePhase,
    /// Last status text sent
    pub message: String,
    pub spring: Spring,
    pub shots: Vec<Shot>,
    pub targets: Vec<Target>,
    pub flowers: Vec<Flower>,
    /// Pending notifications
    pub events: Vec<GameEvent>,
    /// Set when the wall-clock anchor must be re-armed (reset/resume)
    pub clock_resync: bool,
    next_id: EntityId,
}

impl GameState {
    /// Create an idle state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            projection: Projection::default(),
            mode: GameMode::Invalid,
            paused: false,
            game_timer: 0.0,
            score: 0,
            level: 1,
            last_bonus_score: 0,
            score_phase: ScorePhase::None,
            message: String::new(),
            spring: Spring::new(),
            shots: Vec::new(),
            targets: Vec::new(),
            flowers: Vec::new(),
            events: Vec::new(),
            clock_resync: true,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Uniform sample in [0, 1)
    pub fn random_unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Update the status text
    pub fn set_message(&mut self, text: &str) {
        self.message = text.to_string();
        self.emit(GameEvent::Message(self.message.clone()));
    }

    /// Sample a ground point inside the spawn cone
    ///
    /// Rejection sampling is bounded by `target.spot_attempts`; if every draw
    /// misses, the last one is pulled into the cone.
    pub fn pick_valid_spot(&mut self) -> Vec2 {
        let max_x = self.projection.target_max_x();
        let attempts = self.tuning.target.spot_attempts.max(1);
        let mut last = Vec2::new(0.0, TARGET_MAX_Y);
        for _ in 0..attempts {
            let x = (self.random_unit() * 2.0 - 1.0) * max_x;
            let y = self.random_unit() * (TARGET_MAX_Y - TARGET_MIN_Y) + TARGET_MIN_Y;
            let bound = self.projection.cone_half_width(y);
            if x >= -bound && x <= bound {
                return Vec2::new(x, y);
            }
            last = Vec2::new(x, y);
        }
        log::warn!("Spot sampling exhausted {} attempts, clamping into cone", attempts);
        let bound = self.projection.cone_half_width(last.y);
        Vec2::new(last.x.clamp(-bound, bound), last.y)
    }

    /// Place a new egg away from existing bugs
    ///
    /// Returns `None` when no free spot is found within the retry budget;
    /// callers must treat that as "one fewer egg".
    pub fn create_target(&mut self) -> Option<EntityId> {
        let max_radius = self.tuning.target.max_radius;
        for _ in 0..self.tuning.target.placement_retries {
            let spot = self.pick_valid_spot();
            let crowded = self.targets.iter().any(|t| {
                distance(t.body.pos.x, t.body.pos.y, spot.x, spot.y) < t.max_radius * 2.0
            });
            if !crowded {
                let id = self.next_entity_id();
                self.targets.push(Target::new(id, spot, max_radius));
                return Some(id);
            }
        }
        log::warn!(
            "No room for a new target after {} tries ({} targets alive)",
            self.tuning.target.placement_retries,
            self.targets.len()
        );
        None
    }

    /// Plant a new sprout at a valid spot
    pub fn create_flower(&mut self) -> EntityId {
        let spot = self.pick_valid_spot();
        let id = self.next_entity_id();
        self.flowers.push(Flower::new(id, spot));
        id
    }

    /// Pick a random edible flower, scanning from a random start
    pub fn find_edible_flower(&mut self) -> Option<EntityId> {
        let n = self.flowers.len();
        if n == 0 {
            return None;
        }
        let start = ((self.random_unit() * n as f32) as usize).min(n - 1);
        (0..n)
            .map(|i| &self.flowers[(start + i) % n])
            .find(|f| f.is_edible())
            .map(|f| f.id)
    }

    pub fn flower(&self, id: EntityId) -> Option<&Flower> {
        self.flowers.iter().find(|f| f.id == id)
    }

    pub fn flower_mut(&mut self, id: EntityId) -> Option<&mut Flower> {
        self.flowers.iter_mut().find(|f| f.id == id)
    }

    pub fn target(&self, id: EntityId) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    /// Apply a score change (PLAYING only), floored at zero
    ///
    /// Awards one bonus flower per bonus interval crossed.
    pub fn add_score(&mut self, delta: i32) {
        if self.mode != GameMode::Playing {
            return;
        }

        let total = i64::from(self.score) + i64::from(delta);
        self.score = total.clamp(0, i64::from(u32::MAX)) as u32;

        let interval = self.tuning.scoring.bonus_flower_interval.max(1);
        while let Some(threshold) = self.last_bonus_score.checked_add(interval) {
            if self.score < threshold {
                break;
            }
            self.last_bonus_score = threshold;
            let id = self.create_flower();
            log::debug!("Bonus flower {} awarded at {}", id, threshold);
        }

        self.emit(GameEvent::ScoreChanged(self.score));
    }

    /// Score reset for a new game
    pub fn reset_score(&mut self) {
        self.score = 0;
        self.last_bonus_score = 0;
        self.add_score(0);
    }

    /// Drop dead bugs and flowers
    pub fn prune_targets_and_flowers(&mut self) {
        self.targets.retain(|t| t.body.alive);
        self.flowers.retain(|f| f.body.alive);
    }

    pub fn prune_shots(&mut self) {
        self.shots.retain(|s| s.body.alive);
    }

    /// Drain pending notifications
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
