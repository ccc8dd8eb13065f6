//! Render records
//!
//! The simulation never draws. Each frame it flattens its entities into a
//! display list of tagged records, sorted back-to-front, for whatever
//! renderer the host supplies.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::level::score_flower_amount;
use super::state::{EntityId, FlowerState, GameState, TargetState};

/// One drawable thing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderItem {
    Spring {
        anchors: [Vec2; 2],
        head: Vec2,
        band_width: f32,
        /// Pocket still holds a shot
        loaded: bool,
    },
    Shot {
        pos: Vec3,
        /// Ground point under the shot
        shadow: Vec2,
    },
    Target {
        id: EntityId,
        pos: Vec3,
        state: TargetState,
        timer: f32,
        dir: Vec2,
        hole_radius: f32,
    },
    Flower {
        id: EntityId,
        pos: Vec2,
        state: FlowerState,
        stem: f32,
        bloom: f32,
    },
    /// Floating bonus amount over the flower being scored
    ScoreLabel { pos: Vec2, amount: i32 },
}

impl RenderItem {
    /// Playfield depth; larger is farther away
    pub fn depth(&self) -> f32 {
        match self {
            RenderItem::Spring { head, anchors, .. } => head.y.min(anchors[0].y),
            RenderItem::Shot { pos, .. } | RenderItem::Target { pos, .. } => pos.y,
            RenderItem::Flower { pos, .. } | RenderItem::ScoreLabel { pos, .. } => pos.y,
        }
    }
}

/// Per-frame display list; the backing storage is reused between frames
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    items: Vec<RenderItem>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refill from the current state, farthest first
    pub fn rebuild(&mut self, state: &GameState) {
        self.items.clear();

        let spring = &state.spring;
        self.items.push(RenderItem::Spring {
            anchors: spring.anchors,
            head: spring.head,
            band_width: spring.band_width(),
            loaded: spring.is_loaded(),
        });

        self.items.extend(
            state
                .shots
                .iter()
                .filter(|s| s.body.alive)
                .map(|s| RenderItem::Shot {
                    pos: s.body.pos,
                    shadow: s.body.ground_pos(),
                }),
        );

        let target_tuning = &state.tuning.target;
        self.items.extend(
            state
                .targets
                .iter()
                .filter(|t| t.body.alive)
                .map(|t| RenderItem::Target {
                    id: t.id,
                    pos: t.body.pos,
                    state: t.state,
                    timer: t.timer,
                    dir: t.body.dir,
                    hole_radius: t.hole_radius(target_tuning),
                }),
        );

        let flower_tuning = &state.tuning.flower;
        self.items.extend(
            state
                .flowers
                .iter()
                .filter(|f| f.body.alive)
                .map(|f| RenderItem::Flower {
                    id: f.id,
                    pos: f.body.ground_pos(),
                    state: f.state,
                    stem: f.stem_factor(flower_tuning),
                    bloom: f.bloom_factor(flower_tuning),
                }),
        );

        if let Some(index) = state.score_phase.flower_being_scored() {
            if let Some(flower) = state.flowers.get(index) {
                self.items.push(RenderItem::ScoreLabel {
                    pos: flower.body.ground_pos(),
                    amount: score_flower_amount(index),
                });
            }
        }

        // Stable sort keeps labels after the flower they float over
        self.items.sort_by(|a, b| b.depth().total_cmp(&a.depth()));
    }

    pub fn items(&self) -> &[RenderItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
