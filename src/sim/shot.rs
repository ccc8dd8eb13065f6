//! Shot flight, hits and landings

use super::spring::Launch;
use super::state::{Body, EntityId, GameEvent, GameState, HapticTier, Shot};
use crate::distance;

impl Shot {
    /// A shot leaving the pocket, lofted in proportion to launch speed
    pub fn from_launch(id: EntityId, launch: &Launch, dz_factor: f32) -> Self {
        let mut body = Body::at(launch.pos.extend(0.0));
        body.vel = launch.vel.extend(launch.speed * dz_factor);
        body.dir = launch.vel.normalize_or_zero();
        Self {
            id,
            body,
            bounced: false,
        }
    }
}

/// Fly every live shot, resolve hits and landings, then prune
pub fn update_shots(state: &mut GameState, dt: f32) {
    let gravity = state.tuning.shot.gravity;
    let hit_reward = state.tuning.shot.hit_reward;
    let land_penalty = state.tuning.shot.land_penalty;

    for i in 0..state.shots.len() {
        if !state.shots[i].body.alive {
            continue;
        }

        let shot = &mut state.shots[i];
        shot.body.pos += shot.body.vel * dt;
        shot.body.vel.z -= gravity * dt;

        // Reflect off the near edge of the field
        if shot.body.pos.y < 0.0 && shot.body.vel.y < 0.0 {
            shot.body.vel.y = -shot.body.vel.y;
            shot.bounced = true;
        }

        let pos = shot.body.pos;
        let bounced = shot.bounced;
        let hit = state.targets.iter().position(|t| {
            let radius = t.hit_radius();
            t.body.alive
                && radius > 0.0
                && distance(t.body.pos.x, t.body.pos.y, pos.x, pos.y) <= radius
        });
        if let Some(j) = hit {
            state.targets[j].body.alive = false;
            state.shots[i].body.alive = false;
            log::debug!("Shot {} hit target {}", state.shots[i].id, state.targets[j].id);
            let tier = if bounced {
                HapticTier::BankShot
            } else {
                HapticTier::Hit
            };
            state.emit(GameEvent::Haptic(tier));
            state.add_score(hit_reward);
        }

        let shot = &mut state.shots[i];
        if shot.body.pos.z < 0.0 && shot.body.alive {
            shot.body.alive = false;
            log::debug!("Shot {} landed at ({:.0}, {:.0})", shot.id, pos.x, pos.y);
            state.add_score(-land_penalty);
        }
    }

    state.prune_shots();
}
