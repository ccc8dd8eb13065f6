//! Playfield ↔ screen projection
//!
//! The playfield is a ground plane: `x` runs left/right across the screen,
//! `y` is depth away from the player, `z` is height above ground. Depth is
//! foreshortened with a simple `ZSCALE / (y + ZOFFSET)` perspective scale.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::make_lerper;

/// A projected point: screen position plus the perspective scale at that depth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    /// Screen pixels per playfield unit at this depth
    pub scale: f32,
}

impl ScreenPoint {
    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Viewport-dependent projection and the spawn cone derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    width: f32,
    height: f32,
    /// Half-width of the spawn cone at its far edge
    target_max_x: f32,
    /// Screen y of the shallowest allowed touch
    touch_height: f32,
    /// Screen y of the horizon
    horizon_height: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl Projection {
    pub fn new(width: f32, height: f32) -> Self {
        let mut projection = Self {
            width: width.max(1.0),
            height: height.max(1.0),
            target_max_x: 0.0,
            touch_height: 0.0,
            horizon_height: 0.0,
        };

        let anchor = Vec3::new(-ANCHOR_WIDTH / 2.0, ANCHOR_HEIGHT + TOUCH_DEPTH_MARGIN, 0.0);
        projection.touch_height = projection.project(anchor).y;
        projection.horizon_height = projection.project(Vec3::new(0.0, HORIZON_Y, 0.0)).y;

        // Half-width of the playfield seen at the left screen edge, far depth
        let far_screen_y = projection.project(Vec3::new(0.0, TARGET_MAX_Y, 0.0)).y;
        projection.target_max_x = projection
            .unproject(Vec2::new(0.0, far_screen_y))
            .map(|p| p.x.abs())
            .unwrap_or(0.0);

        projection
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn target_max_x(&self) -> f32 {
        self.target_max_x
    }

    #[inline]
    pub fn touch_height(&self) -> f32 {
        self.touch_height
    }

    #[inline]
    pub fn horizon_height(&self) -> f32 {
        self.horizon_height
    }

    /// True once the viewport is large enough to place creatures
    pub fn is_playable(&self) -> bool {
        self.target_max_x > MIN_PLAYABLE_HALF_WIDTH
    }

    /// Playfield (x, y, z) to screen
    pub fn project(&self, p: Vec3) -> ScreenPoint {
        let scale = ZSCALE / (p.y + ZOFFSET);
        let h = self.height + YOFFSET;
        ScreenPoint {
            x: p.x * scale + self.width / 2.0,
            y: (h - p.y * scale * YSCALE) - p.z * scale,
            scale,
        }
    }

    /// Screen point to playfield ground plane (z = 0)
    ///
    /// Returns `None` at or above the horizon, where depth is undefined.
    pub fn unproject(&self, screen: Vec2) -> Option<Vec2> {
        let h = self.height + YOFFSET;
        let denom = YSCALE * ZSCALE + screen.y - h;
        if denom <= UNPROJECT_MIN_DENOM {
            return None;
        }
        let y = ZOFFSET * (h - screen.y) / denom;
        let one_over_scale = (y + ZOFFSET) / ZSCALE;
        let x = (screen.x - self.width / 2.0) * one_over_scale;
        Some(Vec2::new(x, y))
    }

    /// Spawn cone half-width at depth `y`
    pub fn cone_half_width(&self, y: f32) -> f32 {
        make_lerper(y, TARGET_MIN_CONE_Y, TARGET_MAX_Y) * self.target_max_x
    }

    /// Whether a ground point lies in the spawn cone
    pub fn in_spawn_cone(&self, p: Vec2) -> bool {
        if !(TARGET_MIN_Y..=TARGET_MAX_Y).contains(&p.y) {
            return false;
        }
        let bound = self.cone_half_width(p.y);
        p.x >= -bound && p.x <= bound
    }

    /// Whether an escaping fly at `p` has fully left the screen sideways
    pub fn is_past_side_edge(&self, p: Vec3) -> bool {
        let c = self.project(p);
        let half = self.width / 2.0;
        (c.x - half).abs() > half + ESCAPE_BODY_MARGIN * c.scale + ESCAPE_MARGIN
    }
}
