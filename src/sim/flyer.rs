//! The player-controlled flyer
//!
//! Integer physics: position and velocity change by whole world units per tick.

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flyer {
    /// Top edge, in [0, FLOOR_Y]
    pub y: i32,
    /// Positive is downward
    pub vel_y: i32,
}

impl Default for Flyer {
    fn default() -> Self {
        Self {
            y: FLYER_START_Y,
            vel_y: 0,
        }
    }
}

impl Flyer {
    /// Jump: replace the current velocity with the upward jump velocity
    ///
    /// Repeated jumps simply reset the velocity again.
    pub fn apply_impulse(&mut self) {
        self.vel_y = JUMP_VELOCITY;
    }

    /// Advance one tick: integrate, apply gravity, then clamp to the playfield
    pub fn tick(&mut self) {
        self.y += self.vel_y;
        self.vel_y += GRAVITY;

        if self.y >= FLOOR_Y {
            self.y = FLOOR_Y;
            self.vel_y = 0;
        }
        // The ceiling pushes back gently instead of stopping dead
        if self.y < 0 {
            self.y = 0;
            self.vel_y = CEILING_BOUNCE_VELOCITY;
        }
    }

    /// Collision box anchored at the flyer's fixed horizontal position
    pub fn hitbox(&self) -> Rect {
        Rect::new(FLYER_X, self.y, HITBOX_SIZE, HITBOX_SIZE)
    }
}
