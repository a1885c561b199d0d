//! Idle/demo mode pilot
//!
//! Steers toward the centre of the next gap by jumping whenever the flyer
//! sinks below it. Good enough to clear a few gates in attract mode.

use super::state::GameState;
use crate::consts::*;

/// How far below the target the flyer may sink before jumping
const SLACK: i32 = 10;
/// Velocity after a jump must have decayed to this before jumping again
const MIN_VEL_FOR_JUMP: i32 = JUMP_VELOCITY / 2;

/// Vertical position the pilot is aiming for (hit-box centre)
pub fn target_y(state: &GameState) -> i32 {
    state
        .gates
        .iter()
        .find(|g| g.right() >= FLYER_X)
        .map_or(WORLD_HEIGHT / 2, |g| g.gap_center())
}

/// Whether the pilot wants to jump this tick
pub fn wants_jump(state: &GameState) -> bool {
    if state.is_game_over() {
        return false;
    }
    let center = state.flyer.y + HITBOX_SIZE / 2;
    center > target_y(state) + SLACK && state.flyer.vel_y > MIN_VEL_FOR_JUMP
}
