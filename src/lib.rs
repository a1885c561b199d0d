//! Flappy Gates - A side-scrolling gate-flying arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (flyer physics, gates, collisions, game state)
//! - `session`: A single player's session wiring the simulation to its collaborators
//! - `driver`: Fixed-rate scheduling and input command delivery
//! - `audio`: Fire-and-forget sound cue trigger
//! - `highscores` / `persistence`: Score storage and the background recorder
//! - `settings`: Data-driven configuration

pub mod audio;
pub mod difficulty;
pub mod driver;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;

pub use difficulty::Difficulty;
pub use error::{ConfigError, GameError, GateError, StoreError};
pub use highscores::{HighScoreEntry, HighScores, JsonScoreStore, ScoreStore};
pub use session::{Collaborators, GameSession, SessionConfig};
pub use settings::Settings;

/// Game configuration constants
///
/// World units are pixels of the 1000x600 playfield; velocities are
/// world units per tick.
pub mod consts {
    /// Playfield dimensions
    pub const WORLD_WIDTH: i32 = 1000;
    pub const WORLD_HEIGHT: i32 = 600;

    /// Drawn flyer size; the flyer rests on the floor at `WORLD_HEIGHT - FLYER_SIZE`
    pub const FLYER_SIZE: i32 = 50;
    /// Horizontal anchor of the flyer (never moves)
    pub const FLYER_X: i32 = 50;
    /// Side of the square hit-box anchored at (FLYER_X, flyer y)
    pub const HITBOX_SIZE: i32 = 30;
    pub const FLYER_START_Y: i32 = 300;
    pub const FLOOR_Y: i32 = WORLD_HEIGHT - FLYER_SIZE;

    /// Velocity set by a jump (negative is up)
    pub const JUMP_VELOCITY: i32 = -10;
    /// Added to vertical velocity every tick
    pub const GRAVITY: i32 = 1;
    /// Velocity after touching the ceiling
    pub const CEILING_BOUNCE_VELOCITY: i32 = 1;

    /// Gate defaults
    pub const GATE_WIDTH: i32 = 50;
    pub const GAP_HEIGHT: i32 = 200;
    /// Minimum lower obstacle height kept free by the spawner
    pub const FLOOR_MARGIN: i32 = 50;

    /// A gate whose right edge passes this line is scored and retired
    pub const SCORING_LINE_X: i32 = 50;

    /// Wall-clock time between gate spawns
    pub const SPAWN_INTERVAL_MS: u32 = 1000;

    /// Default fixed simulation rate: one tick per millisecond, so the spawn
    /// interval is 1000 ticks
    pub const TICK_RATE_HZ: u32 = 1000;
    /// Maximum substeps per frame to prevent spiral of death (one clamped
    /// frame's worth at the default rate)
    pub const MAX_SUBSTEPS: u32 = 100;
    /// Longest frame the driver will try to catch up on (seconds)
    pub const MAX_FRAME_TIME: f32 = 0.1;
}

/// Convert a wall-clock interval into a whole number of ticks at `tick_rate_hz`
///
/// Rounds up and never returns less than one tick.
#[inline]
pub fn interval_to_ticks(interval_ms: u32, tick_rate_hz: u32) -> u32 {
    let ticks = (u64::from(interval_ms) * u64::from(tick_rate_hz)).div_ceil(1000);
    ticks.clamp(1, u64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_to_ticks() {
        assert_eq!(interval_to_ticks(1000, 60), 60);
        assert_eq!(interval_to_ticks(1000, 1000), 1000);
        // 16.67 ticks rounds up
        assert_eq!(interval_to_ticks(250, 67), 17);
        assert_eq!(interval_to_ticks(0, 60), 1);
    }
}
