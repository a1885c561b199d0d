//! Timed gate spawner
//!
//! Counts ticks and emits one gate each time the spawn interval elapses. The
//! gap position is drawn from a seeded PCG stream so a run is reproducible
//! from its seed.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::gate::Gate;
use crate::consts::*;
use crate::error::GateError;

/// Gate geometry and timing used by the spawner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnConfig {
    pub world_width: i32,
    pub world_height: i32,
    pub gate_width: i32,
    pub gap_height: i32,
    pub floor_margin: i32,
    pub horizontal_speed: i32,
    /// Ticks between spawns
    pub interval_ticks: u32,
}

impl SpawnConfig {
    /// Standard geometry at the given speed and tick rate
    pub fn new(horizontal_speed: i32, tick_rate_hz: u32) -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            gate_width: GATE_WIDTH,
            gap_height: GAP_HEIGHT,
            floor_margin: FLOOR_MARGIN,
            horizontal_speed,
            interval_ticks: crate::interval_to_ticks(SPAWN_INTERVAL_MS, tick_rate_hz),
        }
    }

    /// Exclusive upper bound for `top_height`, `None` if it does not fit in an i32
    pub fn top_height_bound(&self) -> Option<i32> {
        self.world_height
            .checked_sub(self.gap_height)?
            .checked_sub(self.floor_margin)
    }

    /// Check that every gate this config can produce is valid, returning the
    /// bound to draw `top_height` from
    pub fn validate(&self) -> Result<i32, GateError> {
        let bound = self
            .top_height_bound()
            .filter(|&b| b > 0)
            .ok_or(GateError::EmptySpawnRange {
                world_height: self.world_height,
                gap: self.gap_height,
                margin: self.floor_margin,
            })?;
        // The tallest possible gate must still be constructible
        Gate::new(
            0,
            self.world_width,
            bound - 1,
            self.gap_height,
            self.gate_width,
            self.horizontal_speed,
            self.world_height,
        )?;
        Ok(bound)
    }
}

/// Spawner state carried in the game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    pub config: SpawnConfig,
    /// Ticks since the last spawn (or since the run started)
    pub elapsed_ticks: u32,
    top_bound: i32,
    rng: Pcg32,
    next_id: u32,
}

impl Spawner {
    pub fn new(config: SpawnConfig, seed: u64) -> Result<Self, GateError> {
        let top_bound = config.validate()?;
        Ok(Self {
            config,
            elapsed_ticks: 0,
            top_bound,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        })
    }

    /// Start timing again from zero (used on restart)
    ///
    /// The RNG stream is not rewound, so the next run gets fresh gates.
    pub fn reset_timer(&mut self) {
        self.elapsed_ticks = 0;
    }

    /// Advance the spawn timer by one tick, returning a new gate when it fires
    pub fn tick(&mut self) -> Option<Gate> {
        self.elapsed_ticks += 1;
        if self.elapsed_ticks < self.config.interval_ticks {
            return None;
        }
        self.elapsed_ticks = 0;
        Some(self.spawn())
    }

    /// Build a gate at the right edge with a random gap position
    pub fn spawn(&mut self) -> Gate {
        let top_height = self.rng.random_range(0..self.top_bound);
        let id = self.next_id;
        self.next_id += 1;
        self.build(id, top_height)
    }

    fn build(&self, id: u32, top_height: i32) -> Gate {
        let c = &self.config;
        // In range by construction: `validate` covered the tallest gate
        Gate::new_unchecked(
            id,
            c.world_width,
            top_height,
            c.gap_height,
            c.gate_width,
            c.horizontal_speed,
            c.world_height,
        )
    }
}
