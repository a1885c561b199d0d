//! Game state and core simulation types
//!
//! The engine exclusively owns everything in here. Renderers only ever see a
//! [`Snapshot`] copied out between ticks.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::flyer::Flyer;
use super::gate::Gate;
use super::spawner::{SpawnConfig, Spawner};
use crate::difficulty::Difficulty;
use crate::error::GateError;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Run ended by a collision; waiting for a restart command
    GameOver,
}

/// Things that happened during a tick or command, drained by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    GateSpawned { id: u32, top_height: i32 },
    Scored { score: u32 },
    /// The flyer hit an obstacle
    Collided,
    /// Emitted exactly once per run, right after `Collided`
    GameOver { score: u32, high_score: u32 },
    Restarted,
}

/// What a renderer needs to draw one gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateView {
    pub x: i32,
    pub top_height: i32,
    pub gap_height: i32,
    pub width: i32,
}

/// Read-only copy of the state between two ticks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub flyer_y: i32,
    pub gates: Vec<GateView>,
    pub score: u32,
    pub high_score: u32,
    pub is_game_over: bool,
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the gate RNG was started from
    pub seed: u64,
    pub phase: GamePhase,
    /// Set together with `GameOver`, cleared together on restart
    pub awaiting_restart: bool,
    pub flyer: Flyer,
    /// Live gates ordered by spawn time; the front is the leading gate
    pub gates: VecDeque<Gate>,
    /// Gates cleared this run
    pub score: u32,
    /// Best score this session; survives restarts
    pub high_score: u32,
    /// Ticks simulated in the current run
    pub time_ticks: u64,
    pub spawner: Spawner,
    /// Pending events (not part of the persisted state)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh run with the given spawn settings and gate seed
    pub fn new(spawn: SpawnConfig, seed: u64) -> Result<Self, GateError> {
        Ok(Self {
            seed,
            phase: GamePhase::Running,
            awaiting_restart: false,
            flyer: Flyer::default(),
            gates: VecDeque::new(),
            score: 0,
            high_score: 0,
            time_ticks: 0,
            spawner: Spawner::new(spawn, seed)?,
            events: Vec::new(),
        })
    }

    /// Standard playfield with gates moving at the difficulty's speed
    pub fn with_difficulty(
        difficulty: Difficulty,
        tick_rate_hz: u32,
        seed: u64,
    ) -> Result<Self, GateError> {
        Self::new(SpawnConfig::new(difficulty.gate_speed(), tick_rate_hz), seed)
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Closest gate to the flyer (oldest still alive)
    pub fn leading_gate(&self) -> Option<&Gate> {
        self.gates.front()
    }

    /// Take all pending events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.time_ticks,
            flyer_y: self.flyer.y,
            gates: self
                .gates
                .iter()
                .map(|g| GateView {
                    x: g.x,
                    top_height: g.top_height,
                    gap_height: g.gap_height,
                    width: g.width,
                })
                .collect(),
            score: self.score,
            high_score: self.high_score,
            is_game_over: self.is_game_over(),
        }
    }
}
