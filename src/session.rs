//! A player's game session
//!
//! `GameSession` is the one value a driver owns: the simulation state for the
//! current run plus handles to the collaborators that hear about it. Commands
//! and ticks go through the session; events coming out of the simulation are
//! forwarded to audio and score storage without waiting on either.

use crate::audio::{AudioTrigger, SoundEffect};
use crate::consts::TICK_RATE_HZ;
use crate::difficulty::Difficulty;
use crate::error::{ConfigError, GameError};
use crate::persistence::ScoreRecorder;
use crate::sim::{self, GameEvent, GameState, Snapshot, SpawnConfig, TickInput};

/// Who is playing and how; fixed for the whole session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub username: String,
    /// `None` plays at the default gate speed
    pub difficulty: Option<Difficulty>,
    pub tick_rate_hz: u32,
    /// Seed for gate placement
    pub seed: u64,
}

impl SessionConfig {
    pub fn new(username: impl Into<String>, difficulty: Option<Difficulty>) -> Result<Self, ConfigError> {
        let config = Self {
            username: username.into(),
            difficulty,
            tick_rate_hz: TICK_RATE_HZ,
            seed: 0,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_tick_rate(mut self, tick_rate_hz: u32) -> Self {
        self.tick_rate_hz = tick_rate_hz;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.trim().is_empty() {
            return Err(ConfigError::EmptyUsername);
        }
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        Ok(())
    }

    /// Horizontal gate speed for this session
    pub fn gate_speed(&self) -> i32 {
        Difficulty::speed_or_default(self.difficulty)
    }
}

/// Fire-and-forget listeners for simulation events
pub struct Collaborators {
    pub audio: AudioTrigger,
    pub scores: ScoreRecorder,
}

impl Collaborators {
    /// No sound, no storage
    pub fn disabled() -> Self {
        Self {
            audio: AudioTrigger::disabled(),
            scores: ScoreRecorder::disabled(),
        }
    }
}

pub struct GameSession {
    config: SessionConfig,
    state: GameState,
    collaborators: Collaborators,
}

impl GameSession {
    pub fn new(config: SessionConfig, collaborators: Collaborators) -> Result<Self, GameError> {
        config.validate()?;
        let spawn = SpawnConfig::new(config.gate_speed(), config.tick_rate_hz);
        let state = GameState::new(spawn, config.seed)?;
        log::info!(
            "Session for {} at {} (gate speed {})",
            config.username,
            config
                .difficulty
                .map_or("default difficulty", |d| d.as_str()),
            config.gate_speed()
        );
        Ok(Self {
            config,
            state,
            collaborators,
        })
    }

    /// Jump command; no effect after game over
    pub fn on_jump(&mut self) -> bool {
        let applied = sim::jump(&mut self.state);
        self.dispatch_events();
        applied
    }

    /// Restart command; only honoured while awaiting a restart
    pub fn on_restart(&mut self) -> bool {
        let restarted = sim::restart(&mut self.state);
        if !restarted {
            log::debug!("Restart ignored: run still in progress");
        }
        self.dispatch_events();
        restarted
    }

    /// Advance one tick with no new input
    pub fn tick(&mut self) -> Vec<GameEvent> {
        self.tick_with(&TickInput::default())
    }

    /// Advance one tick, returning what happened during it
    pub fn tick_with(&mut self, input: &TickInput) -> Vec<GameEvent> {
        sim::tick(&mut self.state, input);
        self.dispatch_events()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn high_score(&self) -> u32 {
        self.state.high_score
    }

    pub fn username(&self) -> &str {
        &self.config.username
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    /// Forward pending events to the collaborators and hand them back
    fn dispatch_events(&mut self) -> Vec<GameEvent> {
        let events = self.state.drain_events();
        for event in &events {
            match *event {
                GameEvent::Jumped => self.collaborators.audio.play(SoundEffect::Flap),
                GameEvent::Collided => self.collaborators.audio.play(SoundEffect::Hit),
                GameEvent::GameOver { score, .. } => {
                    self.collaborators.audio.play(SoundEffect::GameOver);
                    self.collaborators.scores.record(&self.config.username, score);
                }
                GameEvent::Scored { score } => log::debug!("Score: {}", score),
                GameEvent::GateSpawned { .. } | GameEvent::Restarted => {}
            }
        }
        events
    }
}
