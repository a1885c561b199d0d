//! Error types
//!
//! The simulation itself never fails once constructed; errors only come from
//! invalid configuration and from collaborators (storage, settings files, audio).

use std::io;
use std::path::PathBuf;

/// Top-level error for the binary and session setup
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Gate error: {0}")]
    Gate(#[from] GateError),

    #[error("Score store error: {0}")]
    Store(#[from] StoreError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Invalid gate geometry. Gates are never clamped into shape.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("Gate width must be positive, got {0}")]
    NonPositiveWidth(i32),

    #[error("Gap height must be positive, got {0}")]
    NonPositiveGap(i32),

    #[error("Top height must not be negative, got {0}")]
    NegativeTop(i32),

    #[error("Horizontal speed must be positive, got {0}")]
    NonPositiveSpeed(i32),

    #[error("Gap [{top}, {bottom}) leaves no lower obstacle in a world {world_height} high")]
    GapOutOfBounds {
        top: i32,
        bottom: i32,
        world_height: i32,
    },

    #[error("Spawn range is empty: world {world_height} cannot fit gap {gap} plus margin {margin}")]
    EmptySpawnRange {
        world_height: i32,
        gap: i32,
        margin: i32,
    },
}

/// Invalid run or program configuration
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Username must not be empty")]
    EmptyUsername,

    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("Tick rate must be positive")]
    ZeroTickRate,
}

/// Score persistence failures. Never fatal to a running game.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Score file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Score recorder worker is not running")]
    WorkerGone,
}

/// Settings file failures
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Settings file {path} is invalid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Audio output failures. Logged by the audio worker and otherwise ignored.
#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    #[error("Sound asset not found: {0}")]
    MissingAsset(PathBuf),
}
