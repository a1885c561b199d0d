//! Game settings and preferences
//!
//! Persisted as a small JSON file next to the score board. Missing fields fall
//! back to their defaults so older files keep loading.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::TICK_RATE_HZ;
use crate::difficulty::Difficulty;
use crate::error::{ConfigError, SettingsError};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty used when none is given on the command line
    pub difficulty: Difficulty,
    /// Simulation ticks per second
    pub tick_rate_hz: u32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Directory holding flap.wav / hit.wav / gameover.wav
    pub sound_dir: Option<PathBuf>,

    // === Storage ===
    /// Leaderboard file
    pub scores_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            tick_rate_hz: TICK_RATE_HZ,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            sound_dir: None,

            scores_path: PathBuf::from("flappy_gates_scores.json"),
        }
    }
}

impl Settings {
    /// Settings file name used when no path is given
    pub const DEFAULT_FILE: &'static str = "flappy_gates_settings.json";

    /// Reject values the game cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        Ok(())
    }

    /// Load settings from `path`; a missing file gives the defaults
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match fs::read_to_string(path) {
            Ok(json) => {
                let settings = serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
            Err(source) => Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Save settings to `path`
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved");
        Ok(())
    }
}
