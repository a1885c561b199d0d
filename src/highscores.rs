//! High score leaderboard and score storage
//!
//! Every finished run is kept. Entries are sorted by score, highest first;
//! equal scores keep the order they were recorded in.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub username: String,
    pub score: u32,
    /// Unix timestamp (seconds) when recorded
    #[serde(default)]
    pub timestamp: u64,
}

/// Storage for finished runs
///
/// Values are passed as data, never spliced into a query. Implementations may
/// block; the game only reaches them through the background recorder.
pub trait ScoreStore: Send {
    /// Record the final score of one run, returning its rank (1-indexed)
    fn record_score(&mut self, username: &str, score: u32) -> Result<usize, StoreError>;

    /// All stored scores, highest first
    fn list_high_scores(&self) -> Result<Vec<HighScoreEntry>, StoreError>;
}

/// Every recorded run, highest score first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert a run after every entry with an equal or higher score
    ///
    /// Returns the rank it landed at (1-indexed). No run is ever dropped.
    pub fn insert(&mut self, entry: HighScoreEntry) -> usize {
        let pos = self.entries.partition_point(|e| e.score >= entry.score);
        self.entries.insert(pos, entry);
        pos + 1
    }
}

impl ScoreStore for HighScores {
    fn record_score(&mut self, username: &str, score: u32) -> Result<usize, StoreError> {
        Ok(self.insert(HighScoreEntry {
            username: username.to_string(),
            score,
            timestamp: now_unix_s(),
        }))
    }

    fn list_high_scores(&self) -> Result<Vec<HighScoreEntry>, StoreError> {
        Ok(self.entries.clone())
    }
}

/// Leaderboard persisted as a JSON file
///
/// Writes go to a sibling temp file that is then renamed over the target, so
/// a crash mid-write leaves the previous board intact.
#[derive(Debug)]
pub struct JsonScoreStore {
    path: PathBuf,
    scores: HighScores,
}

impl JsonScoreStore {
    /// Open the board at `path`; a missing file is an empty board
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mut scores = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str::<HighScores>(&json).map_err(|source| {
                StoreError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high scores at {}, starting fresh", path.display());
                HighScores::new()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        // Hand-edited files may be out of order; the sort is stable so ties keep theirs
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(Self { path, scores })
    }

    fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.scores)?;
        let tmp = self.path.with_extension("json.tmp");
        let io_err = |source: std::io::Error| StoreError::Io {
            path: tmp.clone(),
            source,
        };

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let mut file = fs::File::create(&tmp).map_err(io_err)?;
        file.write_all(json.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::info!("High scores saved ({} entries)", self.scores.entries.len());
        Ok(())
    }
}

impl ScoreStore for JsonScoreStore {
    fn record_score(&mut self, username: &str, score: u32) -> Result<usize, StoreError> {
        let rank = self.scores.record_score(username, score)?;
        self.save()?;
        Ok(rank)
    }

    fn list_high_scores(&self) -> Result<Vec<HighScoreEntry>, StoreError> {
        self.scores.list_high_scores()
    }
}

/// Seconds since the Unix epoch (0 if the clock is before it)
pub fn now_unix_s() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
