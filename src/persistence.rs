//! Background score recorder
//!
//! Owns a [`ScoreStore`] on a worker thread. The game hands it finished runs
//! without waiting; storage failures come back as [`PersistenceEvent`]s the
//! caller may poll, and never stop the game.

use std::io;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

use crate::error::StoreError;
use crate::highscores::{HighScoreEntry, ScoreStore};

type ListReply = Sender<Result<Vec<HighScoreEntry>, StoreError>>;

enum Request {
    Record { username: String, score: u32 },
    List { reply: ListReply },
    Shutdown,
}

/// Outcome of a fire-and-forget record request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceEvent {
    Recorded {
        username: String,
        score: u32,
        /// Position on the board (1-indexed)
        rank: usize,
    },
    Failed {
        username: String,
        score: u32,
        error: String,
    },
}

/// Handle to the score worker
pub struct ScoreRecorder {
    requests: Option<Sender<Request>>,
    events: Receiver<PersistenceEvent>,
    worker: Option<JoinHandle<()>>,
}

impl ScoreRecorder {
    /// Start a worker thread that owns `store`
    pub fn spawn(store: Box<dyn ScoreStore>) -> io::Result<Self> {
        let (req_tx, req_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();
        let worker = thread::Builder::new()
            .name("score-recorder".into())
            .spawn(move || run_worker(store, req_rx, event_tx))?;
        Ok(Self {
            requests: Some(req_tx),
            events: event_rx,
            worker: Some(worker),
        })
    }

    /// A recorder that drops every request (no storage configured)
    pub fn disabled() -> Self {
        let (_event_tx, event_rx) = unbounded();
        Self {
            requests: None,
            events: event_rx,
            worker: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.requests.is_some()
    }

    /// Queue a finished run for storage. Never blocks.
    pub fn record(&self, username: &str, score: u32) {
        let Some(tx) = &self.requests else {
            log::debug!("Score storage disabled, dropping {}={}", username, score);
            return;
        };
        let request = Request::Record {
            username: username.to_string(),
            score,
        };
        if tx.send(request).is_err() {
            log::warn!("Score recorder has stopped; score {} for {} lost", score, username);
        }
    }

    /// Ask the worker for the leaderboard and wait for the answer
    ///
    /// For the results listing only; the game loop never calls this.
    pub fn list_high_scores(&self) -> Result<Vec<HighScoreEntry>, StoreError> {
        let tx = self.requests.as_ref().ok_or(StoreError::WorkerGone)?;
        let (reply_tx, reply_rx) = bounded(1);
        tx.send(Request::List { reply: reply_tx })
            .map_err(|_| StoreError::WorkerGone)?;
        reply_rx.recv().map_err(|_| StoreError::WorkerGone)?
    }

    /// Outcomes of record requests completed since the last poll
    pub fn poll_events(&self) -> Vec<PersistenceEvent> {
        self.events.try_iter().collect()
    }
}

impl Drop for ScoreRecorder {
    fn drop(&mut self) {
        if let Some(tx) = self.requests.take() {
            // Pending records are written before the worker sees this
            let _ = tx.send(Request::Shutdown);
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Score recorder thread panicked");
            }
        }
    }
}

fn run_worker(
    mut store: Box<dyn ScoreStore>,
    requests: Receiver<Request>,
    events: Sender<PersistenceEvent>,
) {
    for request in requests.iter() {
        match request {
            Request::Record { username, score } => {
                let event = match store.record_score(&username, score) {
                    Ok(rank) => {
                        log::info!("Recorded score {} for {} (rank {})", score, username, rank);
                        PersistenceEvent::Recorded {
                            username,
                            score,
                            rank,
                        }
                    }
                    Err(e) => {
                        log::warn!("Failed to record score {} for {}: {}", score, username, e);
                        PersistenceEvent::Failed {
                            username,
                            score,
                            error: e.to_string(),
                        }
                    }
                };
                // Nobody listening is fine
                let _ = events.send(event);
            }
            Request::List { reply } => {
                let _ = reply.send(store.list_high_scores());
            }
            Request::Shutdown => break,
        }
    }
    log::debug!("Score recorder stopped");
}
