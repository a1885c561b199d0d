//! End-to-end runs through `GameSession` with recording collaborators

use std::sync::{Arc, Mutex};

use flappy_gates::audio::{AudioSink, AudioTrigger, SoundEffect};
use flappy_gates::consts::*;
use flappy_gates::error::AudioError;
use flappy_gates::persistence::ScoreRecorder;
use flappy_gates::sim::{GameEvent, GameState, Gate, TickInput, tick};
use flappy_gates::{Collaborators, Difficulty, GameSession, HighScores, SessionConfig};

#[derive(Clone, Default)]
struct RecordingSink(Arc<Mutex<Vec<SoundEffect>>>);

impl AudioSink for RecordingSink {
    fn play(&mut self, effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
        self.0.lock().unwrap().push(effect);
        Ok(())
    }
}

fn recording_session(difficulty: Difficulty, seed: u64) -> (GameSession, RecordingSink) {
    let sink = RecordingSink::default();
    let collaborators = Collaborators {
        audio: AudioTrigger::spawn(Box::new(sink.clone())).unwrap(),
        scores: ScoreRecorder::spawn(Box::new(HighScores::new())).unwrap(),
    };
    let config = SessionConfig::new("ann", Some(difficulty))
        .unwrap()
        .with_seed(seed);
    (GameSession::new(config, collaborators).unwrap(), sink)
}

/// Tick with no input until the run ends (the flyer sinks to the floor and
/// the first gate's lower obstacle always reaches it)
fn crash(session: &mut GameSession) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..5000 {
        events.extend(session.tick());
        if session.is_game_over() {
            return events;
        }
    }
    panic!("run never ended");
}

#[test]
fn easy_jumps_stay_in_bounds_before_first_gate() {
    let config = SessionConfig::new("ann", Some(Difficulty::Easy)).unwrap();
    let mut session = GameSession::new(config, Collaborators::disabled()).unwrap();
    assert_eq!(session.snapshot().flyer_y, 300);

    let interval = u64::from(SPAWN_INTERVAL_MS);
    for t in 0..interval {
        if t < 30 && t % 10 == 0 {
            assert!(session.on_jump());
        }
        let events = session.tick();
        let snap = session.snapshot();
        if t < 30 {
            assert!(snap.flyer_y > 0 && snap.flyer_y < FLOOR_Y, "tick {t}: y={}", snap.flyer_y);
        }
        if t + 1 < interval {
            assert!(snap.gates.is_empty(), "gate before the spawn interval at tick {t}");
        }
        assert!(!events.contains(&GameEvent::Collided), "collision at tick {t}");
        assert_eq!(snap.score, 0);
        assert!(!snap.is_game_over);
    }

    // The first gate appears on the last tick of the interval, at the right edge
    let snap = session.snapshot();
    assert_eq!(snap.tick, interval);
    assert_eq!(snap.gates.len(), 1);
    assert_eq!(snap.gates[0].x, WORLD_WIDTH);
}

#[test]
fn flyer_inside_gap_passes_through_gate() {
    let gate = Gate::new(1, 60, 100, 200, GATE_WIDTH, 5, 600).unwrap();
    assert_eq!(gate.lower_height(), 300);

    let mut state = GameState::with_difficulty(Difficulty::Easy, TICK_RATE_HZ, 1).unwrap();
    state.gates.push_back(gate);
    state.flyer.y = 150;
    state.flyer.vel_y = 0;
    tick(&mut state, &TickInput::default());

    // Gate now spans x 55..105, overlapping the hit-box's 50..80
    assert_eq!(state.gates[0].x, 55);
    assert_eq!(state.flyer.y, 150);
    assert!(!state.is_game_over());
}

#[test]
fn game_over_records_score_exactly_once() {
    let (mut session, sink) = recording_session(Difficulty::Easy, 77);
    let events = crash(&mut session);
    assert_eq!(events.last(), Some(&GameEvent::GameOver { score: 0, high_score: 0 }));

    // Keep ticking and jumping after game over: nothing more happens
    let frozen = session.snapshot();
    for _ in 0..100 {
        assert!(!session.on_jump());
        assert!(session.tick().is_empty());
    }
    assert_eq!(session.snapshot(), frozen);

    let scores = session.collaborators().scores.list_high_scores().unwrap();
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].username, "ann");
    assert_eq!(scores[0].score, 0);

    drop(session);
    let played = sink.0.lock().unwrap().clone();
    assert_eq!(played, vec![SoundEffect::Hit, SoundEffect::GameOver]);
}

#[test]
fn restart_only_after_game_over() {
    let (mut session, _sink) = recording_session(Difficulty::Medium, 5);
    assert!(!session.on_restart());

    crash(&mut session);
    assert!(session.is_game_over());
    assert!(session.state().awaiting_restart);

    assert!(session.on_restart());
    let snap = session.snapshot();
    assert!(!snap.is_game_over);
    assert_eq!(snap.score, 0);
    assert!(snap.gates.is_empty());
    assert_eq!(snap.flyer_y, FLYER_START_Y);
    assert!(!session.state().awaiting_restart);

    // A second restart is ignored while running
    assert!(!session.on_restart());

    // The new run records its own score
    crash(&mut session);
    let scores = session.collaborators().scores.list_high_scores().unwrap();
    assert_eq!(scores.len(), 2);
}

#[test]
fn high_score_survives_restarts() {
    let config = SessionConfig::new("pilot", Some(Difficulty::Easy))
        .unwrap()
        .with_seed(2024);
    let mut session = GameSession::new(config, Collaborators::disabled()).unwrap();
    let autopilot = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let idle = TickInput::default();

    // Run n lets the pilot clear n gates, then lets go so the next gate ends it
    let mut last_high = 0;
    let mut runs = 0;
    for _ in 0..30_000 {
        let input = if session.score() < runs + 1 {
            &autopilot
        } else {
            &idle
        };
        session.tick_with(input);
        assert!(session.high_score() >= last_high);
        assert!(session.high_score() >= session.score());
        last_high = session.high_score();
        if session.is_game_over() {
            runs += 1;
            assert_eq!(session.score(), runs);
            if runs == 3 {
                break;
            }
            assert!(session.on_restart());
            assert_eq!(session.score(), 0);
            assert_eq!(session.high_score(), last_high);
        }
    }
    assert_eq!(runs, 3);
    assert_eq!(session.high_score(), 3);
}

#[test]
fn score_event_per_cleared_gate() {
    let config = SessionConfig::new("pilot", Some(Difficulty::Hard))
        .unwrap()
        .with_seed(11);
    let mut session = GameSession::new(config, Collaborators::disabled()).unwrap();
    let autopilot = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let mut scored = 0;
    for _ in 0..5_000 {
        for event in session.tick_with(&autopilot) {
            if let GameEvent::Scored { score } = event {
                scored += 1;
                assert_eq!(score, scored);
            }
        }
        if session.is_game_over() {
            break;
        }
    }
    assert!(scored > 0, "the pilot never cleared a gate");
    assert_eq!(session.score(), scored);
}
