//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically. Within one
//! tick the order is fixed: flyer physics, gate movement and retirement,
//! scoring, collision, then the spawn timer. Scoring runs before collision so a
//! gate cleared on the same tick as a crash still counts.

use super::autopilot;
use super::flyer::Flyer;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (space/click)
    pub jump: bool,
    /// Restart after game over
    pub restart: bool,
    /// Idle/demo mode - the autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
///
/// Commands in `input` are applied first, as if they arrived between the
/// previous tick and this one.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.restart {
        restart(state);
    }

    // Nothing moves once the run is over
    if state.phase == GamePhase::GameOver {
        return;
    }

    if input.jump || (input.idle_mode && autopilot::wants_jump(state)) {
        jump(state);
    }

    state.time_ticks += 1;

    state.flyer.tick();

    for gate in state.gates.iter_mut() {
        gate.advance();
    }
    let before = state.gates.len();
    state.gates.retain(|g| !g.is_off_screen());
    let retired = before - state.gates.len();
    if retired > 0 {
        log::debug!("Retired {} gate(s) off the left edge", retired);
    }

    // One gate pair per tick at most; the pair leaves the field as it scores
    if state
        .leading_gate()
        .is_some_and(|g| g.right() < SCORING_LINE_X)
    {
        state.gates.pop_front();
        state.score += 1;
        state.high_score = state.high_score.max(state.score);
        state.events.push(GameEvent::Scored { score: state.score });
    }

    let hitbox = state.flyer.hitbox();
    if state.gates.iter().any(|g| g.hits(&hitbox)) {
        state.phase = GamePhase::GameOver;
        state.awaiting_restart = true;
        state.events.push(GameEvent::Collided);
        state.events.push(GameEvent::GameOver {
            score: state.score,
            high_score: state.high_score,
        });
        log::info!(
            "Game over at tick {}: score={}, high score={}",
            state.time_ticks,
            state.score,
            state.high_score
        );
        return;
    }

    if let Some(gate) = state.spawner.tick() {
        log::debug!("Spawned gate {} (top={})", gate.id, gate.top_height);
        state.events.push(GameEvent::GateSpawned {
            id: gate.id,
            top_height: gate.top_height,
        });
        state.gates.push_back(gate);
    }
}

/// Jump command. Ignored after game over; returns whether it was applied.
pub fn jump(state: &mut GameState) -> bool {
    if state.phase == GamePhase::GameOver {
        return false;
    }
    state.flyer.apply_impulse();
    state.events.push(GameEvent::Jumped);
    true
}

/// Restart command. Only honoured while awaiting a restart; returns whether a
/// new run started. The session high score is kept.
pub fn restart(state: &mut GameState) -> bool {
    if !state.awaiting_restart {
        return false;
    }
    state.flyer = Flyer::default();
    state.gates.clear();
    state.score = 0;
    state.time_ticks = 0;
    state.spawner.reset_timer();
    state.phase = GamePhase::Running;
    state.awaiting_restart = false;
    state.events.push(GameEvent::Restarted);
    log::info!("Run restarted (high score {})", state.high_score);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Difficulty;
    use crate::sim::gate::Gate;
    use proptest::prelude::*;

    fn new_state(difficulty: Difficulty) -> GameState {
        GameState::with_difficulty(difficulty, TICK_RATE_HZ, 12345).unwrap()
    }

    fn gate_at(id: u32, x: i32, top: i32, speed: i32) -> Gate {
        Gate::new(id, x, top, GAP_HEIGHT, GATE_WIDTH, speed, WORLD_HEIGHT).unwrap()
    }

    /// Keep the flyer hovering inside a gap spanning y 100..300
    fn hover(state: &mut GameState) {
        state.flyer.y = 150;
        state.flyer.vel_y = 0;
    }

    #[test]
    fn test_first_gate_after_spawn_interval() {
        let mut state = new_state(Difficulty::Easy);
        let input = TickInput::default();
        assert_eq!(state.spawner.config.interval_ticks, 1000);
        for _ in 0..999 {
            tick(&mut state, &input);
            assert!(state.gates.is_empty());
        }
        tick(&mut state, &input);
        assert_eq!(state.gates.len(), 1);
        assert_eq!(state.gates[0].x, WORLD_WIDTH);
        assert!(matches!(
            state.drain_events().last(),
            Some(GameEvent::GateSpawned { id: 1, .. })
        ));
    }

    #[test]
    fn test_gates_move_left_each_tick() {
        let mut state = new_state(Difficulty::Medium);
        state.gates.push_back(gate_at(1, 600, 100, 10));
        hover(&mut state);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.gates[0].x, 590);
    }

    #[test]
    fn test_scoring_removes_pair_and_increments_once() {
        let mut state = new_state(Difficulty::Easy);
        // Right edge at 52: not yet past the scoring line
        state.gates.push_back(gate_at(1, 2, 100, 5));
        state.gates.push_back(gate_at(2, 700, 100, 5));
        hover(&mut state);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 1);
        assert_eq!(state.high_score, 1);
        assert_eq!(state.gates.len(), 1);
        assert_eq!(state.gates[0].id, 2);
        assert!(state.drain_events().contains(&GameEvent::Scored { score: 1 }));

        hover(&mut state);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_off_screen_gate_retired_without_score() {
        let mut state = new_state(Difficulty::Hard);
        state.gates.push_back(gate_at(1, -60, 100, 15));
        hover(&mut state);
        tick(&mut state, &TickInput::default());
        assert!(state.gates.is_empty());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_collision_ends_run() {
        let mut state = new_state(Difficulty::Easy);
        // Lower obstacle starts at y=300, flyer hit-box spans 290..320
        state.gates.push_back(gate_at(1, 60, 100, 5));
        state.flyer.y = 290;
        state.flyer.vel_y = -1;
        tick(&mut state, &TickInput::default());

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.awaiting_restart);
        let events = state.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::Collided,
                GameEvent::GameOver {
                    score: 0,
                    high_score: 0
                }
            ]
        );
    }

    #[test]
    fn test_game_over_emitted_once_even_with_multiple_hits() {
        let mut state = new_state(Difficulty::Easy);
        // Two overlapping gates both hit the flyer
        state.gates.push_back(gate_at(1, 60, 0, 5));
        state.gates.push_back(gate_at(2, 62, 0, 5));
        state.flyer.y = 400;
        tick(&mut state, &TickInput::default());
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        let game_overs = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_score_counts_before_same_tick_collision() {
        let mut state = new_state(Difficulty::Easy);
        // Leading gate scores this tick; the one behind it hits the flyer
        state.gates.push_back(gate_at(1, 0, 100, 5));
        state.gates.push_back(gate_at(2, 60, 0, 5));
        state.flyer.y = 400;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 1);
        assert!(state.is_game_over());
        assert!(state.drain_events().contains(&GameEvent::GameOver {
            score: 1,
            high_score: 1
        }));
    }

    #[test]
    fn test_frozen_after_game_over() {
        let mut state = new_state(Difficulty::Easy);
        state.gates.push_back(gate_at(1, 60, 0, 5));
        state.flyer.y = 400;
        tick(&mut state, &TickInput::default());
        assert!(state.is_game_over());

        let before = state.snapshot();
        let vel = state.flyer.vel_y;
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump);
        assert_eq!(state.snapshot(), before);
        assert!(!super::jump(&mut state));
        assert_eq!(state.flyer.vel_y, vel);
    }

    #[test]
    fn test_restart_resets_run_keeps_high_score() {
        let mut state = new_state(Difficulty::Easy);
        state.gates.push_back(gate_at(1, 0, 100, 5));
        state.gates.push_back(gate_at(2, 60, 0, 5));
        state.flyer.y = 400;
        tick(&mut state, &TickInput::default());
        assert!(state.is_game_over());
        assert_eq!(state.high_score, 1);

        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(!state.awaiting_restart);
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 1);
        assert!(state.gates.is_empty());
        // The restart tick also simulated one step from the start position
        assert_eq!(state.time_ticks, 1);
        assert_eq!(state.flyer.y, FLYER_START_Y);
    }

    #[test]
    fn test_restart_ignored_while_running() {
        let mut state = new_state(Difficulty::Easy);
        state.score = 4;
        assert!(!restart(&mut state));
        assert_eq!(state.score, 4);
        assert!(!state.drain_events().contains(&GameEvent::Restarted));
    }

    #[test]
    fn test_jump_event() {
        let mut state = new_state(Difficulty::Easy);
        assert!(jump(&mut state));
        assert_eq!(state.flyer.vel_y, JUMP_VELOCITY);
        assert_eq!(state.drain_events(), vec![GameEvent::Jumped]);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = new_state(Difficulty::Medium);
        let mut state2 = new_state(Difficulty::Medium);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..3000 {
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }
        assert_eq!(state1.snapshot(), state2.snapshot());
    }

    proptest! {
        #[test]
        fn prop_high_score_monotonic(
            seed in any::<u64>(),
            commands in proptest::collection::vec(0u8..4, 0..3000),
        ) {
            let mut state = GameState::with_difficulty(Difficulty::Hard, TICK_RATE_HZ, seed).unwrap();
            let mut last_high = 0;
            for c in commands {
                let input = TickInput {
                    jump: c == 1,
                    restart: c == 2,
                    idle_mode: c == 3,
                };
                tick(&mut state, &input);
                prop_assert!(state.high_score >= last_high);
                prop_assert!(state.high_score >= state.score);
                prop_assert!(state.flyer.y >= 0 && state.flyer.y <= FLOOR_Y);
                prop_assert_eq!(state.is_game_over(), state.awaiting_restart);
                last_high = state.high_score;
            }
        }
    }
}
