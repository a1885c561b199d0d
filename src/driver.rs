//! Fixed-rate scheduling and input delivery
//!
//! The driver owns the session. Each frame it applies queued commands, then
//! runs however many fixed ticks the elapsed wall-clock time calls for. Tests
//! skip the clock entirely and call `GameSession::tick` directly.

use std::ops::ControlFlow;

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::consts::{MAX_FRAME_TIME, MAX_SUBSTEPS};
use crate::session::GameSession;
use crate::sim::TickInput;

/// Player commands arriving between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Jump,
    Restart,
    Quit,
}

impl Command {
    /// Map a line of text input (`j`, `r`, `q`, or blank for jump)
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "" | "j" | "jump" => Some(Command::Jump),
            "r" | "restart" => Some(Command::Restart),
            "q" | "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Queue between input sources and the driver loop
#[derive(Debug, Clone)]
pub struct CommandQueue {
    tx: Sender<Command>,
    rx: Receiver<Command>,
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Sending half for an input thread
    pub fn sender(&self) -> Sender<Command> {
        self.tx.clone()
    }

    pub fn push(&self, command: Command) {
        // The queue owns a receiver, so this cannot disconnect
        let _ = self.tx.send(command);
    }

    /// Apply every pending command to `session`, in arrival order
    ///
    /// Breaks on `Quit`; commands after it stay queued.
    pub fn drain_into(&self, session: &mut GameSession) -> ControlFlow<()> {
        while let Ok(command) = self.rx.try_recv() {
            match command {
                Command::Jump => {
                    session.on_jump();
                }
                Command::Restart => {
                    session.on_restart();
                }
                Command::Quit => return ControlFlow::Break(()),
            }
        }
        ControlFlow::Continue(())
    }
}

/// Fixed timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStep {
    /// Seconds per tick
    pub tick_dt: f32,
    accumulator: f32,
    max_substeps: u32,
}

impl FixedStep {
    pub fn new(tick_rate_hz: u32) -> Self {
        Self {
            tick_dt: 1.0 / tick_rate_hz.max(1) as f32,
            accumulator: 0.0,
            max_substeps: MAX_SUBSTEPS,
        }
    }

    /// Add `elapsed` seconds of frame time and return how many ticks to run
    ///
    /// Long frames are clamped and the tick count capped, so a stall never
    /// turns into a burst of catch-up ticks.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_TIME);

        let mut ticks = 0;
        while self.accumulator >= self.tick_dt && ticks < self.max_substeps {
            self.accumulator -= self.tick_dt;
            ticks += 1;
        }
        if ticks == self.max_substeps {
            // Drop what could not be caught up on
            self.accumulator = self.accumulator.min(self.tick_dt);
        }
        ticks
    }

    /// Seconds until the next tick is due
    pub fn time_to_next_tick(&self) -> f32 {
        (self.tick_dt - self.accumulator).max(0.0)
    }
}

/// Run one frame: apply queued commands, then the due ticks
///
/// Returns `Break` when a quit command was seen.
pub fn run_frame(
    session: &mut GameSession,
    commands: &CommandQueue,
    step: &mut FixedStep,
    input: &TickInput,
    elapsed: f32,
) -> ControlFlow<()> {
    if commands.drain_into(session).is_break() {
        return ControlFlow::Break(());
    }
    for _ in 0..step.advance(elapsed) {
        session.tick_with(input);
    }
    ControlFlow::Continue(())
}
