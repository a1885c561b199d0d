//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Gates kept in spawn order
//! - No rendering, audio, storage or platform dependencies

pub mod autopilot;
pub mod flyer;
pub mod gate;
pub mod rect;
pub mod spawner;
pub mod state;
pub mod tick;

pub use flyer::Flyer;
pub use gate::Gate;
pub use rect::{Rect, intersects};
pub use spawner::{SpawnConfig, Spawner};
pub use state::{GameEvent, GamePhase, GameState, GateView, Snapshot};
pub use tick::{TickInput, jump, restart, tick};
