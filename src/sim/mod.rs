//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters through tick deltas
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies beyond the `Host` trait

pub mod collision;
pub mod game_loop;
pub mod physics;
pub mod spawner;
pub mod state;

pub use collision::Aabb;
pub use game_loop::{
    FrameSnapshot, GameLoop, GameOverInfo, TickOutcome, advance_session, score_for_tick,
};
pub use physics::{InputIntents, JumpIntensity, StepOutcome};
pub use state::{GamePhase, Obstacle, Player, Session, StopReason};
