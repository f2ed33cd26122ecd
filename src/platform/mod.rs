//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (monotonic clock)
//! - Visibility detection
//! - Tick scheduling (requestAnimationFrame on web, manual in tests)
//! - Input normalization
//! - Responsive canvas sizing

pub mod input;
pub mod layout;
pub mod manual;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{InputState, Swipe, SwipeTracker};
pub use layout::DisplaySize;
pub use manual::ManualHost;

/// Identifies one scheduled tick. Tokens from a previous session, or issued
/// before a stop, are stale and ignored by the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(pub u64);

/// Capabilities the game loop needs from its environment
pub trait Host {
    /// Monotonic clock in milliseconds
    fn now(&self) -> f64;

    /// Whether the page is visible; hidden pauses the loop
    fn is_visible(&self) -> bool {
        true
    }

    /// Arrange for `GameLoop::tick(token)` to run on the next display refresh.
    /// At most one tick is pending at a time.
    fn schedule_next_tick(&mut self, token: TickToken);

    /// Drop the pending tick if the host can. Stale tokens are ignored either
    /// way, so this is best effort.
    fn cancel_pending_tick(&mut self) {}
}
