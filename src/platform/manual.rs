//! Deterministic host driven by hand
//!
//! Used by tests and the native headless runner: the clock only moves when
//! told to, and the pending tick is run explicitly.

use super::{Host, TickToken};

#[derive(Debug, Clone)]
pub struct ManualHost {
    now: f64,
    visible: bool,
    pending: Option<TickToken>,
    /// Number of ticks ever scheduled
    pub scheduled: u64,
}

impl Default for ManualHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualHost {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            visible: true,
            pending: None,
            scheduled: 0,
        }
    }

    /// Move the clock forward by `ms`
    pub fn advance(&mut self, ms: f64) {
        self.now += ms;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Token of the tick waiting to run, if any
    pub fn pending(&self) -> Option<TickToken> {
        self.pending
    }

    /// Take the pending tick so it can be run
    pub fn take_pending(&mut self) -> Option<TickToken> {
        self.pending.take()
    }
}

impl Host for ManualHost {
    fn now(&self) -> f64 {
        self.now
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn schedule_next_tick(&mut self, token: TickToken) {
        self.pending = Some(token);
        self.scheduled += 1;
    }

    fn cancel_pending_tick(&mut self) {
        self.pending = None;
    }
}
