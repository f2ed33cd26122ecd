//! Browser host: `performance.now()`, page visibility and
//! `requestAnimationFrame` scheduling.

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use super::{Host, TickToken};

/// Schedules ticks on the display refresh and hands the token back through
/// `on_frame`, which is expected to call `GameLoop::tick`.
pub struct RafHost {
    on_frame: Rc<dyn Fn(TickToken)>,
    pending_handle: Option<i32>,
}

impl RafHost {
    pub fn new(on_frame: impl Fn(TickToken) + 'static) -> Self {
        Self {
            on_frame: Rc::new(on_frame),
            pending_handle: None,
        }
    }
}

impl Host for RafHost {
    fn now(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    fn is_visible(&self) -> bool {
        web_sys::window()
            .and_then(|w| w.document())
            .map(|d| d.visibility_state() != web_sys::VisibilityState::Hidden)
            .unwrap_or(true)
    }

    fn schedule_next_tick(&mut self, token: TickToken) {
        let Some(window) = web_sys::window() else {
            log::error!("No window - cannot schedule frame");
            return;
        };
        let on_frame = self.on_frame.clone();
        // Released by wasm-bindgen once the frame has run
        let callback = Closure::once_into_js(move |_time: f64| on_frame(token));
        match window.request_animation_frame(callback.unchecked_ref()) {
            Ok(handle) => self.pending_handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
    }

    fn cancel_pending_tick(&mut self) {
        if let (Some(handle), Some(window)) = (self.pending_handle.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(handle);
        }
    }
}
