//! Responsive canvas sizing
//!
//! The canvas keeps a fixed internal resolution; only its CSS size follows the
//! viewport.

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Horizontal space reserved around the canvas (CSS px)
pub const PAGE_GUTTER: f64 = 48.0;
/// Widest the canvas is displayed (CSS px)
pub const MAX_DISPLAY_WIDTH: f64 = 420.0;

/// CSS display size of the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySize {
    pub width: u32,
    pub height: u32,
}

impl DisplaySize {
    /// Size for a viewport `inner_width` CSS pixels wide
    pub fn for_viewport(inner_width: f64) -> Self {
        let width = (inner_width - PAGE_GUTTER).min(MAX_DISPLAY_WIDTH).max(0.0).floor();
        let height = (width * CANVAS_HEIGHT as f64 / CANVAS_WIDTH as f64).floor();
        Self {
            width: width as u32,
            height: height as u32,
        }
    }

    /// Internal drawing resolution
    pub fn internal() -> (u32, u32) {
        (CANVAS_WIDTH as u32, CANVAS_HEIGHT as u32)
    }
}
