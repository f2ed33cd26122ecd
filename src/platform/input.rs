//! Input normalization
//!
//! Keyboard, swipe, tap and on-screen button events all collapse into the
//! three intents the simulation understands: move left, move right and jump.
//! Event handlers write here between ticks; the game loop takes one snapshot
//! per tick, which also consumes one-shot gestures.

use glam::Vec2;

use crate::sim::{InputIntents, JumpIntensity};

/// Minimum horizontal travel (CSS px) for a swipe to count as a dash
pub const SWIPE_MIN_HORIZONTAL: f32 = 24.0;
/// Minimum upward travel (CSS px) for a swipe to count as a jump
pub const SWIPE_MIN_VERTICAL: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Classified touch gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Left,
    Right,
    Up,
    Tap,
}

impl Swipe {
    /// Classify a gesture from its travel vector (screen space, y down)
    pub fn classify(delta: Vec2) -> Self {
        let (dx, dy) = (delta.x, delta.y);
        if dx.abs() > dy.abs() && dx.abs() > SWIPE_MIN_HORIZONTAL {
            if dx > 0.0 { Swipe::Right } else { Swipe::Left }
        } else if dy.abs() > SWIPE_MIN_VERTICAL && dy < 0.0 {
            Swipe::Up
        } else {
            Swipe::Tap
        }
    }
}

/// Remembers where a touch started
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    start: Option<Vec2>,
}

impl SwipeTracker {
    pub fn begin(&mut self, pos: Vec2) {
        self.start = Some(pos);
    }

    /// Finish the gesture; `None` if no touch was in progress
    pub fn end(&mut self, pos: Vec2) -> Option<Swipe> {
        self.start.take().map(|start| Swipe::classify(pos - start))
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }
}

/// Accumulated input between two ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    key_left: bool,
    key_right: bool,
    button_left: bool,
    button_right: bool,
    /// Most recently pressed direction, breaks ties when both are held
    last_pressed: Option<Direction>,
    pending_dash: Option<Direction>,
    pending_jump: Option<JumpIntensity>,
    swipe: SwipeTracker,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press. Returns true if the key is a game control.
    pub fn key_down(&mut self, key: &str) -> bool {
        match key {
            "ArrowLeft" | "a" | "A" => {
                self.key_left = true;
                self.last_pressed = Some(Direction::Left);
            }
            "ArrowRight" | "d" | "D" => {
                self.key_right = true;
                self.last_pressed = Some(Direction::Right);
            }
            " " | "Spacebar" | "ArrowUp" | "w" | "W" => self.request_jump(JumpIntensity::Normal),
            _ => return false,
        }
        true
    }

    /// Handle a key release. Returns true if the key is a game control.
    pub fn key_up(&mut self, key: &str) -> bool {
        match key {
            "ArrowLeft" | "a" | "A" => self.key_left = false,
            "ArrowRight" | "d" | "D" => self.key_right = false,
            " " | "Spacebar" | "ArrowUp" | "w" | "W" => {}
            _ => return false,
        }
        true
    }

    /// On-screen button pressed or released (touch or mouse)
    pub fn set_button(&mut self, dir: Direction, pressed: bool) {
        match dir {
            Direction::Left => self.button_left = pressed,
            Direction::Right => self.button_right = pressed,
        }
        if pressed {
            self.last_pressed = Some(dir);
        }
    }

    pub fn touch_start(&mut self, pos: Vec2) {
        self.swipe.begin(pos);
    }

    /// Finish a canvas touch and queue the resulting gesture
    pub fn touch_end(&mut self, pos: Vec2) -> Option<Swipe> {
        let gesture = self.swipe.end(pos)?;
        match gesture {
            Swipe::Left => self.pending_dash = Some(Direction::Left),
            Swipe::Right => self.pending_dash = Some(Direction::Right),
            Swipe::Up => self.request_jump(JumpIntensity::Normal),
            Swipe::Tap => self.request_jump(JumpIntensity::Soft),
        }
        Some(gesture)
    }

    pub fn request_jump(&mut self, intensity: JumpIntensity) {
        // A full jump wins over a tap queued in the same tick
        self.pending_jump = match (self.pending_jump, intensity) {
            (Some(JumpIntensity::Normal), _) => Some(JumpIntensity::Normal),
            _ => Some(intensity),
        };
    }

    fn held_direction(&self) -> Option<Direction> {
        let left = self.key_left || self.button_left;
        let right = self.key_right || self.button_right;
        match (left, right) {
            (true, false) => Some(Direction::Left),
            (false, true) => Some(Direction::Right),
            (true, true) => self.last_pressed,
            (false, false) => None,
        }
    }

    /// Intents for this tick. One-shot gestures are consumed.
    pub fn snapshot(&mut self) -> InputIntents {
        let (dir, dash) = match self.pending_dash.take() {
            Some(dir) => (Some(dir), true),
            None => (self.held_direction(), false),
        };
        InputIntents {
            move_left: dir == Some(Direction::Left),
            move_right: dir == Some(Direction::Right),
            dash,
            jump: self.pending_jump.take(),
        }
    }

    /// Forget everything (new session)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
