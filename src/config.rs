//! Gameplay tuning
//!
//! Every simulation function reads its constants from a `GameConfig` instead of
//! the globals, so tests can shrink the canvas or slow the ramp down.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub max_frame_delta: f32,

    pub player_width: f32,
    pub player_height: f32,
    pub floor_margin: f32,
    pub player_speed: f32,
    pub swipe_speed_factor: f32,
    pub friction: f32,
    pub gravity: f32,
    pub jump_force: f32,
    pub soft_jump_factor: f32,

    pub obstacle_min_size: f32,
    pub obstacle_max_size: f32,
    pub obstacle_spawn_gap: f32,
    pub obstacle_min_speed: f32,
    pub obstacle_max_speed: f32,
    pub obstacle_speed_per_multiplier: f32,
    pub despawn_margin: f32,

    pub spawn_interval_start: f32,
    pub spawn_interval_floor: f32,
    pub spawn_interval_decay: f32,
    pub speed_multiplier_start: f32,
    pub speed_multiplier_step: f32,

    pub score_multiplier_factor: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            max_frame_delta: MAX_FRAME_DELTA_MS,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            floor_margin: FLOOR_MARGIN,
            player_speed: PLAYER_SPEED,
            swipe_speed_factor: SWIPE_SPEED_FACTOR,
            friction: FRICTION,
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            soft_jump_factor: SOFT_JUMP_FACTOR,

            obstacle_min_size: OBSTACLE_MIN_SIZE,
            obstacle_max_size: OBSTACLE_MAX_SIZE,
            obstacle_spawn_gap: OBSTACLE_SPAWN_GAP,
            obstacle_min_speed: OBSTACLE_MIN_SPEED,
            obstacle_max_speed: OBSTACLE_MAX_SPEED,
            obstacle_speed_per_multiplier: OBSTACLE_SPEED_PER_MULTIPLIER,
            despawn_margin: DESPAWN_MARGIN,

            spawn_interval_start: SPAWN_INTERVAL_START,
            spawn_interval_floor: SPAWN_INTERVAL_FLOOR,
            spawn_interval_decay: SPAWN_INTERVAL_DECAY,
            speed_multiplier_start: SPEED_MULTIPLIER_START,
            speed_multiplier_step: SPEED_MULTIPLIER_STEP,

            score_multiplier_factor: SCORE_MULTIPLIER_FACTOR,
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Y coordinate of the player's top edge when standing on the floor
    pub fn floor_y(&self) -> f32 {
        self.canvas_height - self.player_height - self.floor_margin
    }

    /// Largest x the player's left edge may take
    pub fn max_player_x(&self) -> f32 {
        (self.canvas_width - self.player_width).max(0.0)
    }

    /// Clamp the player's left edge so the whole box stays on the canvas
    pub fn clamp_player_x(&self, x: f32) -> f32 {
        x.clamp(0.0, self.max_player_x())
    }

    /// Obstacles whose top edge reaches this line are dropped
    pub fn despawn_y(&self) -> f32 {
        self.canvas_height + self.despawn_margin
    }

    /// Clamp a raw frame delta (ms) into the range a tick may apply
    pub fn clamp_delta(&self, delta: f32) -> f32 {
        if delta.is_finite() {
            delta.clamp(0.0, self.max_frame_delta)
        } else {
            0.0
        }
    }
}
