//! Heart Dodge - a falling-hearts arcade dodger
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game loop)
//! - `platform`: Host capabilities (clock, visibility, tick scheduling, input)
//! - `renderer`: Draw list and WebGPU SDF pipeline
//! - `config`: Gameplay tuning
//! - `settings`: Player preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod config;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use config::GameConfig;
pub use settings::{Settings, TouchControls};

/// Game configuration constants
pub mod consts {
    /// Internal canvas resolution (CSS scales it to fit the page)
    pub const CANVAS_WIDTH: f32 = 320.0;
    pub const CANVAS_HEIGHT: f32 = 480.0;

    /// Nominal frame length in ms; per-frame constants are expressed against it
    pub const NOMINAL_FRAME_MS: f32 = 16.0;
    /// Largest delta a single tick may apply (stalls, tab switches)
    pub const MAX_FRAME_DELTA_MS: f32 = 50.0;

    /// Player box
    pub const PLAYER_WIDTH: f32 = 46.0;
    pub const PLAYER_HEIGHT: f32 = 24.0;
    /// Gap between the floor line and the canvas bottom edge
    pub const FLOOR_MARGIN: f32 = 10.0;

    /// Horizontal speed set by a move intent (units per nominal frame)
    pub const PLAYER_SPEED: f32 = 6.0;
    /// Speed factor for swipe gestures
    pub const SWIPE_SPEED_FACTOR: f32 = 1.6;
    /// Velocity retained per nominal frame
    pub const FRICTION: f32 = 0.82;
    /// Downward acceleration per nominal frame while airborne
    pub const GRAVITY: f32 = 0.6;
    pub const JUMP_FORCE: f32 = -10.0;
    /// Tap gestures give a slightly smaller hop
    pub const SOFT_JUMP_FACTOR: f32 = 0.9;

    /// Obstacle size range [min, max)
    pub const OBSTACLE_MIN_SIZE: f32 = 22.0;
    pub const OBSTACLE_MAX_SIZE: f32 = 40.0;
    /// Extra gap above the canvas top when an obstacle spawns
    pub const OBSTACLE_SPAWN_GAP: f32 = 10.0;
    /// Base fall speed range [min, max)
    pub const OBSTACLE_MIN_SPEED: f32 = 2.0;
    pub const OBSTACLE_MAX_SPEED: f32 = 3.8;
    /// Fall speed added per unit of speed multiplier
    pub const OBSTACLE_SPEED_PER_MULTIPLIER: f32 = 0.4;
    /// Obstacles further than this below the canvas are dropped
    pub const DESPAWN_MARGIN: f32 = 80.0;

    /// Difficulty ramp
    pub const SPAWN_INTERVAL_START: f32 = 900.0;
    pub const SPAWN_INTERVAL_FLOOR: f32 = 420.0;
    pub const SPAWN_INTERVAL_DECAY: f32 = 0.985;
    pub const SPEED_MULTIPLIER_START: f32 = 0.0;
    pub const SPEED_MULTIPLIER_STEP: f32 = 0.02;

    /// Score bonus per unit of speed multiplier
    pub const SCORE_MULTIPLIER_FACTOR: f32 = 0.05;
}
