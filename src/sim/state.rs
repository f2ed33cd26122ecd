//! Game state and core simulation types
//!
//! A `Session` owns everything one run mutates. It is rebuilt from scratch on
//! every start, so nothing leaks between runs.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::config::GameConfig;

/// Why the loop is not running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// No session has been played yet
    NotStarted,
    /// Host stopped the loop (page hidden); a fresh start is required
    Paused,
    /// Player was hit
    GameOver,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    Stopped(StopReason),
}

impl GamePhase {
    pub fn is_running(&self) -> bool {
        matches!(self, GamePhase::Running)
    }

    /// Whether the presentation layer should keep showing a score
    pub fn shows_score(&self) -> bool {
        !matches!(self, GamePhase::Stopped(StopReason::NotStarted))
    }
}

/// The player's sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner, canvas space
    pub pos: Vec2,
    pub size: Vec2,
    /// Units per nominal frame
    pub vel: Vec2,
    pub grounded: bool,
}

impl Player {
    /// Player standing on the floor at the bottom-center of the canvas
    pub fn spawn(config: &GameConfig) -> Self {
        let size = Vec2::new(config.player_width, config.player_height);
        Self {
            pos: Vec2::new((config.canvas_width - size.x) / 2.0, config.floor_y()),
            size,
            vel: Vec2::ZERO,
            grounded: true,
        }
    }

    pub fn rect(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A falling heart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Top-left corner of the bounding square
    pub pos: Vec2,
    /// Side of the bounding square
    pub size: f32,
    /// Fall speed, units per nominal frame
    pub speed: f32,
}

impl Obstacle {
    /// Bounding box used for collisions
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(self.size))
    }
}

/// State of a single run
#[derive(Debug, Clone)]
pub struct Session {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub player: Player,
    /// Active obstacles, in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Time accumulated since the last spawn (ms)
    pub spawn_timer: f32,
    /// Current spawn interval (ms), never below the configured floor
    pub spawn_interval: f32,
    pub speed_multiplier: f32,
    pub score: u64,
    /// Total simulated time (ms)
    pub elapsed_ms: f64,
    /// Completed ticks
    pub ticks: u64,
    next_id: u32,
}

impl Session {
    /// Fresh session with the given seed. The phase starts as not-started; the
    /// game loop flips it to running.
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Stopped(StopReason::NotStarted),
            player: Player::spawn(config),
            obstacles: Vec::new(),
            spawn_timer: 0.0,
            spawn_interval: config.spawn_interval_start,
            speed_multiplier: config.speed_multiplier_start,
            score: 0,
            elapsed_ms: 0.0,
            ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
