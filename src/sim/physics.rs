//! Per-tick physics step
//!
//! All per-frame constants are tuned against a nominal 16 ms frame and scaled
//! by `delta / 16` so the game feels the same at any refresh rate.

use serde::{Deserialize, Serialize};

use super::collision::first_hit;
use super::state::{Obstacle, Player, Session};
use crate::config::GameConfig;
use crate::consts::NOMINAL_FRAME_MS;

/// How hard a jump was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JumpIntensity {
    /// Space or swipe up
    #[default]
    Normal,
    /// Tap on the canvas
    Soft,
}

/// Input commands for a single tick, read once as a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputIntents {
    pub move_left: bool,
    pub move_right: bool,
    /// The move came from a swipe gesture (faster)
    pub dash: bool,
    /// Jump requested this tick
    pub jump: Option<JumpIntensity>,
}

impl InputIntents {
    /// -1 for left, 1 for right, 0 when idle or both directions cancel out
    pub fn direction(&self) -> f32 {
        match (self.move_left, self.move_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Result of one physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepOutcome {
    pub collided: bool,
    /// Id of the obstacle that hit the player
    pub hit_obstacle: Option<u32>,
    /// Whether the player left the ground this step
    pub jumped: bool,
    /// Obstacles dropped after falling off the canvas
    pub despawned: usize,
}

/// Advance player and obstacles by `delta` ms and test for collisions
pub fn step(session: &mut Session, config: &GameConfig, delta: f32, intents: &InputIntents) -> StepOutcome {
    let jumped = update_player(&mut session.player, config, delta, intents);
    let despawned = update_obstacles(&mut session.obstacles, config, delta);

    let player_rect = session.player.rect();
    let hit_obstacle = first_hit(&player_rect, session.obstacles.iter().map(Obstacle::bounds))
        .map(|i| session.obstacles[i].id);

    StepOutcome {
        collided: hit_obstacle.is_some(),
        hit_obstacle,
        jumped,
        despawned,
    }
}

/// Move the player. Returns true if a jump started.
pub fn update_player(player: &mut Player, config: &GameConfig, delta: f32, intents: &InputIntents) -> bool {
    let frames = delta / NOMINAL_FRAME_MS;

    // A move intent overrides velocity for this frame; friction handles the stop
    let dir = intents.direction();
    if dir != 0.0 {
        let boost = if intents.dash { config.swipe_speed_factor } else { 1.0 };
        player.vel.x = dir * config.player_speed * boost;
    }

    let mut jumped = false;
    if let Some(intensity) = intents.jump {
        if player.grounded {
            let factor = match intensity {
                JumpIntensity::Normal => 1.0,
                JumpIntensity::Soft => config.soft_jump_factor,
            };
            player.vel.y = config.jump_force * factor;
            player.grounded = false;
            jumped = true;
        }
    }

    player.vel.x *= config.friction.powf(frames);
    player.pos.x += player.vel.x * frames;

    if !player.grounded {
        player.vel.y += config.gravity * frames;
        player.pos.y += player.vel.y * frames;
        let floor = config.floor_y();
        if player.pos.y >= floor {
            player.pos.y = floor;
            player.vel.y = 0.0;
            player.grounded = true;
        }
    }

    player.pos.x = config.clamp_player_x(player.pos.x);
    jumped
}

/// Let obstacles fall and drop the ones below the despawn line.
/// Returns how many were dropped.
pub fn update_obstacles(obstacles: &mut Vec<Obstacle>, config: &GameConfig, delta: f32) -> usize {
    let frames = delta / NOMINAL_FRAME_MS;
    for obstacle in obstacles.iter_mut() {
        obstacle.pos.y += obstacle.speed * frames;
    }
    let before = obstacles.len();
    let despawn_y = config.despawn_y();
    obstacles.retain(|o| o.pos.y < despawn_y);
    before - obstacles.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn grounded_player(config: &GameConfig) -> Player {
        Player::spawn(config)
    }

    #[test]
    fn test_move_sets_velocity_then_friction_decays() {
        let config = GameConfig::default();
        let mut player = grounded_player(&config);
        let start_x = player.pos.x;

        let right = InputIntents {
            move_right: true,
            ..Default::default()
        };
        update_player(&mut player, &config, 16.0, &right);
        assert!((player.vel.x - 6.0 * 0.82).abs() < 1e-4);
        assert!((player.pos.x - (start_x + 6.0 * 0.82)).abs() < 1e-4);

        // No intent: keeps sliding but slows down
        let before = player.vel.x;
        update_player(&mut player, &config, 16.0, &InputIntents::default());
        assert!(player.vel.x < before);
        assert!(player.vel.x > 0.0);
    }

    #[test]
    fn test_dash_is_faster() {
        let config = GameConfig::default();
        let mut player = grounded_player(&config);
        let dash = InputIntents {
            move_left: true,
            dash: true,
            ..Default::default()
        };
        update_player(&mut player, &config, 16.0, &dash);
        assert!((player.vel.x - (-6.0 * 1.6 * 0.82)).abs() < 1e-4);
    }

    #[test]
    fn test_friction_is_frame_rate_independent() {
        let config = GameConfig::default();
        let mut a = grounded_player(&config);
        let mut b = grounded_player(&config);
        a.vel.x = 6.0;
        b.vel.x = 6.0;

        update_player(&mut a, &config, 32.0, &InputIntents::default());
        update_player(&mut b, &config, 16.0, &InputIntents::default());
        update_player(&mut b, &config, 16.0, &InputIntents::default());
        assert!((a.vel.x - b.vel.x).abs() < 1e-4);
    }

    #[test]
    fn test_opposite_directions_cancel() {
        let intents = InputIntents {
            move_left: true,
            move_right: true,
            ..Default::default()
        };
        assert_eq!(intents.direction(), 0.0);
    }

    #[test]
    fn test_jump_arc_returns_to_floor() {
        let config = GameConfig::default();
        let mut player = grounded_player(&config);
        let jump = InputIntents {
            jump: Some(JumpIntensity::Normal),
            ..Default::default()
        };
        assert!(update_player(&mut player, &config, 16.0, &jump));
        assert!(!player.grounded);
        assert!(player.pos.y < config.floor_y());

        let mut peak = player.pos.y;
        for _ in 0..200 {
            update_player(&mut player, &config, 16.0, &InputIntents::default());
            peak = peak.min(player.pos.y);
            if player.grounded {
                break;
            }
        }
        assert!(player.grounded);
        assert_eq!(player.pos.y, config.floor_y());
        assert_eq!(player.vel.y, 0.0);
        assert!(peak < config.floor_y() - 50.0);
    }

    #[test]
    fn test_soft_jump_is_lower() {
        let config = GameConfig::default();
        let mut player = grounded_player(&config);
        let soft = InputIntents {
            jump: Some(JumpIntensity::Soft),
            ..Default::default()
        };
        update_player(&mut player, &config, 0.0, &soft);
        assert!((player.vel.y - (-9.0)).abs() < 1e-4);
    }

    #[test]
    fn test_no_double_jump() {
        let config = GameConfig::default();
        let mut player = grounded_player(&config);
        let jump = InputIntents {
            jump: Some(JumpIntensity::Normal),
            ..Default::default()
        };
        assert!(update_player(&mut player, &config, 16.0, &jump));
        let vy = player.vel.y;
        assert!(!update_player(&mut player, &config, 16.0, &jump));
        // Gravity only, no second impulse
        assert!((player.vel.y - (vy + 0.6)).abs() < 1e-4);
    }

    #[test]
    fn test_player_clamped_to_canvas() {
        let config = GameConfig::default();
        let mut player = grounded_player(&config);
        player.pos.x = 2.0;
        player.vel.x = -50.0;
        update_player(&mut player, &config, 50.0, &InputIntents::default());
        assert_eq!(player.pos.x, 0.0);

        player.pos.x = 270.0;
        player.vel.x = 50.0;
        update_player(&mut player, &config, 50.0, &InputIntents::default());
        assert_eq!(player.pos.x, config.max_player_x());
    }

    #[test]
    fn test_obstacles_fall_and_despawn() {
        let config = GameConfig::default();
        let mut obstacles = vec![
            Obstacle {
                id: 1,
                pos: Vec2::new(10.0, 0.0),
                size: 30.0,
                speed: 2.0,
            },
            Obstacle {
                id: 2,
                pos: Vec2::new(10.0, 558.0),
                size: 30.0,
                speed: 4.0,
            },
        ];
        let dropped = update_obstacles(&mut obstacles, &config, 16.0);
        assert_eq!(dropped, 1);
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles[0].id, 1);
        assert_eq!(obstacles[0].pos.y, 2.0);
    }

    #[test]
    fn test_step_reports_collision() {
        let config = GameConfig::default();
        let mut session = Session::new(&config, 3);
        let target = session.player.pos;
        session.obstacles.push(Obstacle {
            id: 42,
            pos: target,
            size: 30.0,
            speed: 0.0,
        });
        let outcome = step(&mut session, &config, 16.0, &InputIntents::default());
        assert!(outcome.collided);
        assert_eq!(outcome.hit_obstacle, Some(42));
    }

    #[test]
    fn test_step_edge_contact_is_not_a_hit() {
        let config = GameConfig::default();
        let mut session = Session::new(&config, 3);
        let player = session.player.pos;
        // Sits exactly on the player's top edge and does not move
        session.obstacles.push(Obstacle {
            id: 1,
            pos: Vec2::new(player.x, player.y - 30.0),
            size: 30.0,
            speed: 0.0,
        });
        let outcome = step(&mut session, &config, 16.0, &InputIntents::default());
        assert!(!outcome.collided);
    }
}
