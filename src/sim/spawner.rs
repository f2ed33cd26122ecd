//! Obstacle spawning and the difficulty ramp
//!
//! The spawn timer accumulates tick time. Each time it reaches the current
//! interval a heart is dropped, the timer resets to zero, the interval shrinks
//! toward its floor and the speed multiplier grows.

use glam::Vec2;
use rand::Rng;

use super::state::{Obstacle, Session};
use crate::config::GameConfig;

/// Whether the spawn timer has reached the interval
#[inline]
pub fn should_spawn(elapsed_since_spawn: f32, interval: f32) -> bool {
    elapsed_since_spawn >= interval
}

/// Interval after one ramp step: decays geometrically, clamped at the floor
pub fn next_interval(interval: f32, config: &GameConfig) -> f32 {
    if interval > config.spawn_interval_floor {
        (interval * config.spawn_interval_decay).max(config.spawn_interval_floor)
    } else {
        interval
    }
}

/// Advance the spawn timer by `delta` ms and spawn if due.
/// Returns a copy of the new obstacle.
pub fn maybe_spawn(session: &mut Session, config: &GameConfig, delta: f32) -> Option<Obstacle> {
    session.spawn_timer += delta;
    if !should_spawn(session.spawn_timer, session.spawn_interval) {
        return None;
    }
    session.spawn_timer = 0.0;

    let obstacle = spawn_obstacle(session, config);
    session.obstacles.push(obstacle.clone());
    ramp_difficulty(session, config);

    log::debug!(
        "Spawned heart {} (size {:.1}, speed {:.2}); interval now {:.1}",
        obstacle.id,
        obstacle.size,
        obstacle.speed,
        session.spawn_interval
    );
    Some(obstacle)
}

/// Roll a new obstacle above the visible area. Does not add it to the session.
pub fn spawn_obstacle(session: &mut Session, config: &GameConfig) -> Obstacle {
    let size = session
        .rng
        .random_range(config.obstacle_min_size..config.obstacle_max_size);
    let max_x = (config.canvas_width - size).max(0.0);
    let x = if max_x > 0.0 {
        session.rng.random_range(0.0..=max_x)
    } else {
        0.0
    };
    let base_speed = session
        .rng
        .random_range(config.obstacle_min_speed..config.obstacle_max_speed);
    let speed = base_speed + session.speed_multiplier * config.obstacle_speed_per_multiplier;

    Obstacle {
        id: session.next_entity_id(),
        pos: Vec2::new(x, -size - config.obstacle_spawn_gap),
        size,
        speed,
    }
}

/// One step of the difficulty curve
pub fn ramp_difficulty(session: &mut Session, config: &GameConfig) {
    session.spawn_interval = next_interval(session.spawn_interval, config);
    session.speed_multiplier += config.speed_multiplier_step;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_spawn_before_interval() {
        let config = GameConfig::default();
        let mut session = Session::new(&config, 11);
        assert!(maybe_spawn(&mut session, &config, 450.0).is_none());
        assert!(maybe_spawn(&mut session, &config, 449.0).is_none());
        assert_eq!(session.spawn_timer, 899.0);
        assert!(session.obstacles.is_empty());
        assert_eq!(session.speed_multiplier, 0.0);
    }

    #[test]
    fn test_spawn_at_interval_resets_timer_and_ramps() {
        let config = GameConfig::default();
        let mut session = Session::new(&config, 11);
        let spawned = maybe_spawn(&mut session, &config, 900.0).expect("due");
        assert_eq!(session.spawn_timer, 0.0);
        assert_eq!(session.obstacles.len(), 1);
        assert_eq!(session.obstacles[0], spawned);
        assert!((session.spawn_interval - 900.0 * 0.985).abs() < 1e-3);
        assert!((session.speed_multiplier - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_spawned_obstacle_ranges() {
        let config = GameConfig::default();
        let mut session = Session::new(&config, 99);
        for _ in 0..500 {
            let o = spawn_obstacle(&mut session, &config);
            assert!(o.size >= 22.0 && o.size < 40.0);
            assert!(o.pos.x >= 0.0 && o.pos.x <= config.canvas_width - o.size);
            assert!(o.pos.y < 0.0);
            assert!((o.pos.y - (-o.size - 10.0)).abs() < 1e-4);
            assert!(o.speed >= 2.0 && o.speed < 3.8);
        }
    }

    #[test]
    fn test_speed_includes_multiplier() {
        let config = GameConfig::default();
        let mut session = Session::new(&config, 5);
        session.speed_multiplier = 10.0;
        let o = spawn_obstacle(&mut session, &config);
        assert!(o.speed >= 6.0 && o.speed < 7.8);
    }

    #[test]
    fn test_interval_floor_is_exact() {
        let config = GameConfig::default();
        let mut interval = config.spawn_interval_start;
        for _ in 0..1000 {
            let next = next_interval(interval, &config);
            assert!(next <= interval);
            assert!(next >= 420.0);
            interval = next;
        }
        assert_eq!(interval, 420.0);
    }

    #[test]
    fn test_same_seed_same_obstacles() {
        let config = GameConfig::default();
        let mut a = Session::new(&config, 1234);
        let mut b = Session::new(&config, 1234);
        for _ in 0..20 {
            assert_eq!(spawn_obstacle(&mut a, &config), spawn_obstacle(&mut b, &config));
        }
    }
}
