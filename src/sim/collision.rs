//! Axis-aligned bounding box collision
//!
//! Hearts are approximated by their bounding square. Overlap is strict: boxes
//! that only share an edge do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in canvas space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// True when the two boxes share a region of non-zero area
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        other.min.x < a_max.x
            && b_max.x > self.min.x
            && other.min.y < a_max.y
            && b_max.y > self.min.y
    }
}

/// Index of the first obstacle box overlapping the player, if any
pub fn first_hit(player: &Aabb, obstacles: impl IntoIterator<Item = Aabb>) -> Option<usize> {
    obstacles.into_iter().position(|o| o.overlaps(player))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Aabb {
        Aabb::new(Vec2::new(100.0, 400.0), Vec2::new(46.0, 24.0))
    }

    #[test]
    fn test_full_overlap() {
        let hazard = Aabb::new(Vec2::new(110.0, 405.0), Vec2::splat(30.0));
        assert!(player().overlaps(&hazard));
        assert!(hazard.overlaps(&player()));
    }

    #[test]
    fn test_shared_edges_do_not_collide() {
        let p = player();
        // Directly above, bottom edge touching the player's top edge
        let above = Aabb::new(Vec2::new(110.0, 370.0), Vec2::splat(30.0));
        // Right of the player, left edge touching the player's right edge
        let right = Aabb::new(Vec2::new(146.0, 400.0), Vec2::splat(30.0));
        // Left of the player
        let left = Aabb::new(Vec2::new(70.0, 400.0), Vec2::splat(30.0));
        for hazard in [above, right, left] {
            assert!(!p.overlaps(&hazard));
            assert!(!hazard.overlaps(&p));
        }
    }

    #[test]
    fn test_corner_touch_does_not_collide() {
        let hazard = Aabb::new(Vec2::new(146.0, 424.0), Vec2::splat(22.0));
        assert!(!player().overlaps(&hazard));
    }

    #[test]
    fn test_sliver_overlap_collides() {
        let hazard = Aabb::new(Vec2::new(145.9, 400.0), Vec2::splat(22.0));
        assert!(player().overlaps(&hazard));
    }

    #[test]
    fn test_first_hit() {
        let miss = Aabb::new(Vec2::new(0.0, 0.0), Vec2::splat(22.0));
        let hit = Aabb::new(Vec2::new(120.0, 410.0), Vec2::splat(22.0));
        assert_eq!(first_hit(&player(), [miss, hit]), Some(1));
        assert_eq!(first_hit(&player(), [miss]), None);
    }
}
