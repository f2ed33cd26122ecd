//! Render surface adapter
//!
//! The game only needs three primitives: clear, filled rectangle and heart.
//! `draw_frame` describes a frame in those terms; a `DrawList` records them
//! so the GPU pipeline can upload the whole frame at once.

use glam::Vec2;

use crate::sim::{Aabb, FrameSnapshot};

/// sRGB-encoded RGBA in [0, 1]
pub type Rgba = [f32; 4];

/// Color from a 0xRRGGBB literal
pub const fn rgb(hex: u32) -> Rgba {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

pub const BACKGROUND_COLOR: Rgba = rgb(0x1b0f1e);
pub const FLOOR_COLOR: Rgba = [1.0, 1.0, 1.0, 0.03];
pub const PLAYER_COLOR: Rgba = rgb(0xff6b9a);
pub const OBSTACLE_COLOR: Rgba = rgb(0x8b2b3d);

/// Height of the floor strip along the bottom edge
pub const FLOOR_STRIP_HEIGHT: f32 = 8.0;
/// Heart drawn on top of the player
pub const PLAYER_HEART_SIZE: f32 = 20.0;
pub const PLAYER_HEART_OFFSET: f32 = 8.0;
/// Obstacle hearts are drawn slightly above their bounding box center
pub const OBSTACLE_HEART_LIFT: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Clear(Rgba),
    FillRect { rect: Aabb, color: Rgba },
    /// Heart centered on `center`, roughly `size` wide and tall
    Heart { center: Vec2, size: f32, color: Rgba },
}

/// Primitive drawing operations
pub trait RenderSurface {
    /// Drawing area in canvas units
    fn size(&self) -> Vec2;
    fn clear(&mut self, color: Rgba);
    fn fill_rect(&mut self, rect: Aabb, color: Rgba);
    fn heart(&mut self, center: Vec2, size: f32, color: Rgba);
}

/// Records draw commands in painter's order
#[derive(Debug, Clone)]
pub struct DrawList {
    size: Vec2,
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    /// Color of the last clear, if any
    pub fn clear_color(&self) -> Option<Rgba> {
        self.commands.iter().rev().find_map(|c| match c {
            DrawCommand::Clear(color) => Some(*color),
            _ => None,
        })
    }

    /// Shapes drawn after the last clear
    pub fn shapes(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear(_)))
            .map_or(0, |i| i + 1);
        &self.commands[start..]
    }
}

impl RenderSurface for DrawList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Rgba) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: Aabb, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn heart(&mut self, center: Vec2, size: f32, color: Rgba) {
        self.commands.push(DrawCommand::Heart {
            center,
            size,
            color,
        });
    }
}

/// Draw one frame: background, floor, player, then falling hearts
pub fn draw_frame(surface: &mut impl RenderSurface, frame: &FrameSnapshot) {
    let size = surface.size();
    surface.clear(BACKGROUND_COLOR);
    surface.fill_rect(
        Aabb::new(
            Vec2::new(0.0, size.y - FLOOR_STRIP_HEIGHT),
            Vec2::new(size.x, FLOOR_STRIP_HEIGHT),
        ),
        FLOOR_COLOR,
    );

    let player = frame.player;
    surface.fill_rect(player, PLAYER_COLOR);
    surface.heart(
        Vec2::new(player.min.x + player.size.x / 2.0, player.min.y - PLAYER_HEART_OFFSET),
        PLAYER_HEART_SIZE,
        PLAYER_COLOR,
    );

    for obstacle in &frame.obstacles {
        let half = obstacle.size / 2.0;
        surface.heart(
            Vec2::new(obstacle.pos.x + half, obstacle.pos.y + half - OBSTACLE_HEART_LIFT),
            obstacle.size,
            OBSTACLE_COLOR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GamePhase, Obstacle};

    fn frame() -> FrameSnapshot {
        FrameSnapshot {
            phase: GamePhase::Running,
            score: 12,
            player: Aabb::new(Vec2::new(137.0, 446.0), Vec2::new(46.0, 24.0)),
            obstacles: vec![Obstacle {
                id: 1,
                pos: Vec2::new(50.0, 100.0),
                size: 30.0,
                speed: 2.0,
            }],
            speed_multiplier: 0.0,
            spawn_interval: 900.0,
        }
    }

    #[test]
    fn test_rgb() {
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(rgb(0x00ff00)[1], 1.0);
    }

    #[test]
    fn test_draw_frame_order() {
        let mut list = DrawList::new(Vec2::new(320.0, 480.0));
        draw_frame(&mut list, &frame());
        assert_eq!(list.clear_color(), Some(BACKGROUND_COLOR));

        let shapes = list.shapes();
        assert_eq!(shapes.len(), 4);
        assert!(matches!(shapes[0], DrawCommand::FillRect { rect, .. } if rect.min.y == 472.0));
        assert!(matches!(shapes[1], DrawCommand::FillRect { color, .. } if color == PLAYER_COLOR));
        assert_eq!(
            shapes[2],
            DrawCommand::Heart {
                center: Vec2::new(160.0, 438.0),
                size: 20.0,
                color: PLAYER_COLOR,
            }
        );
        assert_eq!(
            shapes[3],
            DrawCommand::Heart {
                center: Vec2::new(65.0, 109.0),
                size: 30.0,
                color: OBSTACLE_COLOR,
            }
        );
    }

    #[test]
    fn test_clear_discards_previous_frame() {
        let mut list = DrawList::new(Vec2::new(320.0, 480.0));
        draw_frame(&mut list, &frame());
        draw_frame(&mut list, &frame());
        assert_eq!(list.commands.len(), 5);
    }
}
