//! Scrolling window over the level, in tile units

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_CANVAS_HEIGHT, MAX_CANVAS_WIDTH, SCALE};
use crate::sim::Level;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Viewport for a canvas sized to the level, capped at the maximum canvas size
    pub fn for_level(level: &Level) -> Self {
        let (w, h) = canvas_size(level);
        Self {
            left: 0.0,
            top: 0.0,
            width: w as f32 / SCALE,
            height: h as f32 / SCALE,
        }
    }

    /// Scroll so the player stays at least a third of the view width away
    /// from every edge, without leaving the level
    pub fn follow(&mut self, level: &Level) {
        let margin = self.width / 3.0;
        let center = level.player().center();
        let max_left = (level.width() as f32 - self.width).max(0.0);
        let max_top = (level.height() as f32 - self.height).max(0.0);

        if center.x < self.left + margin {
            self.left = (center.x - margin).max(0.0);
        } else if center.x > self.left + self.width - margin {
            self.left = (center.x + margin - self.width).min(max_left);
        }

        if center.y < self.top + margin {
            self.top = (center.y - margin).max(0.0);
        } else if center.y > self.top + self.height - margin {
            self.top = (center.y + margin - self.height).min(max_top);
        }
    }

    /// Convert a canvas pixel position into level coordinates
    pub fn to_level(&self, px: f32, py: f32) -> glam::Vec2 {
        glam::Vec2::new(self.left + px / SCALE, self.top + py / SCALE)
    }
}

/// Canvas size in pixels for a level
pub fn canvas_size(level: &Level) -> (u32, u32) {
    let w = (level.width() as f32 * SCALE).min(MAX_CANVAS_WIDTH);
    let h = (level.height() as f32 * SCALE).min(MAX_CANVAS_HEIGHT);
    (w as u32, h as u32)
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    fn wide_level() -> Level {
        let mut rows = vec![" ".repeat(60); 30];
        rows[28].replace_range(2..3, "@");
        rows[29] = "x".repeat(60);
        rows[10].replace_range(40..41, "o");
        Level::new(rows.as_slice(), 0, 0).unwrap()
    }

    #[test]
    fn test_small_level_fits_canvas() {
        let level = Level::new(&["  @ o ", "xxxxxx"], 0, 0).unwrap();
        assert_eq!(canvas_size(&level), (120, 40));
        let view = Viewport::for_level(&level);
        assert_eq!(view.width, 6.0);
        assert_eq!(view.height, 2.0);
    }

    #[test]
    fn test_large_level_is_capped() {
        let level = wide_level();
        assert_eq!(canvas_size(&level), (552, 414));
        let view = Viewport::for_level(&level);
        assert!((view.width - 27.6).abs() < 1e-4);
        assert!((view.height - 20.7).abs() < 1e-4);
    }

    #[test]
    fn test_follow_scrolls_toward_player() {
        let mut level = wide_level();
        let mut view = Viewport::for_level(&level);

        // Player near the bottom-left: view drops to the bottom edge
        view.follow(&level);
        assert_eq!(view.left, 0.0);
        assert!((view.top - (30.0 - view.height)).abs() < 1e-4);

        // Move the player far right: view scrolls but stays in bounds
        level.player_mut().pos = Vec2::new(58.0, 27.5);
        view.follow(&level);
        assert!((view.left - (60.0 - view.width)).abs() < 1e-4);

        // Back to the middle
        level.player_mut().pos = Vec2::new(30.0, 27.5);
        view.follow(&level);
        let margin = view.width / 3.0;
        let center = level.player().center();
        assert!(center.x >= view.left + margin - 1e-4);
        assert!(center.x <= view.left + view.width - margin + 1e-4);
    }

    #[test]
    fn test_follow_never_leaves_level() {
        let mut level = wide_level();
        let mut view = Viewport::for_level(&level);
        for x in [0.0, 10.0, 25.0, 40.0, 59.0, 3.0] {
            for y in [0.0, 12.0, 28.0] {
                level.player_mut().pos = Vec2::new(x, y);
                view.follow(&level);
                assert!(view.left >= 0.0 && view.left + view.width <= 60.0 + 1e-4);
                assert!(view.top >= 0.0 && view.top + view.height <= 30.0 + 1e-4);
            }
        }
    }

    #[test]
    fn test_to_level() {
        let view = Viewport {
            left: 10.0,
            top: 2.0,
            width: 20.0,
            height: 15.0,
        };
        assert_eq!(view.to_level(40.0, 20.0), Vec2::new(12.0, 3.0));
    }
}
