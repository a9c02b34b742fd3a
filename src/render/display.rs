//! Frame building for the canvas front end
//!
//! Produces a flat list of sprites in canvas pixels; the platform layer only
//! has to blit them.

use serde::{Deserialize, Serialize};

use super::viewport::Viewport;
use crate::consts::{PLAYER_RUN_FPS, PLAYER_X_OVERLAP, SCALE};
use crate::sim::{ActorKind, Level, LevelStatus, Tile};

/// Player sprite sheet frame shown while standing
pub const POSE_STANDING: u8 = 8;
/// Player sprite sheet frame shown while airborne
pub const POSE_AIRBORNE: u8 = 9;
/// Number of running frames at the start of the player sheet
pub const RUN_FRAMES: u8 = 8;

/// An sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// CSS colour string for canvas fill styles
    pub fn css(self) -> String {
        format!("rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

/// Background colour for each level status
pub fn background(status: LevelStatus) -> Rgb {
    match status {
        LevelStatus::Won => Rgb(68, 191, 255),
        LevelStatus::Lost => Rgb(44, 136, 214),
        LevelStatus::Playing => Rgb(52, 166, 251),
    }
}

/// What to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteKind {
    Wall,
    LavaTile,
    Coin,
    Lava,
    Player { pose: u8, flipped: bool },
}

impl SpriteKind {
    /// Horizontal offset of this sprite in its sheet, in pixels
    ///
    /// Tiles and non-player actors share one sheet (wall, lava, coin); the
    /// player has its own sheet of equally wide frames.
    pub fn sheet_x(&self, width: f32) -> f32 {
        match *self {
            SpriteKind::Wall => 0.0,
            SpriteKind::LavaTile | SpriteKind::Lava => SCALE,
            SpriteKind::Coin => 2.0 * SCALE,
            SpriteKind::Player { pose, .. } => pose as f32 * width,
        }
    }

    /// Fallback fill colour when no sprite sheet is available
    pub fn color(&self) -> Rgb {
        match self {
            SpriteKind::Wall => Rgb(255, 255, 255),
            SpriteKind::LavaTile | SpriteKind::Lava => Rgb(255, 100, 100),
            SpriteKind::Coin => Rgb(241, 229, 89),
            SpriteKind::Player { .. } => Rgb(64, 64, 64),
        }
    }
}

/// A sprite positioned in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Everything needed to paint one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub background: Rgb,
    /// Tiles first, then actors in list order
    pub sprites: Vec<Sprite>,
    pub scoreboard: String,
}

/// Scoreboard line, e.g. `Level: 1 | Coins: 2/5`
pub fn scoreboard(level: &Level) -> String {
    format!(
        "Level: {} | Coins: {}/{}",
        level.number + 1,
        level.coins_collected(),
        level.total_coins()
    )
}

/// Per-level display state: scroll position and player animation
#[derive(Debug, Clone)]
pub struct Display {
    pub viewport: Viewport,
    animation_time: f32,
    flip_player: bool,
}

impl Display {
    pub fn new(level: &Level) -> Self {
        let mut viewport = Viewport::for_level(level);
        viewport.follow(level);
        Self {
            viewport,
            animation_time: 0.0,
            flip_player: false,
        }
    }

    /// Advance animation by `step` seconds and build the frame
    pub fn draw_frame(&mut self, level: &Level, step: f32) -> Frame {
        self.animation_time += step;
        self.viewport.follow(level);

        let mut sprites = self.tile_sprites(level);
        for (i, actor) in level.actors.iter().enumerate() {
            let width = actor.size.x * SCALE;
            let height = actor.size.y * SCALE;
            let x = ((actor.pos.x - self.viewport.left) * SCALE).floor();
            let y = (actor.pos.y - self.viewport.top) * SCALE;

            let sprite = match actor.kind {
                ActorKind::Player if i == level.player_index() => {
                    let kind = self.player_kind(actor.speed.x, actor.speed.y);
                    Sprite {
                        kind,
                        x: x - PLAYER_X_OVERLAP,
                        y,
                        width: width + PLAYER_X_OVERLAP * 2.0,
                        height,
                    }
                }
                ActorKind::Player => continue,
                ActorKind::Coin { .. } => Sprite {
                    kind: SpriteKind::Coin,
                    x,
                    y,
                    width,
                    height,
                },
                ActorKind::Lava { .. } => Sprite {
                    kind: SpriteKind::Lava,
                    x,
                    y,
                    width,
                    height,
                },
            };
            sprites.push(sprite);
        }

        Frame {
            background: background(level.status()),
            sprites,
            scoreboard: scoreboard(level),
        }
    }

    /// Non-empty tiles inside the viewport
    fn tile_sprites(&self, level: &Level) -> Vec<Sprite> {
        let view = &self.viewport;
        let x_start = view.left.floor().max(0.0) as usize;
        let x_end = ((view.left + view.width).ceil() as usize).min(level.width());
        let y_start = view.top.floor().max(0.0) as usize;
        let y_end = ((view.top + view.height).ceil() as usize).min(level.height());

        let mut sprites = Vec::new();
        for y in y_start..y_end {
            for x in x_start..x_end {
                let kind = match level.grid.get(x, y) {
                    Tile::Empty => continue,
                    Tile::Wall => SpriteKind::Wall,
                    Tile::Lava => SpriteKind::LavaTile,
                };
                sprites.push(Sprite {
                    kind,
                    x: (x as f32 - view.left) * SCALE,
                    y: (y as f32 - view.top) * SCALE,
                    width: SCALE,
                    height: SCALE,
                });
            }
        }
        sprites
    }

    /// Pick the player's pose and facing from its speed
    fn player_kind(&mut self, speed_x: f32, speed_y: f32) -> SpriteKind {
        if speed_x != 0.0 {
            self.flip_player = speed_x < 0.0;
        }

        let pose = if speed_y != 0.0 {
            POSE_AIRBORNE
        } else if speed_x != 0.0 {
            ((self.animation_time * PLAYER_RUN_FPS).floor() as u32 % RUN_FRAMES as u32) as u8
        } else {
            POSE_STANDING
        };

        SpriteKind::Player {
            pose,
            flipped: self.flip_player,
        }
    }
}
