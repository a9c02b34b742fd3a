//! Dark Blue - a tile-based platform game
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (physics, collisions, level state)
//! - `levels`: Level plans and packs
//! - `game`: Level sequencing (restart, advance, win)
//! - `input`: Keyboard/touch mapping onto held keys
//! - `render`: Viewport, frame building and text rendering
//! - `settings`: Physics tuning and preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod game;
pub mod input;
pub mod levels;
pub mod render;
pub mod settings;
pub mod sim;

pub use error::{LevelError, PhysicsError, SettingsError};
pub use game::{Game, GameProgress};
pub use levels::{LevelPack, LevelPlan};
pub use settings::{Physics, Settings};

/// Game configuration constants
pub mod consts {
    /// Longest simulated slice of time (seconds); keeps fast actors from
    /// passing through one-tile walls
    pub const MAX_STEP: f32 = 0.05;
    /// Smallest accepted `max_step`
    pub const MIN_STEP: f32 = 0.001;
    /// Longest frame the game will simulate at once
    pub const MAX_FRAME_SECS: f32 = 0.1;

    /// Player movement (tiles/s, tiles/s²)
    pub const PLAYER_X_SPEED: f32 = 7.0;
    pub const GRAVITY: f32 = 30.0;
    pub const JUMP_SPEED: f32 = 17.0;

    /// Coin wobble
    pub const WOBBLE_SPEED: f32 = 8.0;
    pub const WOBBLE_DIST: f32 = 0.07;

    /// Seconds a level keeps running after it is won or lost
    pub const FINISH_DELAY: f32 = 1.0;

    /// Pixels per tile
    pub const SCALE: f32 = 20.0;
    /// Canvas size caps (pixels)
    pub const MAX_CANVAS_WIDTH: f32 = 552.0;
    pub const MAX_CANVAS_HEIGHT: f32 = 414.0;
    /// Player sprite is drawn this many pixels wider on each side than its box
    pub const PLAYER_X_OVERLAP: f32 = 4.0;
    /// Running animation frame rate
    pub const PLAYER_RUN_FPS: f32 = 12.0;

    /// A touch this far (tiles) above the player's feet makes it jump
    pub const TOUCH_JUMP_MARGIN: f32 = 0.75;
}
