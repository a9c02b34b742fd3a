//! Rendering model
//!
//! Platform-independent: builds frames (viewport, sprites, scoreboard) that the
//! browser front end blits onto a canvas, plus a text renderer for terminals.

pub mod display;
pub mod text;
pub mod viewport;

pub use display::{Display, Frame, Rgb, Sprite, SpriteKind, background, scoreboard};
pub use text::render_text;
pub use viewport::{Viewport, canvas_size};
