//! Keyboard and touch input mapped onto [`KeyState`]

use glam::Vec2;

use crate::consts::TOUCH_JUMP_MARGIN;
use crate::sim::{Actor, KeyState};

/// A movement key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Left,
    Right,
    Up,
}

impl Action {
    /// Map a legacy DOM `keyCode` (arrows and WASD)
    pub fn from_key_code(code: u32) -> Option<Self> {
        match code {
            37 | 65 => Some(Action::Left),
            38 | 87 => Some(Action::Up),
            39 | 68 => Some(Action::Right),
            _ => None,
        }
    }

    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key_name(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Action::Left),
            "ArrowUp" | "w" | "W" => Some(Action::Up),
            "ArrowRight" | "d" | "D" => Some(Action::Right),
            _ => None,
        }
    }
}

impl KeyState {
    pub fn set(&mut self, action: Action, down: bool) {
        match action {
            Action::Left => self.left = down,
            Action::Right => self.right = down,
            Action::Up => self.up = down,
        }
    }

    /// Apply a key event; returns true when the key is one we use, so the
    /// caller can suppress the browser's default handling
    pub fn handle_key(&mut self, key: &str, code: u32, down: bool) -> bool {
        match Action::from_key_name(key).or_else(|| Action::from_key_code(code)) {
            Some(action) => {
                self.set(action, down);
                true
            }
            None => false,
        }
    }

    /// Steer the player toward a touch point given in level coordinates
    ///
    /// Touches right of (or level with) the player's column walk right,
    /// others walk left; touches clearly above the player's feet jump.
    pub fn apply_touch(&mut self, touch: Vec2, player: &Actor) {
        let right = player.pos.x.floor() <= touch.x;
        self.right = right;
        self.left = !right;

        let feet = player.pos.y + player.size.y;
        self.up = feet > touch.y + TOUCH_JUMP_MARGIN;
    }

    /// All touches ended
    pub fn release_touch(&mut self) {
        self.clear();
    }
}
