//! Level status and simulation events

use serde::{Deserialize, Serialize};

/// Completion status of a level
///
/// Only ever moves from `Playing` to `Won` or `Lost`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl LevelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelStatus::Playing => "playing",
            LevelStatus::Won => "won",
            LevelStatus::Lost => "lost",
        }
    }
}

/// Things that happened during a simulation step, for sound and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player left the ground
    Jumped,
    /// A coin was picked up
    CoinCollected { remaining: usize },
    /// Player touched lava
    Burned,
    /// Last coin picked up
    LevelWon,
}
