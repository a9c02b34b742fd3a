//! Error types for level loading and settings

use thiserror::Error;

/// Problems found while turning level plans into playable levels
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level plan has no rows")]
    EmptyPlan,

    #[error("row {row} is {found} characters wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile {ch:?} at row {row}, column {column}")]
    UnknownTile { ch: char, row: usize, column: usize },

    #[error("level plan has no player start (@)")]
    MissingPlayer,

    #[error("level plan has {count} player starts, expected exactly one")]
    MultiplePlayers { count: usize },

    #[error("level pack contains no levels")]
    EmptyPack,

    #[error("level {index} is invalid: {source}")]
    InvalidLevel {
        index: usize,
        #[source]
        source: Box<LevelError>,
    },

    #[error("failed to parse level pack: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read level pack: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Physics(#[from] PhysicsError),
}

/// Physics tuning the simulation cannot run with
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PhysicsError {
    #[error("max_step must be a finite number of at least {min} seconds, got {found}")]
    StepOutOfRange { min: f32, found: f32 },

    #[error("finish_delay must be finite and not negative, got {0}")]
    BadFinishDelay(f32),
}

/// Problems loading or validating [`crate::Settings`]
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),

    #[error("invalid settings: {0}")]
    Physics(#[from] PhysicsError),
}
