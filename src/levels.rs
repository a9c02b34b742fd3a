//! Level plans and level packs
//!
//! A plan is a list of equal-width strings using the tile vocabulary:
//! `x` wall, `!` lava, `@` player start, `o` coin, `=` `|` `v` moving lava,
//! space for empty.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LevelError;
use crate::settings::Physics;
use crate::sim::Level;

/// Levels bundled with the game
const BUILTIN_LEVELS: &[&[&str]] = &[
    &[
        "                      ",
        "                      ",
        "  x              = x  ",
        "  x         o o    x  ",
        "  x @      xxxxx   x  ",
        "  xxxxx            x  ",
        "      x!!!!!!!!!!!!x  ",
        "      xxxxxxxxxxxxxx  ",
        "                      ",
    ],
    &[
        "                                          ",
        "                                          ",
        "  x                                    x  ",
        "  x         o             o            x  ",
        "  x        xxx     =     xxx     o     x  ",
        "  x                             xxx    x  ",
        "  x  @          o                      x  ",
        "  xxxxxx      xxxxx     |     xxxxxxxxxx  ",
        "       x!!!!!!x   x!!!!!!!!!!!x           ",
        "       xxxxxxxx   xxxxxxxxxxxxx           ",
        "                                          ",
    ],
    &[
        "                                    ",
        "  xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx  ",
        "  x      v        v        v     x  ",
        "  x                              x  ",
        "  x    o     o        o     o    x  ",
        "  x                              x  ",
        "  x         xxxxx   xxxxx        x  ",
        "  x  @                       o   x  ",
        "  xxxxxxx!!!!xxxxxxxxxx!!!!xxxxxxx  ",
        "        xxxx          xxxx          ",
        "                                    ",
    ],
];

/// One level layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelPlan {
    pub rows: Vec<String>,
}

impl LevelPlan {
    pub fn new<S: Into<String>>(rows: impl IntoIterator<Item = S>) -> Self {
        Self {
            rows: rows.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse into a fresh playable level
    pub fn build(&self, number: usize, seed: u64, physics: Physics) -> Result<Level, LevelError> {
        Level::new(self.rows.as_slice(), number, seed)?.with_physics(physics)
    }
}

/// Accepted JSON layouts for a level pack
#[derive(Deserialize)]
#[serde(untagged)]
enum PackFile {
    Bare(Vec<LevelPlan>),
    Wrapped { levels: Vec<LevelPlan> },
}

/// An ordered sequence of levels played one after another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelPack {
    pub levels: Vec<LevelPlan>,
}

impl LevelPack {
    /// Build and validate a pack
    pub fn new(levels: Vec<LevelPlan>) -> Result<Self, LevelError> {
        let pack = Self { levels };
        pack.validate()?;
        Ok(pack)
    }

    /// The bundled levels
    pub fn builtin() -> Self {
        Self {
            levels: BUILTIN_LEVELS
                .iter()
                .map(|rows| LevelPlan::new(rows.iter().copied()))
                .collect(),
        }
    }

    /// Parse a pack from JSON: either an array of plans or `{"levels": [...]}`
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let levels = match serde_json::from_str::<PackFile>(json)? {
            PackFile::Bare(levels) | PackFile::Wrapped { levels } => levels,
        };
        Self::new(levels)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let pack = Self::from_json(&json)?;
        log::info!(
            "Loaded {} levels from {}",
            pack.len(),
            path.as_ref().display()
        );
        Ok(pack)
    }

    /// Check that the pack is non-empty and every plan parses
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.levels.is_empty() {
            return Err(LevelError::EmptyPack);
        }
        for (index, plan) in self.levels.iter().enumerate() {
            Level::new(plan.rows.as_slice(), index, 0).map_err(|e| LevelError::InvalidLevel {
                index,
                source: Box::new(e),
            })?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LevelPlan> {
        self.levels.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelPlan> {
        self.levels.iter()
    }
}
