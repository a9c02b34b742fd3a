//! Level sequencing
//!
//! Plays the levels of a pack in order: a lost level restarts, a won level
//! advances, and winning the last level completes the game.

use crate::consts::MAX_FRAME_SECS;
use crate::error::LevelError;
use crate::levels::LevelPack;
use crate::settings::Physics;
use crate::sim::{GameEvent, KeyState, Level, LevelStatus};

/// Message shown once every level is won
pub const WIN_MESSAGE: &str = "You win!";

/// What happened during a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameProgress {
    /// Current level still running
    Playing,
    /// The level was lost and started over (0-based level index)
    LevelRestarted(usize),
    /// The previous level was won and this one started
    LevelAdvanced(usize),
    /// The last level was won
    Completed,
}

/// A run through a level pack
#[derive(Debug, Clone)]
pub struct Game {
    pack: LevelPack,
    physics: Physics,
    seed: u64,
    /// Levels started so far, mixed into each level's seed
    attempts: u64,
    level: Level,
    completed: bool,
    events: Vec<GameEvent>,
}

impl Game {
    /// Start at the first level of `pack`
    pub fn new(pack: LevelPack, physics: Physics, seed: u64) -> Result<Self, LevelError> {
        pack.validate()?;
        physics.validate()?;
        let level = Self::build_level(&pack, 0, physics, seed)?;
        log::info!("Starting game: {} levels, seed {}", pack.len(), seed);
        Ok(Self {
            pack,
            physics,
            seed,
            attempts: 1,
            level,
            completed: false,
            events: Vec::new(),
        })
    }

    fn build_level(
        pack: &LevelPack,
        index: usize,
        physics: Physics,
        seed: u64,
    ) -> Result<Level, LevelError> {
        let plan = pack.get(index).ok_or(LevelError::EmptyPack)?;
        plan.build(index, seed, physics)
    }

    /// Replace the current level with a fresh copy of level `index`
    pub fn start_level(&mut self, index: usize) -> Result<(), LevelError> {
        let seed = self.seed.wrapping_add(self.attempts);
        self.level = Self::build_level(&self.pack, index, self.physics, seed)?;
        self.attempts += 1;
        self.completed = false;
        log::info!("Level {} of {}", index + 1, self.pack.len());
        Ok(())
    }

    /// Advance by one animation frame of `elapsed` seconds
    ///
    /// Long frames (a backgrounded tab, a debugger pause) are clamped to
    /// `MAX_FRAME_SECS`.
    pub fn frame(&mut self, elapsed: f32, keys: &KeyState) -> Result<GameProgress, LevelError> {
        if self.completed {
            return Ok(GameProgress::Completed);
        }

        let step = if elapsed.is_finite() {
            elapsed.clamp(0.0, MAX_FRAME_SECS)
        } else {
            0.0
        };
        self.level.animate(step, keys);
        self.events.extend(self.level.drain_events());

        if !self.level.is_finished() {
            return Ok(GameProgress::Playing);
        }

        let index = self.level.number;
        match self.level.status() {
            LevelStatus::Lost => {
                self.start_level(index)?;
                Ok(GameProgress::LevelRestarted(index))
            }
            LevelStatus::Won if index + 1 < self.pack.len() => {
                self.start_level(index + 1)?;
                Ok(GameProgress::LevelAdvanced(index + 1))
            }
            LevelStatus::Won => {
                log::info!("All {} levels won", self.pack.len());
                self.completed = true;
                Ok(GameProgress::Completed)
            }
            LevelStatus::Playing => Ok(GameProgress::Playing),
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    pub fn level_count(&self) -> usize {
        self.pack.len()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// The win message once the game is completed
    pub fn win_message(&self) -> Option<&'static str> {
        self.completed.then_some(WIN_MESSAGE)
    }

    /// Take the simulation events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
