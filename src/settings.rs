//! Game settings and physics tuning
//!
//! Loaded from a JSON file natively and from LocalStorage in the browser.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{PhysicsError, SettingsError};

/// Physics constants used by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    /// Largest simulated slice of time in seconds
    pub max_step: f32,
    /// Horizontal player speed (tiles/s)
    pub player_x_speed: f32,
    /// Downward acceleration (tiles/s²)
    pub gravity: f32,
    /// Upward speed given by a jump (tiles/s)
    pub jump_speed: f32,
    /// Coin wobble phase speed (radians/s)
    pub wobble_speed: f32,
    /// Coin wobble amplitude (tiles)
    pub wobble_dist: f32,
    /// Seconds a won or lost level keeps running before it is finished
    pub finish_delay: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            max_step: MAX_STEP,
            player_x_speed: PLAYER_X_SPEED,
            gravity: GRAVITY,
            jump_speed: JUMP_SPEED,
            wobble_speed: WOBBLE_SPEED,
            wobble_dist: WOBBLE_DIST,
            finish_delay: FINISH_DELAY,
        }
    }
}

impl Physics {
    /// Reject tuning that would stall or break the step loop
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !(self.max_step.is_finite() && self.max_step >= MIN_STEP) {
            return Err(PhysicsError::StepOutOfRange {
                min: MIN_STEP,
                found: self.max_step,
            });
        }
        if !(self.finish_delay.is_finite() && self.finish_delay >= 0.0) {
            return Err(PhysicsError::BadFinishDelay(self.finish_delay));
        }
        Ok(())
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation tuning
    pub physics: Physics,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Input ===
    /// Map touches around the player onto movement keys
    pub touch_controls: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            physics: Physics::default(),
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            touch_controls: true,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.physics.validate()?;
        for (name, vol) in [
            ("master_volume", self.master_volume),
            ("sfx_volume", self.sfx_volume),
        ] {
            if !(0.0..=1.0).contains(&vol) {
                return Err(SettingsError::Invalid(format!(
                    "{name} must be within 0.0..=1.0, got {vol}"
                )));
            }
        }
        Ok(())
    }

    /// Effective sound effect volume (respects mute)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "dark_blue_settings";

    #[cfg(target_arch = "wasm32")]
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// Stored settings, or defaults when absent or unreadable
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = Self::storage().and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten());
        let Some(json) = stored else {
            log::info!("No stored settings, using defaults");
            return Self::default();
        };
        Self::from_json(&json).unwrap_or_else(|e| {
            log::warn!("Discarding stored settings: {e}");
            Self::default()
        })
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = Self::storage() else {
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) if storage.set_item(Self::STORAGE_KEY, &json).is_ok() => {
                log::debug!("Settings stored");
            }
            Ok(_) => log::warn!("LocalStorage refused settings"),
            Err(e) => log::warn!("Cannot encode settings: {e}"),
        }
    }
}
