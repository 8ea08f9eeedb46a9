//! Engine settings
//!
//! Tunables for a match. Missing fields in a settings file fall back to the
//! defaults, so a file only needs to name what it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::FiringModel;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Starting time on each player's clock, in seconds
    pub initial_time_secs: u32,
    /// Wall time per clock tick
    pub tick_period_ms: u64,
    /// Delay between replayed bullet steps (presentation only)
    pub bullet_step_ms: u64,
    /// Which way cannons shoot
    pub firing_model: FiringModel,
    /// Also fire the mover's cannon after every accepted move (off: cannons
    /// only fire through the `Fire` intent)
    pub auto_fire: bool,
    /// Allow moving onto an opposing piece to capture it
    pub capture_on_move: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_time_secs: DEFAULT_INITIAL_TIME_SECS,
            tick_period_ms: TICK_PERIOD_MS,
            bullet_step_ms: BULLET_STEP_MS,
            firing_model: FiringModel::AllDirections,
            auto_fire: false,
            capture_on_move: false,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.initial_time_secs == 0 {
            return Err(SettingsError::Invalid("initial_time_secs must be positive"));
        }
        if self.tick_period_ms == 0 {
            return Err(SettingsError::Invalid("tick_period_ms must be positive"));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let settings = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
