//! Simulation settings
//!
//! Persisted as JSON next to the binary or wherever the caller points.
//! Every field has a default, so partial files are fine.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;
use crate::sim::{PhysicsParams, Preset, World};

/// How the headless driver runs the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Seconds of simulated time per frame
    pub dt: f64,
    /// Frames to run before exiting
    pub frames: u64,
    /// Print a snapshot every N frames (0 = only the last frame)
    pub report_every: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            dt: SIM_DT,
            frames: 600,
            report_every: 60,
        }
    }
}

/// Everything needed to build and run a world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub width: f64,
    pub height: f64,
    /// Starting scene
    pub preset: Preset,
    pub physics: PhysicsParams,
    pub driver: DriverConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: AREA_WIDTH,
            height: AREA_HEIGHT,
            preset: Preset::default(),
            physics: PhysicsParams::default(),
            driver: DriverConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parse settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Build the world these settings describe
    pub fn build_world(&self) -> Result<World, SimError> {
        World::from_config(self)
    }
}

impl World {
    /// Create a world from settings (bounds, preset and physics)
    pub fn from_config(config: &SimConfig) -> Result<Self, SimError> {
        Self::with_preset(config.width, config.height, &config.preset)?
            .with_params(config.physics)
    }
}
