//! Engine tuning constants.
//!
//! Balance values are configuration rather than code so operators can load
//! them from RON. The defaults are the live game values.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Resources;

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read file.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] ron::error::SpannedError),
}

/// Size of the universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalaxyBounds {
    /// Number of galaxies.
    pub galaxies: u32,
    /// Systems per galaxy.
    pub systems_per_galaxy: u32,
    /// Planet slots per system.
    pub positions_per_system: u32,
}

impl Default for GalaxyBounds {
    fn default() -> Self {
        Self {
            galaxies: 9,
            systems_per_galaxy: 499,
            positions_per_system: 15,
        }
    }
}

/// Espionage detection model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpyModel {
    /// Detection chance at equal spy technology.
    pub base_detection: f64,
    /// Detection chance removed per level of advantage.
    pub detection_per_level: f64,
    /// Floor of the detection chance.
    pub min_detection: f64,
    /// Probes lost when detected.
    pub probes_lost_on_detection: u64,
    /// Chance a detected mission still returns data, at equal technology.
    pub base_survival: f64,
    /// Survival chance added per level of advantage.
    pub survival_per_level: f64,
}

impl Default for SpyModel {
    fn default() -> Self {
        Self {
            base_detection: 0.5,
            detection_per_level: 0.1,
            min_detection: 0.1,
            probes_lost_on_detection: 1,
            base_survival: 0.5,
            survival_per_level: 0.05,
        }
    }
}

/// All balance constants used by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum combat rounds per battle.
    pub combat_rounds: u32,
    /// Fraction of unprotected resources an attacker may carry off.
    pub loot_ratio: f64,
    /// Fraction of storage capacity that cannot be looted.
    pub protected_resources_factor: f64,
    /// Fraction of destroyed unit cost that becomes debris.
    pub debris_recovery_rate: f64,
    /// Capacity of a resource without a storage curve.
    pub base_storage_capacity: f64,
    /// Per-colony hourly income credited to the homeworld.
    pub colony_income_per_hour: Resources,
    /// Starting stock of new planets.
    pub initial_resources: Resources,
    /// Stay at the target for expeditions, in seconds.
    pub expedition_hold_secs: u64,
    /// Stay at the target for explorations, in seconds.
    pub exploration_hold_secs: u64,
    /// Universe size.
    pub galaxy: GalaxyBounds,
    /// Espionage model.
    pub spy: SpyModel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            combat_rounds: 6,
            loot_ratio: 0.5,
            protected_resources_factor: 0.1,
            debris_recovery_rate: 0.3,
            base_storage_capacity: 10_000.0,
            colony_income_per_hour: Resources::new(100.0, 50.0, 20.0),
            initial_resources: Resources::new(500.0, 500.0, 0.0),
            expedition_hold_secs: 3600,
            exploration_hold_secs: 1800,
            galaxy: GalaxyBounds::default(),
            spy: SpyModel::default(),
        }
    }
}

impl EngineConfig {
    /// Load from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string. Missing fields take their default.
    pub fn from_ron_str(ron: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(ron)?)
    }

    /// Hold time at the target for a mission type that lingers there.
    #[must_use]
    pub const fn hold_secs(&self, mission_type: crate::model::MissionType) -> u64 {
        match mission_type {
            crate::model::MissionType::Expedition => self.expedition_hold_secs,
            crate::model::MissionType::Explore => self.exploration_hold_secs,
            _ => 0,
        }
    }
}
