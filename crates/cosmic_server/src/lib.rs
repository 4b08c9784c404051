//! # Cosmic Server
//!
//! Orchestration around the deterministic core.
//!
//! Owns the storage boundary, makes sure only one reconciliation pass runs
//! per player at a time, and sweeps idle players on a timer. Everything
//! that decides game outcomes lives in `cosmic_core`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod locks;
pub mod reconciler;
pub mod store;
pub mod sweep;

use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use cosmic_core::config::{ConfigError, EngineConfig};
use cosmic_core::model::Timestamp;
use cosmic_core::world::World;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use reconciler::Reconciler;
pub use store::{GameStore, MemoryStore};

/// Errors starting the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Bad server configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// World snapshot could not be read.
    #[error("Failed to read world snapshot: {0}")]
    WorldRead(#[from] std::io::Error),
    /// World snapshot could not be parsed.
    #[error("Failed to parse world snapshot: {0}")]
    WorldParse(#[from] ron::error::SpannedError),
}

/// Load a world snapshot from RON.
pub fn load_world<P: AsRef<Path>>(path: P) -> Result<World, ServerError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(ron::from_str(&contents)?)
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Seconds between idle sweeps.
    pub sweep_interval_secs: u64,
    /// Players inactive for at least this long are swept.
    pub idle_threshold_secs: u64,
    /// Wait before retrying a pass that lost the player lock.
    pub conflict_retry_delay_ms: u64,
    /// Game balance.
    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 15,
            idle_threshold_secs: 300,
            conflict_retry_delay_ms: 50,
            engine: EngineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string. Missing fields take their default.
    pub fn from_ron_str(ron: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(ron)?)
    }

    /// Sweep period.
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Lock retry delay.
    #[must_use]
    pub const fn conflict_retry_delay(&self) -> Duration {
        Duration::from_millis(self.conflict_retry_delay_ms)
    }
}

/// Wall-clock seconds since the Unix epoch.
#[must_use]
pub fn unix_now() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}
