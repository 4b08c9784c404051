//! # Cosmic Core
//!
//! Deterministic simulation core for the Cosmic Lord empire game.
//!
//! This crate contains **only** deterministic logic:
//! - No storage or network IO
//! - No wall clock (every operation takes `now` explicitly)
//! - No system randomness (outcome tables draw from seeded RNGs)
//!
//! State is recomputed from timestamps on every pass instead of being driven
//! by live timers, so a missed sweep only delays observation.
//!
//! ## Crate Structure
//!
//! - [`catalog`] - Static buildable/researchable object definitions
//! - [`production`] - Hourly production and storage capacity
//! - [`queue`] - Construction queue advancement and enqueue planning
//! - [`fleet`] - Distance, speed, travel time and fuel
//! - [`combat`] - Round-based battle resolution with loot and debris
//! - [`mission`] - Fleet mission state machine and arrival effects
//! - [`tick`] - Per-player reconciliation steps
//! - [`world`] - In-memory record tables the engine mutates

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod catalog;
pub mod combat;
pub mod config;
pub mod error;
pub mod fleet;
pub mod mission;
pub mod model;
pub mod points;
pub mod production;
pub mod queue;
pub mod tick;
pub mod world;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{Catalog, GameObject};
    pub use crate::combat::{simulate_combat, CombatInput, CombatOutcome};
    pub use crate::config::EngineConfig;
    pub use crate::error::{ErrorKind, GameError, Result};
    pub use crate::mission::{MissionEngine, MissionPhase, MissionType, SendRequest};
    pub use crate::model::{
        BuildingType, Coordinates, DefenseType, Defenses, Fleet, FleetMission, ObjectId,
        Planet, PlanetId, Player, PlayerId, QueueItem, QueueKind, ResearchType, Resources,
        ShipType, Timestamp,
    };
    pub use crate::tick::run_pass;
    pub use crate::world::World;
}
