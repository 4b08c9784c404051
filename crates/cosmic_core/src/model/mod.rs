//! Persisted record types.
//!
//! The serde shape of these types is the wire format returned to clients:
//! field names are camelCase, object ids are SCREAMING_SNAKE_CASE strings,
//! times are whole seconds and resource amounts are floating point.

mod coords;
mod counts;
mod ids;
mod message;
mod mission;
mod objects;
mod planet;
mod player;
mod resources;

pub use coords::Coordinates;
pub use counts::{Defenses, Fleet, Levels, UnitCounts};
pub use ids::{BoostId, MessageId, MissionId, PlanetId, PlayerId};
pub use message::{
    BattleMessageBody, BattleReport, ColonizationMessage, EspionageEventMessage, ExpeditionDetails,
    ExpeditionMessage, ExplorationDetails, ExplorationMessage, Message, MessageBody, SpyMessage,
    SpyReport,
};
pub use mission::{FleetMission, Loot, MissionType};
pub use objects::{BuildingType, DefenseType, ObjectId, ObjectKind, ResearchType, ShipType};
pub use planet::{Planet, QueueItem, QueueKind};
pub use player::{
    ActiveBoost, ActiveBoosts, AncientArtifactState, Boost, BoostKind, Inventory, MerchantState,
    PirateMercenaryState, Player, ResourceVeinBonus, SpacePlagueState,
};
pub use resources::{ResourceKind, Resources};

/// Seconds since the Unix epoch.
pub type Timestamp = u64;
