//! Planets and their construction queues.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{BuildingType, Coordinates, Defenses, Fleet, Levels, ObjectId, PlanetId, PlayerId};
use super::{Resources, Timestamp};

/// What a queue item produces when it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    /// Raises a planet building to the target level.
    Building,
    /// Raises a player research to the target level.
    Research,
    /// Adds the target amount of ships to the planet fleet.
    Ship,
    /// Adds the target amount of defenses to the planet.
    Defense,
    /// Raises a player-wide ship upgrade to the target level.
    ShipUpgrade,
}

impl QueueKind {
    /// Whether `target_level_or_amount` is a level (as opposed to a quantity).
    #[must_use]
    pub const fn is_level(self) -> bool {
        matches!(self, Self::Building | Self::Research | Self::ShipUpgrade)
    }
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Building => "building",
            Self::Research => "research",
            Self::Ship => "ship",
            Self::Defense => "defense",
            Self::ShipUpgrade => "ship_upgrade",
        })
    }
}

/// One pending construction, research or production order.
///
/// Immutable once enqueued and removed only when it completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    /// Object being built or researched.
    #[serde(rename = "id")]
    pub object_id: ObjectId,
    /// Queue kind.
    #[serde(rename = "type")]
    pub kind: QueueKind,
    /// Resulting level for level kinds; produced quantity for ships/defenses.
    #[serde(rename = "levelOrAmount")]
    pub target_level_or_amount: u64,
    /// Total duration in seconds.
    pub build_time: u64,
    /// When work on this item starts.
    pub start_time: Timestamp,
    /// When this item completes.
    pub end_time: Timestamp,
}

impl QueueItem {
    /// Whether this item has completed as of `now`.
    #[must_use]
    pub const fn is_complete(&self, now: Timestamp) -> bool {
        self.end_time <= now
    }
}

/// A planet, owned exclusively by one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planet {
    /// Planet id.
    pub id: PlanetId,
    /// Owning player.
    #[serde(rename = "userId")]
    pub owner: PlayerId,
    /// Display name.
    pub name: String,
    /// Unique slot in the galaxy.
    pub coordinates: Coordinates,
    /// The first planet a player owns.
    pub is_homeworld: bool,
    /// Current stockpile, never above capacity through accrual.
    pub resources: Resources,
    /// Building levels.
    pub buildings: Levels<BuildingType>,
    /// Stationed ships.
    pub fleet: Fleet,
    /// Planetary defenses.
    pub defenses: Defenses,
    /// Pending orders, ordered by `end_time`.
    pub build_queue: Vec<QueueItem>,
    /// Last time resources and queue were advanced.
    pub last_resource_update: Timestamp,
}

impl Planet {
    /// Create a fresh planet with the given starting stock.
    #[must_use]
    pub fn new(
        id: PlanetId,
        owner: PlayerId,
        name: impl Into<String>,
        coordinates: Coordinates,
        is_homeworld: bool,
        resources: Resources,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            owner,
            name: name.into(),
            coordinates,
            is_homeworld,
            resources,
            buildings: Levels::new(),
            fleet: Fleet::new(),
            defenses: Defenses::new(),
            build_queue: Vec::new(),
            last_resource_update: now,
        }
    }

    /// End time of the last queued item, if any.
    #[must_use]
    pub fn queue_end(&self) -> Option<Timestamp> {
        self.build_queue.last().map(|item| item.end_time)
    }

    /// Highest level already pending in this queue for a level-kind object.
    #[must_use]
    pub fn pending_level(&self, object_id: ObjectId, kind: QueueKind) -> Option<u32> {
        self.build_queue
            .iter()
            .filter(|item| item.kind == kind && item.object_id == object_id)
            .map(|item| u32::try_from(item.target_level_or_amount).unwrap_or(u32::MAX))
            .max()
    }
}
