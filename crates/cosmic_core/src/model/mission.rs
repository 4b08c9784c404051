//! Fleet mission records.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Boost, Coordinates, Fleet, MissionId, PlayerId, ResourceKind, Resources, Timestamp};

/// What a fleet does when it reaches its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionType {
    /// Fight the planet at the target and carry off loot.
    Attack,
    /// Gather intelligence on the target planet.
    Spy,
    /// Collect debris at the target.
    Harvest,
    /// Venture into deep space; rolls the expedition table.
    Expedition,
    /// Settle an empty slot. Ships are consumed; no return leg.
    Colonize,
    /// Scout an area; rolls the exploration table.
    Explore,
}

impl MissionType {
    /// Whether the mission lingers at the target before returning.
    #[must_use]
    pub const fn holds_at_target(self) -> bool {
        matches!(self, Self::Expedition | Self::Explore)
    }

    /// Whether the fleet flies back after arrival.
    #[must_use]
    pub const fn has_return_leg(self) -> bool {
        !matches!(self, Self::Colonize)
    }
}

impl fmt::Display for MissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Attack => "ATTACK",
            Self::Spy => "SPY",
            Self::Harvest => "HARVEST",
            Self::Expedition => "EXPEDITION",
            Self::Colonize => "COLONIZE",
            Self::Explore => "EXPLORE",
        })
    }
}

/// Resources and credits carried home by a fleet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Loot {
    /// Metal carried.
    pub metal: f64,
    /// Crystal carried.
    pub crystal: f64,
    /// Deuterium carried.
    pub deuterium: f64,
    /// Credits found.
    pub credits: f64,
}

impl Loot {
    /// The resource part of this loot.
    #[must_use]
    pub const fn resources(&self) -> Resources {
        Resources::new(self.metal, self.crystal, self.deuterium)
    }

    /// Add resource amounts to this loot.
    pub fn add_resources(&mut self, gained: &Resources) {
        self.metal += gained.metal;
        self.crystal += gained.crystal;
        self.deuterium += gained.deuterium;
    }

    /// Cargo units occupied (credits weigh nothing).
    #[must_use]
    pub fn cargo_used(&self) -> f64 {
        self.resources().total()
    }

    /// Amount of one resource.
    #[must_use]
    pub const fn get(&self, kind: ResourceKind) -> f64 {
        self.resources().get(kind)
    }
}

/// A fleet dispatched from a planet.
///
/// Created at send time, mutated once at arrival (`processed_arrival`) and
/// deleted at return. Colonize missions are deleted at arrival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetMission {
    /// Mission id.
    pub id: MissionId,
    /// Sending player.
    pub owner_id: PlayerId,
    /// Ships currently travelling. Replaced by survivors after arrival.
    pub fleet: Fleet,
    /// Mission type.
    pub mission_type: MissionType,
    /// Planet the fleet left from and returns to.
    pub origin_coords: Coordinates,
    /// Destination.
    pub target_coords: Coordinates,
    /// Departure time.
    pub start_time: Timestamp,
    /// Arrival at the target.
    pub arrival_time: Timestamp,
    /// Return to the origin.
    pub return_time: Timestamp,
    /// End of the stay at the target (expedition/explore only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exploration_end_time: Option<Timestamp>,
    /// Whether the arrival effect has been applied.
    pub processed_arrival: bool,
    /// Carried resources and credits.
    pub loot: Loot,
    /// Boost found on an exploration, delivered at return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found_boost: Option<Boost>,
}
