//! Players, boosts and pass-through event state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{BoostId, Fleet, Levels, PlayerId, ResearchType, ResourceKind, ShipType, Timestamp};

/// Kinds of boosts a player can own or have active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoostKind {
    /// Level is the number of parallel queues.
    ExtraBuildQueue,
    /// Level is the production percentage bonus.
    ResourceProductionBoost,
    /// Level is added to weapon technology.
    CombatTechBoost,
    /// Level is added to armor technology.
    ArmorTechBoost,
    /// Level is the fleet speed percentage bonus.
    DriveTechBoost,
    /// Level is the construction cost percentage reduction.
    ConstructionCostReduction,
    /// Level is the construction time reduction.
    ConstructionTimeReduction,
    /// Level is the protected storage percentage.
    StorageProtectionBoost,
    /// Reveals sector activity.
    SectorActivityScan,
    /// Loot from an abandoned colony.
    AbandonedColonyLoot,
}

/// An owned, not yet activated boost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boost {
    /// Boost id.
    pub id: BoostId,
    /// Boost kind.
    #[serde(rename = "type")]
    pub kind: BoostKind,
    /// Kind-specific strength.
    pub level: u32,
    /// Duration once activated, in seconds.
    pub duration: u64,
}

/// A boost currently in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveBoost {
    /// Kind-specific strength.
    #[serde(default)]
    pub level: u32,
    /// Expiry time.
    pub end_time: Timestamp,
}

/// Active boosts by kind.
///
/// Activation is handled by an external collaborator; the engine only reads
/// the result and ignores expired entries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveBoosts(BTreeMap<BoostKind, ActiveBoost>);

impl ActiveBoosts {
    /// No boosts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The boost of `kind` if present and unexpired at `now`.
    #[must_use]
    pub fn active(&self, kind: BoostKind, now: Timestamp) -> Option<ActiveBoost> {
        self.0
            .get(&kind)
            .copied()
            .filter(|boost| boost.end_time > now)
    }

    /// Level of the active boost of `kind`, or 0.
    #[must_use]
    pub fn level(&self, kind: BoostKind, now: Timestamp) -> u32 {
        self.active(kind, now).map_or(0, |boost| boost.level)
    }

    /// Record an activated boost.
    pub fn insert(&mut self, kind: BoostKind, boost: ActiveBoost) {
        self.0.insert(kind, boost);
    }
}

/// Owned boosts waiting to be activated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Inventory {
    /// Boosts in the order they were obtained.
    pub boosts: Vec<Boost>,
}

/// Temporary production multiplier on one resource.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceVeinBonus {
    /// Whether the vein event is running.
    pub active: bool,
    /// Resource the vein multiplies.
    pub resource_type: Option<ResourceKind>,
    /// Expiry time.
    pub end_time: Timestamp,
    /// Production multiplier.
    pub bonus_multiplier: f64,
}

impl Default for ResourceVeinBonus {
    fn default() -> Self {
        Self {
            active: false,
            resource_type: None,
            end_time: 0,
            bonus_multiplier: 1.0,
        }
    }
}

impl ResourceVeinBonus {
    /// Multiplier for `kind` at `now` (1.0 when inactive or expired).
    #[must_use]
    pub fn multiplier_for(&self, kind: ResourceKind, now: Timestamp) -> f64 {
        if self.active && self.end_time > now && self.resource_type == Some(kind) {
            self.bonus_multiplier
        } else {
            1.0
        }
    }
}

/// Travelling merchant state. Trading rules are external.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantState {
    /// `INACTIVE`, `INCOMING` or `ACTIVE`.
    pub status: String,
    /// Arrival time.
    pub arrival_time: Timestamp,
    /// Departure time.
    pub departure_time: Timestamp,
}

/// Pirate mercenary offer. Hiring rules are external.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PirateMercenaryState {
    /// `INACTIVE`, `INCOMING`, `AVAILABLE` or `DEPARTED`.
    pub status: String,
    /// Offered fleet.
    pub fleet: Fleet,
    /// Hire price in credits.
    pub hire_cost: f64,
    /// Arrival time.
    pub arrival_time: Timestamp,
    /// Departure time.
    pub departure_time: Timestamp,
}

/// Ancient artifact event state. Choice resolution is external.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AncientArtifactState {
    /// `INACTIVE` or `AWAITING_CHOICE`.
    pub status: String,
}

/// Space plague event state. Infection rules are external.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacePlagueState {
    /// Whether the plague is running.
    pub active: bool,
    /// Ship class affected.
    pub infected_ship: Option<ShipType>,
    /// Expiry time.
    pub end_time: Timestamp,
}

/// A player account's game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Player id.
    pub id: PlayerId,
    /// Display name used in reports.
    pub username: String,
    /// Research levels, shared by all planets.
    pub research: Levels<ResearchType>,
    /// Per-ship-class upgrade levels (+10% attack, shield and hull each).
    pub ship_levels: Levels<ShipType>,
    /// Premium currency.
    pub credits: f64,
    /// Owned boosts.
    pub inventory: Inventory,
    /// Boosts in effect.
    pub active_boosts: ActiveBoosts,
    /// Score derived at the end of each pass.
    pub points: f64,
    /// Last time a pass ran for this player.
    pub last_activity: Timestamp,
    /// Resource vein event.
    #[serde(default)]
    pub resource_vein_bonus: ResourceVeinBonus,
    /// Merchant event (pass-through).
    #[serde(default)]
    pub merchant_state: MerchantState,
    /// Pirate mercenary event (pass-through).
    #[serde(default)]
    pub pirate_mercenary_state: PirateMercenaryState,
    /// Ancient artifact event (pass-through).
    #[serde(default)]
    pub ancient_artifact_state: AncientArtifactState,
    /// Space plague event (pass-through).
    #[serde(default)]
    pub space_plague: SpacePlagueState,
}

impl Player {
    /// Create a new player with no research and no credits.
    #[must_use]
    pub fn new(id: PlayerId, username: impl Into<String>, now: Timestamp) -> Self {
        Self {
            id,
            username: username.into(),
            research: Levels::new(),
            ship_levels: Levels::new(),
            credits: 0.0,
            inventory: Inventory::default(),
            active_boosts: ActiveBoosts::new(),
            points: 0.0,
            last_activity: now,
            resource_vein_bonus: ResourceVeinBonus::default(),
            merchant_state: MerchantState::default(),
            pirate_mercenary_state: PirateMercenaryState::default(),
            ancient_artifact_state: AncientArtifactState::default(),
            space_plague: SpacePlagueState::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_boosts_are_ignored() {
        let mut boosts = ActiveBoosts::new();
        boosts.insert(
            BoostKind::DriveTechBoost,
            ActiveBoost {
                level: 20,
                end_time: 100,
            },
        );
        assert_eq!(boosts.level(BoostKind::DriveTechBoost, 99), 20);
        assert_eq!(boosts.level(BoostKind::DriveTechBoost, 100), 0);
        assert!(boosts.active(BoostKind::CombatTechBoost, 0).is_none());
    }

    #[test]
    fn test_vein_targets_single_resource() {
        let vein = ResourceVeinBonus {
            active: true,
            resource_type: Some(ResourceKind::Crystal),
            end_time: 50,
            bonus_multiplier: 1.5,
        };
        assert_eq!(vein.multiplier_for(ResourceKind::Crystal, 10), 1.5);
        assert_eq!(vein.multiplier_for(ResourceKind::Metal, 10), 1.0);
        assert_eq!(vein.multiplier_for(ResourceKind::Crystal, 50), 1.0);
    }
}
