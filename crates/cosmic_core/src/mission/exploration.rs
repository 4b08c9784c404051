//! Area exploration outcomes.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::expedition::{attrition, fleet_power};
use super::outcome::WeightedTable;
use crate::catalog::Catalog;
use crate::error::Result;
use crate::model::{BoostKind, Coordinates, ExplorationDetails, Fleet, Resources, ShipType};

/// What an exploration found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExplorationOutcome {
    /// Nothing of note.
    Nothing,
    /// Metal and crystal.
    FindResources,
    /// A wreck with salvageable ships.
    FindShipWreck,
    /// Hostiles destroyed up to 15% of each ship type.
    Hostiles,
    /// A boost, delivered to the inventory when the fleet returns.
    FindBoost,
}

/// Outcome weights.
pub static EXPLORATION_TABLE: WeightedTable<ExplorationOutcome> = WeightedTable::new(&[
    (ExplorationOutcome::Nothing, 40),
    (ExplorationOutcome::FindResources, 25),
    (ExplorationOutcome::FindShipWreck, 15),
    (ExplorationOutcome::Hostiles, 15),
    (ExplorationOutcome::FindBoost, 5),
]);

/// A boost that can be found, before it gets an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoostDraw {
    /// Kind.
    pub kind: BoostKind,
    /// Kind-specific strength.
    pub level: u32,
    /// Duration once activated, in seconds.
    pub duration: u64,
}

const fn boost(kind: BoostKind, level: u32, duration: u64) -> BoostDraw {
    BoostDraw {
        kind,
        level,
        duration,
    }
}

/// Boost weights.
pub static BOOST_TABLE: WeightedTable<BoostDraw> = WeightedTable::new(&[
    (boost(BoostKind::ResourceProductionBoost, 20, 86_400), 30),
    (boost(BoostKind::CombatTechBoost, 1, 3600), 20),
    (boost(BoostKind::ArmorTechBoost, 1, 3600), 20),
    (boost(BoostKind::DriveTechBoost, 20, 3600), 15),
    (boost(BoostKind::ExtraBuildQueue, 2, 86_400), 10),
    (boost(BoostKind::SectorActivityScan, 1, 7200), 5),
]);

/// Result of one exploration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorationResult {
    /// Outcome drawn.
    pub outcome: ExplorationOutcome,
    /// Fleet that continues home.
    pub fleet_after: Fleet,
    /// Boost found, if any. The caller assigns its id.
    pub boost: Option<BoostDraw>,
    /// Report payload (without the boost).
    pub details: ExplorationDetails,
}

/// Draw and apply an exploration outcome.
pub fn resolve_exploration(
    catalog: &Catalog,
    fleet: &Fleet,
    target: Coordinates,
    rng: &mut impl Rng,
) -> Result<ExplorationResult> {
    let outcome = EXPLORATION_TABLE.draw(rng);
    resolve_with(catalog, fleet, target, outcome, rng)
}

/// Apply a given exploration outcome.
pub fn resolve_with(
    catalog: &Catalog,
    fleet: &Fleet,
    target: Coordinates,
    outcome: ExplorationOutcome,
    rng: &mut impl Rng,
) -> Result<ExplorationResult> {
    let power = fleet_power(catalog, fleet)?;
    let mut fleet_after = fleet.clone();
    let mut found = None;
    let mut details = ExplorationDetails {
        target_coords: target,
        found_boost: None,
        resources_gained: None,
        fleet_lost: None,
        fleet_gained: None,
    };

    match outcome {
        ExplorationOutcome::Nothing => {}
        ExplorationOutcome::FindResources => {
            let metal = (rng.gen::<f64>() * power * 0.2).floor();
            let crystal = (rng.gen::<f64>() * power * 0.1).floor();
            details.resources_gained = Some(Resources::new(metal, crystal, 0.0));
        }
        ExplorationOutcome::FindShipWreck => {
            let ship = if rng.gen_bool(0.7) {
                ShipType::LightFighter
            } else {
                ShipType::CargoShip
            };
            let hull = catalog.ship(ship)?.combat.hull;
            let amount = ((power / (hull / 100.0)).floor() as u64).max(1);
            fleet_after.add(ship, amount);
            details.fleet_gained = Some([(ship, amount)].into_iter().collect());
        }
        ExplorationOutcome::Hostiles => {
            let (after, lost) = attrition(fleet, 0.15, rng);
            fleet_after = after;
            details.fleet_lost = Some(lost);
        }
        ExplorationOutcome::FindBoost => {
            found = Some(BOOST_TABLE.draw(rng));
        }
    }

    Ok(ExplorationResult {
        outcome,
        fleet_after,
        boost: found,
        details,
    })
}
