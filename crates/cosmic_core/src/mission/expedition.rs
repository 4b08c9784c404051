//! Deep-space expedition outcomes.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::outcome::WeightedTable;
use crate::catalog::Catalog;
use crate::error::Result;
use crate::model::{ExpeditionDetails, Fleet, Resources, ShipType};

/// What an expedition ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpeditionOutcome {
    /// Nothing happened.
    Nothing,
    /// Resources scaled by fleet power.
    FindResources,
    /// Abandoned ships joined the fleet.
    FindFleet,
    /// Pirates destroyed up to 20% of each ship type.
    Pirates,
    /// The fleet was held up.
    Delay,
    /// Aliens destroyed up to 50% of each ship type.
    Aliens,
    /// Credits scaled by fleet power.
    FindMoney,
    /// The whole fleet vanished.
    Lost,
}

/// Outcome weights.
pub static EXPEDITION_TABLE: WeightedTable<ExpeditionOutcome> = WeightedTable::new(&[
    (ExpeditionOutcome::Nothing, 30),
    (ExpeditionOutcome::FindResources, 25),
    (ExpeditionOutcome::FindFleet, 15),
    (ExpeditionOutcome::Pirates, 10),
    (ExpeditionOutcome::Delay, 10),
    (ExpeditionOutcome::Aliens, 5),
    (ExpeditionOutcome::FindMoney, 4),
    (ExpeditionOutcome::Lost, 1),
]);

/// Shortest extra hold on a delay, in seconds.
pub const MIN_DELAY_SECS: u64 = 600;

/// Span of the random part of a delay, in seconds.
pub const DELAY_SPAN_SECS: u64 = 3600;

/// Result of one expedition.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpeditionResult {
    /// Outcome drawn.
    pub outcome: ExpeditionOutcome,
    /// Fleet that continues home.
    pub fleet_after: Fleet,
    /// Report payload.
    pub details: ExpeditionDetails,
}

/// Aggregate strength used to scale finds: `Σ (attack + shield + hull / 10) * count`.
pub fn fleet_power(catalog: &Catalog, fleet: &Fleet) -> Result<f64> {
    fleet.iter().try_fold(0.0, |power, (ship, count)| {
        let combat = catalog.ship(ship)?.combat;
        Ok(power + (combat.attack + combat.shield + combat.hull / 10.0) * count as f64)
    })
}

/// Remove up to `max_fraction` of each ship type, one draw per type.
pub(crate) fn attrition(fleet: &Fleet, max_fraction: f64, rng: &mut impl Rng) -> (Fleet, Fleet) {
    let mut after = Fleet::new();
    let mut lost = Fleet::new();
    for (ship, count) in fleet.iter() {
        let gone = (count as f64 * max_fraction * rng.gen::<f64>()).floor() as u64;
        let gone = gone.min(count);
        lost.add(ship, gone);
        after.add(ship, count - gone);
    }
    (after, lost)
}

/// Draw and apply an expedition outcome.
pub fn resolve_expedition(
    catalog: &Catalog,
    fleet: &Fleet,
    rng: &mut impl Rng,
) -> Result<ExpeditionResult> {
    resolve_with(catalog, fleet, EXPEDITION_TABLE.draw(rng), rng)
}

/// Apply a given expedition outcome.
pub fn resolve_with(
    catalog: &Catalog,
    fleet: &Fleet,
    outcome: ExpeditionOutcome,
    rng: &mut impl Rng,
) -> Result<ExpeditionResult> {
    let power = fleet_power(catalog, fleet)?;
    let mut fleet_after = fleet.clone();
    let mut details = ExpeditionDetails {
        fleet_sent: fleet.clone(),
        resources_gained: None,
        credits_gained: None,
        fleet_gained: None,
        fleet_lost: None,
        delay_seconds: None,
    };

    match outcome {
        ExpeditionOutcome::Nothing => {}
        ExpeditionOutcome::FindResources => {
            let mut share = |factor: f64| (rng.gen::<f64>() * power * factor).floor();
            details.resources_gained = Some(Resources::new(share(0.5), share(0.3), share(0.1)));
        }
        ExpeditionOutcome::FindMoney => {
            details.credits_gained = Some((rng.gen::<f64>() * power * 2.0).floor());
        }
        ExpeditionOutcome::FindFleet => {
            let (ship, amount) = if rng.gen_bool(0.5) {
                let attack = catalog.ship(ShipType::LightFighter)?.combat.attack;
                (ShipType::LightFighter, power / attack / 10.0)
            } else {
                let cargo = catalog.ship(ShipType::CargoShip)?.cargo_capacity;
                (ShipType::CargoShip, power / cargo / 5.0)
            };
            let amount = (amount.floor() as u64).max(1);
            fleet_after.add(ship, amount);
            details.fleet_gained = Some([(ship, amount)].into_iter().collect());
        }
        ExpeditionOutcome::Pirates | ExpeditionOutcome::Aliens => {
            let fraction = if outcome == ExpeditionOutcome::Pirates {
                0.2
            } else {
                0.5
            };
            let (after, lost) = attrition(fleet, fraction, rng);
            fleet_after = after;
            details.fleet_lost = Some(lost);
        }
        ExpeditionOutcome::Delay => {
            details.delay_seconds = Some(MIN_DELAY_SECS + rng.gen_range(0..DELAY_SPAN_SECS));
        }
        ExpeditionOutcome::Lost => {
            details.fleet_lost = Some(fleet.clone());
            fleet_after = Fleet::new();
        }
    }

    Ok(ExpeditionResult {
        outcome,
        fleet_after,
        details,
    })
}
