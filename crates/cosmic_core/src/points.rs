//! Player score.

use crate::catalog::{Catalog, GameObject};
use crate::error::Result;
use crate::model::{Planet, Player, Resources};

const POINTS_DIVISOR: f64 = 1000.0;

/// Score of a player: the resource value of everything they own, in
/// thousands.
///
/// Research, ship upgrades and buildings count every level up to the
/// current one; ships and defenses count unit cost times count. A ship
/// upgrade level is valued at the ship's unit cost, not at what the upgrade
/// itself cost.
pub fn player_points<'p>(
    catalog: &Catalog,
    player: &Player,
    planets: impl IntoIterator<Item = &'p Planet>,
) -> Result<f64> {
    let mut spent = Resources::ZERO;

    for (research, level) in player.research.iter() {
        let spec = catalog.research(research)?;
        for l in 1..=level {
            spent += spec.cost(l);
        }
    }
    for (ship, level) in player.ship_levels.iter() {
        let spec = catalog.ship(ship)?;
        for l in 1..=level {
            spent += spec.cost(l);
        }
    }

    for planet in planets {
        for (building, level) in planet.buildings.iter() {
            let spec = catalog.building(building)?;
            for l in 1..=level {
                spent += spec.cost(l);
            }
        }
        for (ship, count) in planet.fleet.iter() {
            spent += catalog.ship(ship)?.unit_cost * count as f64;
        }
        for (defense, count) in planet.defenses.iter() {
            spent += catalog.defense(defense)?.unit_cost * count as f64;
        }
    }

    Ok(spent.total() / POINTS_DIVISOR)
}
