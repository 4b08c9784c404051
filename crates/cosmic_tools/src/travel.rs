//! Travel planner.

use cosmic_core::catalog::Catalog;
use cosmic_core::fleet::TravelPlan;
use cosmic_core::model::{ActiveBoosts, Coordinates, Fleet, Levels, ResearchType, ShipType};

use crate::ToolError;

/// Parse `LIGHT_FIGHTER=10,CARGO_SHIP=2`.
pub fn parse_ships(list: &str) -> Result<Fleet, ToolError> {
    let invalid = || ToolError::InvalidShips(list.to_string());
    let mut fleet = Fleet::new();
    for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, count) = entry.split_once('=').ok_or_else(invalid)?;
        let ship: ShipType = name.trim().parse()?;
        let count: u64 = count.trim().parse().map_err(|_| invalid())?;
        fleet.add(ship, count);
    }
    if fleet.is_empty() {
        return Err(invalid());
    }
    Ok(fleet)
}

/// Plan a flight with the given drive research levels.
pub fn plan(
    catalog: &Catalog,
    fleet: &Fleet,
    from: Coordinates,
    to: Coordinates,
    drives: &[(ResearchType, u32)],
) -> Result<TravelPlan, ToolError> {
    let research: Levels<ResearchType> = drives.iter().copied().collect();
    Ok(TravelPlan::compute(
        catalog,
        fleet,
        from,
        to,
        &research,
        &ActiveBoosts::new(),
        0,
    )?)
}
