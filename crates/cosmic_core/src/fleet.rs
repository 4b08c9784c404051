//! Fleet kinematics: distance, speed, travel time and fuel.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{GameError, Result};
use crate::model::{ActiveBoosts, BoostKind, Coordinates, Fleet, Levels, ResearchType, Timestamp};

/// Distance units between two slots.
///
/// Coarse on purpose: galaxies and systems are measured along one axis and
/// nothing wraps around.
#[must_use]
pub fn distance(a: Coordinates, b: Coordinates) -> u64 {
    if a.galaxy != b.galaxy {
        u64::from(a.galaxy.abs_diff(b.galaxy)) * 20_000
    } else if a.system != b.system {
        u64::from(a.system.abs_diff(b.system)) * 95 + 2700
    } else {
        u64::from(a.position.abs_diff(b.position)) * 5 + 1000
    }
}

/// Speed of a fleet: the slowest present ship type governs.
///
/// Each type flies at `base * (1 + drive_level * bonus)`, times the drive
/// boost while it is active.
pub fn fleet_speed(
    catalog: &Catalog,
    fleet: &Fleet,
    research: &Levels<ResearchType>,
    boosts: &ActiveBoosts,
    now: Timestamp,
) -> Result<f64> {
    let boost = 1.0 + f64::from(boosts.level(BoostKind::DriveTechBoost, now)) / 100.0;
    let mut slowest: Option<f64> = None;
    for (ship, _) in fleet.iter() {
        let spec = catalog.ship(ship)?;
        let level = f64::from(research.get(spec.drive.research()));
        let speed = spec.speed * (1.0 + level * spec.drive.bonus_factor()) * boost;
        slowest = Some(slowest.map_or(speed, |current| current.min(speed)));
    }
    match slowest {
        None => Err(GameError::EmptyFleet),
        Some(speed) if speed <= 0.0 => Err(GameError::NoDrive),
        Some(speed) => Ok(speed),
    }
}

/// One-way flight time in seconds: `round(distance * 10 / speed)`.
#[must_use]
pub fn travel_time(distance: u64, speed: f64) -> u64 {
    (distance as f64 * 10.0 / speed).round() as u64
}

/// Deuterium burned for a one-way flight.
///
/// `round(Σ fuel * count * (d / 35000) * (t * 10 / d)^2) + 1`, so slower
/// flights burn less and every flight burns at least 1.
pub fn fuel_consumption(
    catalog: &Catalog,
    fleet: &Fleet,
    distance: u64,
    travel_time: u64,
) -> Result<f64> {
    let d = distance.max(1) as f64;
    let pace = (travel_time as f64 * 10.0 / d).powi(2);
    let mut total = 0.0;
    for (ship, count) in fleet.iter() {
        let spec = catalog.ship(ship)?;
        total += spec.fuel_consumption * count as f64 * (d / 35_000.0) * pace;
    }
    Ok(total.round() + 1.0)
}

/// Total cargo units a fleet can carry.
pub fn cargo_capacity(catalog: &Catalog, fleet: &Fleet) -> Result<f64> {
    fleet.iter().try_fold(0.0, |sum, (ship, count)| {
        Ok(sum + catalog.ship(ship)?.cargo_capacity * count as f64)
    })
}

/// Kinematics of one flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelPlan {
    /// Distance units.
    pub distance: u64,
    /// Fleet speed.
    pub speed: f64,
    /// One-way time in seconds.
    pub travel_time: u64,
    /// Deuterium needed.
    pub fuel: f64,
}

impl TravelPlan {
    /// Plan a flight between two slots.
    pub fn compute(
        catalog: &Catalog,
        fleet: &Fleet,
        from: Coordinates,
        to: Coordinates,
        research: &Levels<ResearchType>,
        boosts: &ActiveBoosts,
        now: Timestamp,
    ) -> Result<Self> {
        let distance = distance(from, to);
        let speed = fleet_speed(catalog, fleet, research, boosts, now)?;
        let travel_time = travel_time(distance, speed);
        let fuel = fuel_consumption(catalog, fleet, distance, travel_time)?;
        Ok(Self {
            distance,
            speed,
            travel_time,
            fuel,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActiveBoost, ShipType};

    #[test]
    fn test_distance_tiers() {
        let home = Coordinates::new(1, 10, 4);
        assert_eq!(distance(home, Coordinates::new(1, 10, 7)), 1015);
        assert_eq!(distance(home, Coordinates::new(1, 12, 4)), 2890);
        assert_eq!(distance(home, Coordinates::new(3, 10, 4)), 40_000);
        assert_eq!(distance(home, home), 1000);
    }

    #[test]
    fn test_slowest_ship_governs() {
        let catalog = Catalog::standard();
        let fleet: Fleet = [(ShipType::LightFighter, 5), (ShipType::CargoShip, 2)]
            .into_iter()
            .collect();
        let mut research = Levels::new();
        research.set(ResearchType::CombustionDrive, 2);
        let speed = fleet_speed(&catalog, &fleet, &research, &ActiveBoosts::new(), 0).unwrap();
        assert!((speed - 6000.0).abs() < 1e-9);
    }

    #[test]
    fn test_drive_boost_applies_until_expiry() {
        let catalog = Catalog::standard();
        let fleet: Fleet = [(ShipType::CargoShip, 1)].into_iter().collect();
        let mut boosts = ActiveBoosts::new();
        boosts.insert(
            BoostKind::DriveTechBoost,
            ActiveBoost {
                level: 20,
                end_time: 100,
            },
        );
        let research = Levels::new();
        let boosted = fleet_speed(&catalog, &fleet, &research, &boosts, 50).unwrap();
        let plain = fleet_speed(&catalog, &fleet, &research, &boosts, 100).unwrap();
        assert!((boosted - 6000.0).abs() < 1e-9);
        assert!((plain - 5000.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_fleet_has_no_speed() {
        let catalog = Catalog::standard();
        let result = fleet_speed(
            &catalog,
            &Fleet::new(),
            &Levels::new(),
            &ActiveBoosts::new(),
            0,
        );
        assert_eq!(result, Err(GameError::EmptyFleet));
    }

    #[test]
    fn test_zero_count_entry_does_not_slow_fleet() {
        let catalog = Catalog::standard();
        let fleet: Fleet =
            serde_json::from_str(r#"{"LIGHT_FIGHTER":5,"DEATHSTAR":0}"#).unwrap();
        let speed =
            fleet_speed(&catalog, &fleet, &Levels::new(), &ActiveBoosts::new(), 0).unwrap();
        assert!((speed - 12_500.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_speed_ship_has_no_drive() {
        let mut catalog = Catalog::standard();
        if let Some(spec) = catalog.ships.get_mut(&ShipType::Deathstar) {
            spec.speed = 0.0;
        }
        let fleet: Fleet = [(ShipType::Deathstar, 1)].into_iter().collect();
        let result = fleet_speed(&catalog, &fleet, &Levels::new(), &ActiveBoosts::new(), 0);
        assert_eq!(result, Err(GameError::NoDrive));
    }

    #[test]
    fn test_fuel_formula() {
        let catalog = Catalog::standard();
        let fleet: Fleet = [(ShipType::CargoShip, 1)].into_iter().collect();
        // d = 1000 (same slot), speed 5000 -> t = 2 s
        let t = travel_time(1000, 5000.0);
        assert_eq!(t, 2);
        // 10 * 1 * (1000 / 35000) * (20 / 1000)^2 rounds to 0, plus 1
        assert_eq!(fuel_consumption(&catalog, &fleet, 1000, t).unwrap(), 1.0);

        let d = 40_000;
        let t = 3600;
        let expected = (10.0 * (40_000.0 / 35_000.0) * (36_000.0_f64 / 40_000.0).powi(2)).round() + 1.0;
        assert_eq!(fuel_consumption(&catalog, &fleet, d, t).unwrap(), expected);
    }

    #[test]
    fn test_cargo_capacity_sums_counts() {
        let catalog = Catalog::standard();
        let fleet: Fleet = [(ShipType::LightFighter, 4), (ShipType::CargoShip, 2)]
            .into_iter()
            .collect();
        assert_eq!(cargo_capacity(&catalog, &fleet).unwrap(), 10_200.0);
    }
}
