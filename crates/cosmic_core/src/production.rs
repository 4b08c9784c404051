//! Hourly production and storage capacity.
//!
//! Everything here is a pure function of building levels and player
//! modifiers. Accrual over time lives in [`crate::queue`].

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::model::{
    ActiveBoosts, BoostKind, BuildingType, Levels, ResourceKind, ResourceVeinBonus, Resources,
    Timestamp,
};

/// Energy balance of a planet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyBalance {
    /// Energy produced.
    pub produced: f64,
    /// Energy demanded by mines.
    pub consumed: f64,
    /// `min(1, produced / consumed)`, or 1 with no demand.
    pub efficiency: f64,
}

impl EnergyBalance {
    /// Derive the efficiency from production and demand.
    #[must_use]
    pub fn new(produced: f64, consumed: f64) -> Self {
        let efficiency = if consumed > 0.0 {
            (produced / consumed).min(1.0)
        } else {
            1.0
        };
        Self {
            produced,
            consumed,
            efficiency,
        }
    }
}

/// Hourly output of a planet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Production {
    /// Resources produced per hour.
    pub hourly: Resources,
    /// Energy balance the output was scaled by.
    pub energy: EnergyBalance,
}

/// Player-level modifiers that affect one planet's output.
#[derive(Debug, Clone, Copy)]
pub struct ProductionContext<'a> {
    /// Resource vein event.
    pub vein: &'a ResourceVeinBonus,
    /// Active boosts.
    pub boosts: &'a ActiveBoosts,
    /// Number of non-homeworld planets the owner has.
    pub colony_count: usize,
    /// Whether the planet is the owner's homeworld.
    pub is_homeworld: bool,
    /// Time at which boost and vein expiry is judged.
    pub now: Timestamp,
}

/// Computes planet output and capacity from the catalog.
#[derive(Debug, Clone, Copy)]
pub struct ProductionCalculator<'a> {
    catalog: &'a Catalog,
    config: &'a EngineConfig,
}

impl<'a> ProductionCalculator<'a> {
    /// Create a calculator.
    #[must_use]
    pub const fn new(catalog: &'a Catalog, config: &'a EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// Energy produced and demanded at the given levels.
    #[must_use]
    pub fn energy(&self, buildings: &Levels<BuildingType>) -> EnergyBalance {
        let mut produced = 0.0;
        let mut consumed = 0.0;
        for (ty, spec) in &self.catalog.buildings {
            let level = buildings.get(*ty);
            if let Some(curve) = spec.energy_output {
                produced += curve.at(level);
            }
            consumed += spec.energy_demand_at(level);
        }
        EnergyBalance::new(produced, consumed)
    }

    /// Hourly production of a planet.
    #[must_use]
    pub fn hourly(&self, buildings: &Levels<BuildingType>, ctx: &ProductionContext<'_>) -> Production {
        let energy = self.energy(buildings);
        let boost_level = ctx.boosts.level(BoostKind::ResourceProductionBoost, ctx.now);
        let boost = 1.0 + f64::from(boost_level) / 100.0;

        let mut hourly = Resources::ZERO;
        for (ty, spec) in &self.catalog.buildings {
            let Some((resource, _)) = spec.production else {
                continue;
            };
            let output = spec.production_at(buildings.get(*ty))
                * energy.efficiency
                * ctx.vein.multiplier_for(resource, ctx.now)
                * boost;
            *hourly.get_mut(resource) += output;
        }

        if ctx.is_homeworld {
            hourly += self.config.colony_income_per_hour * ctx.colony_count as f64;
        }

        Production { hourly, energy }
    }

    /// Storage capacity per resource.
    #[must_use]
    pub fn capacity(&self, buildings: &Levels<BuildingType>) -> Resources {
        let mut capacity = Resources::ZERO;
        for resource in ResourceKind::ALL {
            let storage = self
                .catalog
                .buildings
                .iter()
                .find_map(|(ty, spec)| {
                    spec.storage
                        .filter(|curve| curve.resource == resource)
                        .map(|curve| curve.at(buildings.get(*ty)))
                });
            *capacity.get_mut(resource) = storage.unwrap_or(self.config.base_storage_capacity);
        }
        capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ActiveBoost;

    fn levels(pairs: &[(BuildingType, u32)]) -> Levels<BuildingType> {
        pairs.iter().copied().collect()
    }

    fn ctx<'a>(vein: &'a ResourceVeinBonus, boosts: &'a ActiveBoosts) -> ProductionContext<'a> {
        ProductionContext {
            vein,
            boosts,
            colony_count: 0,
            is_homeworld: false,
            now: 1000,
        }
    }

    #[test]
    fn test_energy_shortage_scales_output() {
        let catalog = Catalog::standard();
        let config = EngineConfig::default();
        let calc = ProductionCalculator::new(&catalog, &config);
        let vein = ResourceVeinBonus::default();
        let boosts = ActiveBoosts::new();

        let powered = levels(&[(BuildingType::MetalMine, 5), (BuildingType::SolarPlant, 5)]);
        let full = calc.hourly(&powered, &ctx(&vein, &boosts));
        assert_eq!(full.energy.efficiency, 1.0);
        assert!((full.hourly.metal - 30.0 * 5.0 * 1.1_f64.powi(5)).abs() < 1e-9);

        let unpowered = levels(&[(BuildingType::MetalMine, 5)]);
        let dark = calc.hourly(&unpowered, &ctx(&vein, &boosts));
        assert_eq!(dark.energy.efficiency, 0.0);
        assert_eq!(dark.hourly.metal, 0.0);
    }

    #[test]
    fn test_no_demand_means_full_efficiency() {
        assert_eq!(EnergyBalance::new(0.0, 0.0).efficiency, 1.0);
        assert_eq!(EnergyBalance::new(50.0, 100.0).efficiency, 0.5);
    }

    #[test]
    fn test_boost_and_homeworld_income() {
        let catalog = Catalog::standard();
        let config = EngineConfig::default();
        let calc = ProductionCalculator::new(&catalog, &config);
        let vein = ResourceVeinBonus::default();
        let mut boosts = ActiveBoosts::new();
        boosts.insert(
            BoostKind::ResourceProductionBoost,
            ActiveBoost {
                level: 20,
                end_time: 2000,
            },
        );
        let buildings = levels(&[(BuildingType::CrystalMine, 2), (BuildingType::SolarPlant, 4)]);
        let base = 20.0 * 2.0 * 1.1_f64.powi(2);

        let boosted = calc.hourly(&buildings, &ctx(&vein, &boosts));
        assert!((boosted.hourly.crystal - base * 1.2).abs() < 1e-9);

        let mut home = ctx(&vein, &boosts);
        home.is_homeworld = true;
        home.colony_count = 2;
        home.now = 5000;
        let expired = calc.hourly(&buildings, &home);
        assert!((expired.hourly.crystal - (base + 100.0)).abs() < 1e-9);
        assert_eq!(expired.hourly.metal, 200.0);
    }

    #[test]
    fn test_capacity_uses_storage_curve() {
        let catalog = Catalog::standard();
        let config = EngineConfig::default();
        let calc = ProductionCalculator::new(&catalog, &config);
        let capacity = calc.capacity(&levels(&[(BuildingType::MetalStorage, 1)]));
        assert_eq!(capacity.metal, 20_000.0);
        assert_eq!(capacity.crystal, 10_000.0);
    }
}
