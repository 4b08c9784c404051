//! Per-category object definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::GameObject;
use crate::model::{
    BuildingType, ObjectKind, ResearchType, ResourceKind, Resources,
};

/// Seconds per hour.
const HOUR: f64 = 3600.0;

/// Hourly build-time divisor for buildings.
pub const BUILDING_TIME_DIVISOR: f64 = 2500.0;

/// Hourly build-time divisor for research.
pub const RESEARCH_TIME_DIVISOR: f64 = 1000.0;

/// Hourly build-time divisor for ships and defenses.
pub const UNIT_TIME_DIVISOR: f64 = 5000.0;

/// Geometric cost: `base * factor^(level - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostCurve {
    /// Cost of level 1.
    pub base: Resources,
    /// Growth per level.
    pub factor: f64,
}

impl CostCurve {
    /// Create a cost curve.
    #[must_use]
    pub const fn new(base: Resources, factor: f64) -> Self {
        Self { base, factor }
    }

    /// Cost of reaching `level` (levels below 1 cost as level 1).
    #[must_use]
    pub fn at(&self, level: u32) -> Resources {
        let exponent = level.max(1) - 1;
        self.base * self.factor.powi(exponent as i32)
    }
}

/// `coefficient * level * 1.1^level`, the shape of mine output and demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthCurve {
    /// Scale of the curve.
    pub coefficient: f64,
}

impl GrowthCurve {
    /// Create a growth curve.
    #[must_use]
    pub const fn new(coefficient: f64) -> Self {
        Self { coefficient }
    }

    /// Value at `level`; 0 at level 0.
    #[must_use]
    pub fn at(&self, level: u32) -> f64 {
        let level_f = f64::from(level);
        self.coefficient * level_f * 1.1_f64.powi(level as i32)
    }
}

/// Storage capacity: `base * floor(2.5 * e^(20 * level / 33))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StorageCurve {
    /// Resource stored.
    pub resource: ResourceKind,
    /// Scale of the curve.
    pub base: f64,
}

impl StorageCurve {
    /// Capacity at `level`. Level 0 already provides twice `base`.
    #[must_use]
    pub fn at(&self, level: u32) -> f64 {
        self.base * (2.5 * (20.0 * f64::from(level) / 33.0).exp()).floor()
    }
}

/// Prerequisite levels that must be reached before an object can be queued.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirements {
    /// Minimum building levels on the planet.
    pub buildings: BTreeMap<BuildingType, u32>,
    /// Minimum research levels of the player.
    pub research: BTreeMap<ResearchType, u32>,
}

impl Requirements {
    /// Whether there are no prerequisites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty() && self.research.is_empty()
    }
}

/// Build time in whole seconds for a cost, never below one second.
fn build_seconds(cost: &Resources, divisor: f64) -> u64 {
    let seconds = (cost.metal + cost.crystal) / divisor * HOUR;
    seconds.round().max(1.0) as u64
}

/// Attack, shield and hull of one unit before technology bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    /// Damage per round.
    pub attack: f64,
    /// Damage absorbed per round before the hull is hit.
    pub shield: f64,
    /// Structural integrity.
    pub hull: f64,
}

impl CombatStats {
    /// Create combat stats.
    #[must_use]
    pub const fn new(attack: f64, shield: f64, hull: f64) -> Self {
        Self {
            attack,
            shield,
            hull,
        }
    }
}

/// Drive category of a ship, which decides the speed bonus per tech level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriveKind {
    /// +10% per combustion drive level.
    Combustion,
    /// +20% per impulse drive level.
    Impulse,
    /// +30% per hyperspace drive level.
    Hyperspace,
}

impl DriveKind {
    /// Research that upgrades this drive.
    #[must_use]
    pub const fn research(self) -> ResearchType {
        match self {
            Self::Combustion => ResearchType::CombustionDrive,
            Self::Impulse => ResearchType::ImpulseDrive,
            Self::Hyperspace => ResearchType::HyperspaceDrive,
        }
    }

    /// Speed bonus per research level.
    #[must_use]
    pub const fn bonus_factor(self) -> f64 {
        match self {
            Self::Combustion => 0.10,
            Self::Impulse => 0.20,
            Self::Hyperspace => 0.30,
        }
    }
}

/// A planet building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingSpec {
    /// Display name.
    pub name: String,
    /// Cost per level.
    pub cost: CostCurve,
    /// Resource produced per hour, with its curve.
    #[serde(default)]
    pub production: Option<(ResourceKind, GrowthCurve)>,
    /// Energy produced.
    #[serde(default)]
    pub energy_output: Option<GrowthCurve>,
    /// Energy consumed.
    #[serde(default)]
    pub energy_demand: Option<GrowthCurve>,
    /// Storage provided.
    #[serde(default)]
    pub storage: Option<StorageCurve>,
    /// Prerequisites.
    #[serde(default)]
    pub requirements: Requirements,
}

impl BuildingSpec {
    /// Create a building with no production, energy or storage role.
    #[must_use]
    pub fn new(name: impl Into<String>, base: Resources, factor: f64) -> Self {
        Self {
            name: name.into(),
            cost: CostCurve::new(base, factor),
            production: None,
            energy_output: None,
            energy_demand: None,
            storage: None,
            requirements: Requirements::default(),
        }
    }

    /// Builder method: hourly production of `resource`.
    #[must_use]
    pub fn with_production(mut self, resource: ResourceKind, coefficient: f64) -> Self {
        self.production = Some((resource, GrowthCurve::new(coefficient)));
        self
    }

    /// Builder method: energy output.
    #[must_use]
    pub fn with_energy_output(mut self, coefficient: f64) -> Self {
        self.energy_output = Some(GrowthCurve::new(coefficient));
        self
    }

    /// Builder method: energy demand.
    #[must_use]
    pub fn with_energy_demand(mut self, coefficient: f64) -> Self {
        self.energy_demand = Some(GrowthCurve::new(coefficient));
        self
    }

    /// Builder method: storage for `resource`.
    #[must_use]
    pub fn with_storage(mut self, resource: ResourceKind) -> Self {
        self.storage = Some(StorageCurve {
            resource,
            base: 5000.0,
        });
        self
    }

    /// Builder method: building prerequisite.
    #[must_use]
    pub fn requires_building(mut self, building: BuildingType, level: u32) -> Self {
        self.requirements.buildings.insert(building, level);
        self
    }

    /// Hourly output at `level`, before energy efficiency.
    #[must_use]
    pub fn production_at(&self, level: u32) -> f64 {
        self.production.map_or(0.0, |(_, curve)| curve.at(level))
    }

    /// Energy demand at `level`.
    #[must_use]
    pub fn energy_demand_at(&self, level: u32) -> f64 {
        self.energy_demand.map_or(0.0, |curve| curve.at(level))
    }
}

impl GameObject for BuildingSpec {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Building
    }

    fn cost(&self, level: u32) -> Resources {
        self.cost.at(level)
    }

    fn build_time(&self, level: u32) -> u64 {
        build_seconds(&self.cost(level), BUILDING_TIME_DIVISOR)
    }

    fn requirements(&self) -> &Requirements {
        &self.requirements
    }
}

/// A player technology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchSpec {
    /// Display name.
    pub name: String,
    /// Cost per level.
    pub cost: CostCurve,
    /// Prerequisites.
    #[serde(default)]
    pub requirements: Requirements,
}

impl ResearchSpec {
    /// Create a research doubling in cost per level.
    #[must_use]
    pub fn new(name: impl Into<String>, base: Resources) -> Self {
        Self {
            name: name.into(),
            cost: CostCurve::new(base, 2.0),
            requirements: Requirements::default(),
        }
    }

    /// Builder method: cost growth other than doubling.
    #[must_use]
    pub fn with_factor(mut self, factor: f64) -> Self {
        self.cost.factor = factor;
        self
    }

    /// Builder method: research lab prerequisite.
    #[must_use]
    pub fn requires_lab(mut self, level: u32) -> Self {
        self.requirements
            .buildings
            .insert(BuildingType::ResearchLab, level);
        self
    }

    /// Builder method: research prerequisite.
    #[must_use]
    pub fn requires(mut self, research: ResearchType, level: u32) -> Self {
        self.requirements.research.insert(research, level);
        self
    }
}

impl GameObject for ResearchSpec {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Research
    }

    fn cost(&self, level: u32) -> Resources {
        self.cost.at(level)
    }

    fn build_time(&self, level: u32) -> u64 {
        build_seconds(&self.cost(level), RESEARCH_TIME_DIVISOR)
    }

    fn requirements(&self) -> &Requirements {
        &self.requirements
    }
}

/// A ship class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSpec {
    /// Display name.
    pub name: String,
    /// Cost of one ship.
    pub unit_cost: Resources,
    /// Combat values of one ship.
    pub combat: CombatStats,
    /// Base speed.
    pub speed: f64,
    /// Cargo units carried.
    pub cargo_capacity: f64,
    /// Drive category.
    pub drive: DriveKind,
    /// Base energy draw, the basis of fuel consumption.
    pub fuel_consumption: f64,
    /// Prerequisites.
    #[serde(default)]
    pub requirements: Requirements,
}

impl ShipSpec {
    /// Cost of the `level`-th upgrade of this ship class.
    #[must_use]
    pub fn upgrade_cost(&self, level: u32) -> Resources {
        CostCurve::new(self.unit_cost * 5.0, 2.0).at(level)
    }

    /// Time of the `level`-th upgrade of this ship class.
    #[must_use]
    pub fn upgrade_time(&self, level: u32) -> u64 {
        build_seconds(&self.upgrade_cost(level), RESEARCH_TIME_DIVISOR)
    }
}

impl GameObject for ShipSpec {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Ship
    }

    fn cost(&self, _level: u32) -> Resources {
        self.unit_cost
    }

    fn build_time(&self, _level: u32) -> u64 {
        build_seconds(&self.unit_cost, UNIT_TIME_DIVISOR)
    }

    fn requirements(&self) -> &Requirements {
        &self.requirements
    }
}

/// A planetary defense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseSpec {
    /// Display name.
    pub name: String,
    /// Cost of one unit.
    pub unit_cost: Resources,
    /// Combat values of one unit.
    pub combat: CombatStats,
    /// Prerequisites.
    #[serde(default)]
    pub requirements: Requirements,
}

impl GameObject for DefenseSpec {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Defense
    }

    fn cost(&self, _level: u32) -> Resources {
        self.unit_cost
    }

    fn build_time(&self, _level: u32) -> u64 {
        build_seconds(&self.unit_cost, UNIT_TIME_DIVISOR)
    }

    fn requirements(&self) -> &Requirements {
        &self.requirements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_curve_grows_geometrically() {
        let curve = CostCurve::new(Resources::new(60.0, 15.0, 0.0), 1.5);
        assert_eq!(curve.at(1), Resources::new(60.0, 15.0, 0.0));
        assert_eq!(curve.at(3), Resources::new(135.0, 33.75, 0.0));
        assert_eq!(curve.at(0), curve.at(1));
    }

    #[test]
    fn test_storage_curve_levels() {
        let curve = StorageCurve {
            resource: ResourceKind::Metal,
            base: 5000.0,
        };
        assert_eq!(curve.at(0), 10_000.0);
        assert_eq!(curve.at(1), 20_000.0);
        assert_eq!(curve.at(2), 40_000.0);
    }

    #[test]
    fn test_build_time_has_one_second_floor() {
        assert_eq!(build_seconds(&Resources::ZERO, BUILDING_TIME_DIVISOR), 1);
        // (60 + 15) / 2500 h = 108 s
        assert_eq!(
            build_seconds(&Resources::new(60.0, 15.0, 0.0), BUILDING_TIME_DIVISOR),
            108
        );
    }
}
