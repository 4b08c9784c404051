//! Static definitions of every buildable and researchable object.
//!
//! The catalog is pure data: costs, times, combat values, drive categories
//! and prerequisites. [`Catalog::standard`] builds the live table in code;
//! operators can dump it to RON, tweak it and load it back with
//! [`Catalog::load`].

mod specs;
mod standard;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

pub use specs::{
    BuildingSpec, CombatStats, CostCurve, DefenseSpec, DriveKind, GrowthCurve, Requirements,
    ResearchSpec, ShipSpec, StorageCurve, BUILDING_TIME_DIVISOR, RESEARCH_TIME_DIVISOR,
    UNIT_TIME_DIVISOR,
};

use crate::config::ConfigError;
use crate::error::{GameError, Result};
use crate::model::{
    BuildingType, DefenseType, ObjectId, ObjectKind, ResearchType, Resources, ShipType,
};

/// Shared behaviour of every catalog entry.
pub trait GameObject {
    /// Display name.
    fn name(&self) -> &str;

    /// Category of this object.
    fn kind(&self) -> ObjectKind;

    /// Cost of reaching `level` (buildings, research) or of one unit
    /// (ships, defenses; `level` is ignored).
    fn cost(&self, level: u32) -> Resources;

    /// Build time in seconds for `level`, or for one unit.
    fn build_time(&self, level: u32) -> u64;

    /// Prerequisites.
    fn requirements(&self) -> &Requirements;
}

/// The full object table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Buildings by type.
    pub buildings: BTreeMap<BuildingType, BuildingSpec>,
    /// Research by type.
    pub research: BTreeMap<ResearchType, ResearchSpec>,
    /// Ships by type.
    pub ships: BTreeMap<ShipType, ShipSpec>,
    /// Defenses by type.
    pub defenses: BTreeMap<DefenseType, DefenseSpec>,
}

static STANDARD: OnceLock<Catalog> = OnceLock::new();

impl Catalog {
    /// The live catalog, built once per process.
    #[must_use]
    pub fn global() -> &'static Self {
        STANDARD.get_or_init(Self::standard)
    }

    /// Load from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string.
    pub fn from_ron_str(ron: &str) -> std::result::Result<Self, ConfigError> {
        Ok(ron::from_str(ron)?)
    }

    /// Pretty RON dump of this catalog.
    pub fn to_ron_string(&self) -> std::result::Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Look up any object.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&dyn GameObject> {
        match id {
            ObjectId::Building(ty) => self.buildings.get(&ty).map(|s| s as &dyn GameObject),
            ObjectId::Research(ty) => self.research.get(&ty).map(|s| s as &dyn GameObject),
            ObjectId::Ship(ty) => self.ships.get(&ty).map(|s| s as &dyn GameObject),
            ObjectId::Defense(ty) => self.defenses.get(&ty).map(|s| s as &dyn GameObject),
        }
    }

    /// Look up any object, failing with [`GameError::MissingCatalogEntry`].
    pub fn require(&self, id: ObjectId) -> Result<&dyn GameObject> {
        self.object(id).ok_or(GameError::MissingCatalogEntry(id))
    }

    /// Building definition.
    pub fn building(&self, ty: BuildingType) -> Result<&BuildingSpec> {
        self.buildings
            .get(&ty)
            .ok_or(GameError::MissingCatalogEntry(ty.into()))
    }

    /// Research definition.
    pub fn research(&self, ty: ResearchType) -> Result<&ResearchSpec> {
        self.research
            .get(&ty)
            .ok_or(GameError::MissingCatalogEntry(ty.into()))
    }

    /// Ship definition.
    pub fn ship(&self, ty: ShipType) -> Result<&ShipSpec> {
        self.ships
            .get(&ty)
            .ok_or(GameError::MissingCatalogEntry(ty.into()))
    }

    /// Defense definition.
    pub fn defense(&self, ty: DefenseType) -> Result<&DefenseSpec> {
        self.defenses
            .get(&ty)
            .ok_or(GameError::MissingCatalogEntry(ty.into()))
    }

    /// Ids without a definition. Empty for a complete catalog.
    #[must_use]
    pub fn missing_entries(&self) -> Vec<ObjectId> {
        ObjectId::all()
            .filter(|&id| self.object(id).is_none())
            .collect()
    }

    /// Problems found in the table, one line each.
    ///
    /// Checks completeness, that every unit has a positive hull and that
    /// every prerequisite is itself defined.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut problems: Vec<String> = self
            .missing_entries()
            .into_iter()
            .map(|id| format!("{id}: no definition"))
            .collect();

        for (ty, spec) in &self.ships {
            if spec.combat.hull <= 0.0 {
                problems.push(format!("{ty}: hull must be positive"));
            }
        }
        for (ty, spec) in &self.defenses {
            if spec.combat.hull <= 0.0 {
                problems.push(format!("{ty}: hull must be positive"));
            }
        }

        for id in ObjectId::all() {
            let Some(object) = self.object(id) else {
                continue;
            };
            let reqs = object.requirements();
            for building in reqs.buildings.keys() {
                if !self.buildings.contains_key(building) {
                    problems.push(format!("{id}: requires undefined {building}"));
                }
            }
            for research in reqs.research.keys() {
                if !self.research.contains_key(research) {
                    problems.push(format!("{id}: requires undefined {research}"));
                }
            }
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_is_complete() {
        let catalog = Catalog::standard();
        assert!(catalog.missing_entries().is_empty());
        assert!(catalog.validate().is_empty(), "{:?}", catalog.validate());
    }

    #[test]
    fn test_ron_dump_loads_back() {
        let catalog = Catalog::standard();
        let ron = catalog.to_ron_string().unwrap();
        let loaded = Catalog::from_ron_str(&ron).unwrap();
        assert_eq!(loaded.ships.len(), ShipType::ALL.len());
        assert_eq!(
            loaded.ship(ShipType::LightFighter).unwrap().combat,
            catalog.ship(ShipType::LightFighter).unwrap().combat
        );
    }

    #[test]
    fn test_validate_flags_missing_entries() {
        let mut catalog = Catalog::standard();
        catalog.defenses.remove(&DefenseType::PlasmaTurret);
        let problems = catalog.validate();
        assert_eq!(problems, vec!["PLASMA_TURRET: no definition".to_string()]);
        assert!(matches!(
            catalog.defense(DefenseType::PlasmaTurret),
            Err(GameError::MissingCatalogEntry(_))
        ));
    }

    #[test]
    fn test_unit_cost_ignores_level() {
        let catalog = Catalog::global();
        let fighter = catalog.require(ShipType::LightFighter.into()).unwrap();
        assert_eq!(fighter.cost(1), fighter.cost(7));
        assert_eq!(fighter.kind(), ObjectKind::Ship);
    }

    #[test]
    fn test_ship_upgrade_cost_doubles() {
        let fighter = Catalog::global().ship(ShipType::LightFighter).unwrap();
        assert_eq!(fighter.upgrade_cost(1), Resources::new(15_000.0, 5_000.0, 0.0));
        assert_eq!(fighter.upgrade_cost(2), Resources::new(30_000.0, 10_000.0, 0.0));
    }
}
