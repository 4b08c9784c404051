//! Battle scenarios.
//!
//! A scenario describes both sides of a battle in RON:
//!
//! ```ron
//! (
//!     attacker: { LIGHT_FIGHTER: 10 },
//!     defenses: { ROCKET_LAUNCHER: 5 },
//!     defender_resources: (metal: 4000.0, crystal: 2000.0, deuterium: 0.0),
//! )
//! ```

use std::path::Path;

use cosmic_core::catalog::Catalog;
use cosmic_core::combat::{simulate_combat, CombatInput, CombatOutcome, TechLevels};
use cosmic_core::config::{ConfigError, EngineConfig};
use cosmic_core::model::{BuildingType, Defenses, Fleet, Levels, Resources, ShipType};
use cosmic_core::production::ProductionCalculator;
use serde::{Deserialize, Serialize};

use crate::ToolError;

/// Combat technology of one side.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SideTech {
    /// Weapon technology.
    pub weapons: u32,
    /// Shielding technology.
    pub shielding: u32,
    /// Armor technology.
    pub armor: u32,
    /// Per-class ship upgrades.
    pub ship_levels: Levels<ShipType>,
}

impl From<SideTech> for TechLevels {
    fn from(tech: SideTech) -> Self {
        Self {
            weapons: tech.weapons,
            shielding: tech.shielding,
            armor: tech.armor,
            ship_levels: tech.ship_levels,
        }
    }
}

/// One battle to simulate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleScenario {
    /// Attacking ships.
    pub attacker: Fleet,
    /// Attacker technology.
    pub attacker_tech: SideTech,
    /// Defending ships.
    pub defender: Fleet,
    /// Defending structures.
    pub defenses: Defenses,
    /// Defender technology.
    pub defender_tech: SideTech,
    /// Defender stockpile.
    pub defender_resources: Resources,
    /// Defender storage building levels; capacity falls back to the base.
    pub defender_buildings: Levels<BuildingType>,
}

impl BattleScenario {
    /// Load from a RON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(ron)?)
    }

    /// Run the battle.
    pub fn run(&self, catalog: &Catalog, config: &EngineConfig) -> Result<CombatOutcome, ToolError> {
        let attacker_tech = TechLevels::from(self.attacker_tech.clone());
        let defender_tech = TechLevels::from(self.defender_tech.clone());
        let capacity =
            ProductionCalculator::new(catalog, config).capacity(&self.defender_buildings);
        let outcome = simulate_combat(
            catalog,
            config,
            &CombatInput {
                attacker_fleet: &self.attacker,
                defender_fleet: &self.defender,
                defender_defenses: &self.defenses,
                attacker_tech: &attacker_tech,
                defender_tech: &defender_tech,
                defender_resources: self.defender_resources,
                defender_capacity: capacity,
                protected_factor: config.protected_resources_factor,
            },
        )?;
        Ok(outcome)
    }
}
