//! Round-based battle resolution.
//!
//! The attacker's ships face one combined target pool made of the
//! defender's ships followed by the defender's defenses. Each round both
//! sides compute their damage pool from the counts alive at the start of
//! the round, then the attacker fires and the defender fires back. A pool
//! is spent type by type in encounter order (enum declaration order): each
//! type soaks up to `count * (shield + hull)` and the rest carries on to the
//! next type.
//!
//! Destroyed units of a type are `floor(max(0, share - shield * count) / hull)`,
//! clamped to the count. Nothing here is random.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Catalog, CombatStats};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::fleet::cargo_capacity;
use crate::model::{
    BoostKind, Defenses, DefenseType, Fleet, Levels, Player, ResearchType, ResourceKind,
    Resources, ShipType, Timestamp,
};

/// Technology of one combatant, boosts included.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TechLevels {
    /// +10% attack per level.
    pub weapons: u32,
    /// +10% shield per level.
    pub shielding: u32,
    /// +10% hull per level.
    pub armor: u32,
    /// Per-class upgrades, +10% attack, shield and hull per level (ships only).
    pub ship_levels: Levels<ShipType>,
}

impl TechLevels {
    /// Technology of `player` at `now`, with unexpired combat and armor
    /// boosts added to weapons and armor.
    #[must_use]
    pub fn of(player: &Player, now: Timestamp) -> Self {
        let boosts = &player.active_boosts;
        Self {
            weapons: player.research.get(ResearchType::WeaponTechnology)
                + boosts.level(BoostKind::CombatTechBoost, now),
            shielding: player.research.get(ResearchType::ShieldingTechnology),
            armor: player.research.get(ResearchType::ArmorTechnology)
                + boosts.level(BoostKind::ArmorTechBoost, now),
            ship_levels: player.ship_levels.clone(),
        }
    }

    fn scale(&self, base: CombatStats, class_level: u32) -> CombatStats {
        let bonus = |level: u32| 1.0 + f64::from(level) * 0.1;
        let class = bonus(class_level);
        CombatStats::new(
            base.attack * bonus(self.weapons) * class,
            base.shield * bonus(self.shielding) * class,
            base.hull * bonus(self.armor) * class,
        )
    }
}

/// Everything a battle needs.
#[derive(Debug, Clone, Copy)]
pub struct CombatInput<'a> {
    /// Attacking ships.
    pub attacker_fleet: &'a Fleet,
    /// Ships stationed at the target.
    pub defender_fleet: &'a Fleet,
    /// Defenses at the target.
    pub defender_defenses: &'a Defenses,
    /// Attacker technology.
    pub attacker_tech: &'a TechLevels,
    /// Defender technology.
    pub defender_tech: &'a TechLevels,
    /// Defender stockpile at the time of battle.
    pub defender_resources: Resources,
    /// Defender storage capacity.
    pub defender_capacity: Resources,
    /// Fraction of capacity that cannot be looted.
    pub protected_factor: f64,
}

/// Result of a battle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CombatOutcome {
    /// Rounds actually fought.
    pub rounds: u32,
    /// Surviving attacker ships.
    pub attacker_fleet_after: Fleet,
    /// Surviving defender ships.
    pub defender_fleet_after: Fleet,
    /// Surviving defenses.
    pub defender_defenses_after: Defenses,
    /// Attacker ships destroyed.
    pub attacker_losses: Fleet,
    /// Defender ships destroyed.
    pub defender_losses: Fleet,
    /// Defenses destroyed.
    pub defender_defenses_losses: Defenses,
    /// Defender stockpile after loot.
    pub defender_resources_after: Resources,
    /// Resources carried off.
    pub loot: Resources,
    /// Metal and crystal added to the debris field.
    pub debris: Resources,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitId {
    Ship(ShipType),
    Defense(DefenseType),
}

/// A battle-scoped stack of identical units.
#[derive(Debug, Clone)]
struct CombatUnit {
    id: UnitId,
    stats: CombatStats,
    initial: u64,
    remaining: u64,
}

impl CombatUnit {
    fn firepower(&self) -> f64 {
        self.stats.attack * self.remaining as f64
    }
}

fn ship_group(catalog: &Catalog, fleet: &Fleet, tech: &TechLevels) -> Result<Vec<CombatUnit>> {
    fleet
        .iter()
        .map(|(ship, count)| {
            let base = catalog.ship(ship)?.combat;
            Ok(CombatUnit {
                id: UnitId::Ship(ship),
                stats: tech.scale(base, tech.ship_levels.get(ship)),
                initial: count,
                remaining: count,
            })
        })
        .collect()
}

fn defense_group(
    catalog: &Catalog,
    defenses: &Defenses,
    tech: &TechLevels,
) -> Result<Vec<CombatUnit>> {
    defenses
        .iter()
        .map(|(defense, count)| {
            let base = catalog.defense(defense)?.combat;
            Ok(CombatUnit {
                id: UnitId::Defense(defense),
                stats: tech.scale(base, 0),
                initial: count,
                remaining: count,
            })
        })
        .collect()
}

fn is_alive(group: &[CombatUnit]) -> bool {
    group.iter().any(|unit| unit.remaining > 0)
}

/// Spend a damage pool on the first surviving stack of `targets`.
///
/// The whole pool lands on that stack; overkill does not carry to the next.
fn fire(pool: f64, targets: &mut [CombatUnit]) {
    if pool <= 0.0 {
        return;
    }
    let Some(target) = targets.iter_mut().find(|unit| unit.remaining > 0) else {
        return;
    };
    let count = target.remaining as f64;
    let through = (pool - target.stats.shield * count).max(0.0);
    let destroyed = if target.stats.hull <= 0.0 {
        target.remaining
    } else {
        ((through / target.stats.hull).floor() as u64).min(target.remaining)
    };
    target.remaining -= destroyed;
}

/// Resolve one battle.
///
/// Fails only when a unit type has no catalog entry.
pub fn simulate_combat(
    catalog: &Catalog,
    config: &EngineConfig,
    input: &CombatInput<'_>,
) -> Result<CombatOutcome> {
    let mut attackers = ship_group(catalog, input.attacker_fleet, input.attacker_tech)?;
    let mut defenders = ship_group(catalog, input.defender_fleet, input.defender_tech)?;
    defenders.extend(defense_group(
        catalog,
        input.defender_defenses,
        input.defender_tech,
    )?);

    let mut rounds = 0;
    while rounds < config.combat_rounds && is_alive(&attackers) && is_alive(&defenders) {
        let attacker_pool: f64 = attackers.iter().map(CombatUnit::firepower).sum();
        let defender_pool: f64 = defenders.iter().map(CombatUnit::firepower).sum();
        fire(attacker_pool, &mut defenders);
        fire(defender_pool, &mut attackers);
        rounds += 1;
    }

    let mut outcome = CombatOutcome {
        rounds,
        ..CombatOutcome::default()
    };
    for unit in &attackers {
        if let UnitId::Ship(ship) = unit.id {
            outcome.attacker_fleet_after.add(ship, unit.remaining);
            outcome.attacker_losses.add(ship, unit.initial - unit.remaining);
        }
    }
    for unit in &defenders {
        match unit.id {
            UnitId::Ship(ship) => {
                outcome.defender_fleet_after.add(ship, unit.remaining);
                outcome.defender_losses.add(ship, unit.initial - unit.remaining);
            }
            UnitId::Defense(defense) => {
                outcome.defender_defenses_after.add(defense, unit.remaining);
                outcome
                    .defender_defenses_losses
                    .add(defense, unit.initial - unit.remaining);
            }
        }
    }

    outcome.debris = debris(catalog, config, &outcome)?;

    let cargo = cargo_capacity(catalog, &outcome.attacker_fleet_after)?;
    outcome.loot = loot(
        input.defender_resources,
        input.defender_capacity * input.protected_factor,
        config.loot_ratio,
        cargo,
    );
    outcome.defender_resources_after = input.defender_resources - outcome.loot;

    debug!(
        rounds,
        attacker_lost = outcome.attacker_losses.total(),
        defender_lost = outcome.defender_losses.total() + outcome.defender_defenses_losses.total(),
        loot = outcome.loot.total(),
        "battle resolved"
    );
    Ok(outcome)
}

fn debris(catalog: &Catalog, config: &EngineConfig, outcome: &CombatOutcome) -> Result<Resources> {
    let mut wreckage = Resources::ZERO;
    let ships = outcome
        .attacker_losses
        .iter()
        .chain(outcome.defender_losses.iter());
    for (ship, count) in ships {
        wreckage += catalog.ship(ship)?.unit_cost * count as f64;
    }
    for (defense, count) in outcome.defender_defenses_losses.iter() {
        wreckage += catalog.defense(defense)?.unit_cost * count as f64;
    }
    let rate = config.debris_recovery_rate;
    Ok(Resources::new(wreckage.metal * rate, wreckage.crystal * rate, 0.0))
}

/// Loot taken from `stock`: half (by default) of what lies above the
/// protected amount, metal first, until cargo runs out.
fn loot(stock: Resources, protected: Resources, ratio: f64, mut cargo: f64) -> Resources {
    let mut taken = Resources::ZERO;
    for kind in ResourceKind::ALL {
        let available = (stock.get(kind) - protected.get(kind)).max(0.0) * ratio;
        let amount = available.min(cargo).max(0.0);
        *taken.get_mut(kind) = amount;
        cargo -= amount;
    }
    taken
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn battle(
        attacker: &Fleet,
        defender: &Fleet,
        defenses: &Defenses,
        resources: Resources,
        rounds: u32,
    ) -> CombatOutcome {
        let catalog = Catalog::standard();
        let config = EngineConfig {
            combat_rounds: rounds,
            ..EngineConfig::default()
        };
        let tech = TechLevels::default();
        let input = CombatInput {
            attacker_fleet: attacker,
            defender_fleet: defender,
            defender_defenses: defenses,
            attacker_tech: &tech,
            defender_tech: &tech,
            defender_resources: resources,
            defender_capacity: Resources::new(10_000.0, 10_000.0, 10_000.0),
            protected_factor: config.protected_resources_factor,
        };
        simulate_combat(&catalog, &config, &input).unwrap()
    }

    #[test]
    fn test_fighters_against_rocket_launchers_first_round() {
        let attacker: Fleet = [(ShipType::LightFighter, 10)].into_iter().collect();
        let defenses: Defenses = [(DefenseType::RocketLauncher, 5)].into_iter().collect();
        let outcome = battle(&attacker, &Fleet::new(), &defenses, Resources::ZERO, 1);

        // Attacker pool 500 into 5 launchers: floor((500 - 5*20) / 200) = 2.
        // Defender pool 400 into 10 fighters: floor((400 - 10*10) / 400) = 0.
        assert_eq!(outcome.rounds, 1);
        assert_eq!(outcome.attacker_fleet_after.get(ShipType::LightFighter), 10);
        assert_eq!(outcome.defender_defenses_after.get(DefenseType::RocketLauncher), 3);
        assert_eq!(outcome.defender_defenses_losses.get(DefenseType::RocketLauncher), 2);
        assert_eq!(outcome.debris, Resources::new(1200.0, 0.0, 0.0));
    }

    #[test]
    fn test_overkill_stays_on_first_stack() {
        let attacker: Fleet = [(ShipType::Battleship, 3)].into_iter().collect();
        let defender: Fleet = [(ShipType::LightFighter, 2)].into_iter().collect();
        let defenses: Defenses = [(DefenseType::RocketLauncher, 10)].into_iter().collect();
        let outcome = battle(&attacker, &defender, &defenses, Resources::ZERO, 1);

        // 3000 damage all lands on the fighters; the launchers are untouched.
        assert!(outcome.defender_fleet_after.is_empty());
        assert_eq!(outcome.defender_defenses_after.get(DefenseType::RocketLauncher), 10);
        assert!(outcome.defender_defenses_losses.is_empty());
    }

    #[test]
    fn test_empty_defender_fights_no_rounds() {
        let attacker: Fleet = [(ShipType::CargoShip, 1)].into_iter().collect();
        let outcome = battle(
            &attacker,
            &Fleet::new(),
            &Defenses::new(),
            Resources::new(5000.0, 3000.0, 1000.0),
            6,
        );
        assert_eq!(outcome.rounds, 0);
        assert!(outcome.attacker_losses.is_empty());
        assert_eq!(outcome.debris, Resources::ZERO);
        // (5000 - 1000) * 0.5 = 2000 metal, (3000 - 1000) * 0.5 = 1000 crystal,
        // 0 deuterium above the protected 1000.
        assert_eq!(outcome.loot, Resources::new(2000.0, 1000.0, 0.0));
        assert_eq!(
            outcome.defender_resources_after,
            Resources::new(3000.0, 2000.0, 1000.0)
        );
    }

    #[test]
    fn test_loot_is_metal_first_within_cargo() {
        let taken = loot(
            Resources::new(100_000.0, 100_000.0, 100_000.0),
            Resources::ZERO,
            0.5,
            60_000.0,
        );
        assert_eq!(taken, Resources::new(50_000.0, 10_000.0, 0.0));
    }

    #[test]
    fn test_technology_scales_stats() {
        let mut ship_levels = Levels::new();
        ship_levels.set(ShipType::LightFighter, 2);
        let tech = TechLevels {
            weapons: 10,
            shielding: 0,
            armor: 5,
            ship_levels,
        };
        let stats = tech.scale(CombatStats::new(50.0, 10.0, 400.0), 2);
        assert!((stats.attack - 50.0 * 2.0 * 1.2).abs() < 1e-9);
        assert!((stats.shield - 10.0 * 1.2).abs() < 1e-9);
        assert!((stats.hull - 400.0 * 1.5 * 1.2).abs() < 1e-9);
    }

    fn arb_fleet() -> impl Strategy<Value = Fleet> {
        prop::collection::vec((prop::sample::select(ShipType::ALL), 0u64..200), 0..5)
            .prop_map(|pairs| pairs.into_iter().collect())
    }

    fn arb_defenses() -> impl Strategy<Value = Defenses> {
        prop::collection::vec((prop::sample::select(DefenseType::ALL), 0u64..200), 0..4)
            .prop_map(|pairs| pairs.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_units_are_conserved(
            attacker in arb_fleet(),
            defender in arb_fleet(),
            defenses in arb_defenses(),
            rounds in 0u32..=6,
        ) {
            let outcome = battle(&attacker, &defender, &defenses, Resources::ZERO, rounds);
            for ship in ShipType::ALL.iter().copied() {
                prop_assert_eq!(
                    outcome.attacker_fleet_after.get(ship) + outcome.attacker_losses.get(ship),
                    attacker.get(ship)
                );
                prop_assert_eq!(
                    outcome.defender_fleet_after.get(ship) + outcome.defender_losses.get(ship),
                    defender.get(ship)
                );
            }
            for defense in DefenseType::ALL.iter().copied() {
                prop_assert_eq!(
                    outcome.defender_defenses_after.get(defense)
                        + outcome.defender_defenses_losses.get(defense),
                    defenses.get(defense)
                );
            }
            prop_assert!(outcome.rounds <= rounds);
        }

        #[test]
        fn prop_loot_fits_cargo(
            attacker in arb_fleet(),
            defenses in arb_defenses(),
            metal in 0.0f64..1e6,
            crystal in 0.0f64..1e6,
            deuterium in 0.0f64..1e6,
        ) {
            let stock = Resources::new(metal, crystal, deuterium);
            let outcome = battle(&attacker, &Fleet::new(), &defenses, stock, 6);
            let cargo = cargo_capacity(&Catalog::standard(), &outcome.attacker_fleet_after).unwrap();
            prop_assert!(outcome.loot.total() <= cargo + 1e-6);
            for kind in ResourceKind::ALL {
                prop_assert!(outcome.defender_resources_after.get(kind) >= 0.0);
                prop_assert!(outcome.loot.get(kind) >= 0.0);
            }
        }
    }
}
