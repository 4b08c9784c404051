//! Fleet mission state machine.
//!
//! A mission is created by [`MissionEngine::send`] and then only observed:
//! each reconciliation pass calls [`MissionEngine::process_due`], which
//! applies the arrival effect once (guarded by `processed_arrival`) and the
//! return once (the record is deleted). Effects are evaluated at the
//! mission's own timestamps, never at the time of the pass, so a late pass
//! produces the same result as a punctual one.
//!
//! ```text
//! EnRoute -> Arrived -> [AtTarget] -> Returning -> ReturnDue -> deleted
//!                \-> deleted (colonize, or nothing left of the fleet)
//! ```

mod outcome;

pub mod expedition;
pub mod exploration;
pub mod spy;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace, warn};

pub use self::expedition::ExpeditionOutcome;
pub use self::exploration::ExplorationOutcome;
pub use self::outcome::WeightedTable;
pub use crate::model::MissionType;

use crate::catalog::Catalog;
use crate::combat::{simulate_combat, CombatInput, TechLevels};
use crate::config::EngineConfig;
use crate::error::{GameError, Result};
use crate::fleet::{cargo_capacity, TravelPlan};
use crate::model::{
    BattleMessageBody, BattleReport, Boost, BoostKind, ColonizationMessage, Coordinates,
    EspionageEventMessage, ExpeditionMessage, ExplorationMessage, Fleet, FleetMission, Loot,
    MessageBody, MissionId, PlanetId, PlayerId, ResearchType, Resources, ShipType, SpyMessage,
    SpyReport, Timestamp,
};
use crate::production::ProductionCalculator;
use crate::queue::QueueEngine;
use crate::world::World;

/// Where a mission stands at a given time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissionPhase {
    /// Flying toward the target.
    EnRoute,
    /// At or past arrival, effect not yet applied.
    Arrived,
    /// Effect applied, still lingering at the target.
    AtTarget,
    /// Flying home.
    Returning,
    /// At or past the return time, not yet credited.
    ReturnDue,
}

impl MissionPhase {
    /// Phase of `mission` at `now`.
    #[must_use]
    pub fn of(mission: &FleetMission, now: Timestamp) -> Self {
        if !mission.processed_arrival {
            if now >= mission.arrival_time {
                Self::Arrived
            } else {
                Self::EnRoute
            }
        } else if now >= mission.return_time {
            Self::ReturnDue
        } else if mission.exploration_end_time.is_some_and(|end| now < end) {
            Self::AtTarget
        } else {
            Self::Returning
        }
    }
}

/// A request to dispatch ships from a planet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    /// Planet the ships leave from.
    pub origin: PlanetId,
    /// Ships to send.
    pub fleet: Fleet,
    /// Destination.
    pub target: Coordinates,
    /// What to do there.
    pub mission_type: MissionType,
}

/// Timing and fuel of a validated send.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SendPlan {
    /// Flight kinematics.
    pub travel: TravelPlan,
    /// Arrival at the target.
    pub arrival_time: Timestamp,
    /// End of the stay at the target (expedition/explore).
    pub exploration_end_time: Option<Timestamp>,
    /// Return to the origin.
    pub return_time: Timestamp,
}

/// What one [`MissionEngine::process_due`] call did.
#[derive(Debug, Default)]
pub struct MissionReport {
    /// Missions whose arrival effect was applied.
    pub arrived: Vec<MissionId>,
    /// Missions credited home and deleted.
    pub returned: Vec<MissionId>,
    /// Missions skipped for this pass.
    pub skipped: Vec<(MissionId, GameError)>,
}

/// Sends fleets and moves missions through their phases.
#[derive(Debug, Clone, Copy)]
pub struct MissionEngine<'a> {
    catalog: &'a Catalog,
    config: &'a EngineConfig,
}

impl<'a> MissionEngine<'a> {
    /// Create a mission engine.
    #[must_use]
    pub const fn new(catalog: &'a Catalog, config: &'a EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// Validate a send without changing anything.
    pub fn plan_send(
        &self,
        world: &World,
        owner: PlayerId,
        request: &SendRequest,
        now: Timestamp,
    ) -> Result<SendPlan> {
        let player = world.player(owner)?;
        let planet = world.planet(request.origin)?;
        if planet.owner != owner {
            return Err(GameError::NotPlanetOwner {
                planet: planet.id,
                player: owner,
            });
        }
        if request.fleet.is_empty() {
            return Err(GameError::EmptyFleet);
        }
        request.target.validate(&self.config.galaxy)?;
        for (ship, required) in request.fleet.iter() {
            let available = planet.fleet.get(ship);
            if available < required {
                return Err(GameError::InsufficientShips {
                    ship,
                    required,
                    available,
                });
            }
        }

        let travel = TravelPlan::compute(
            self.catalog,
            &request.fleet,
            planet.coordinates,
            request.target,
            &player.research,
            &player.active_boosts,
            now,
        )?;
        if travel.fuel > planet.resources.deuterium {
            return Err(GameError::InsufficientFuel {
                required: travel.fuel,
                available: planet.resources.deuterium,
            });
        }

        let arrival_time = now + travel.travel_time;
        let hold = self.config.hold_secs(request.mission_type);
        let exploration_end_time = request
            .mission_type
            .holds_at_target()
            .then_some(arrival_time + hold);
        let return_time = if request.mission_type.has_return_leg() {
            arrival_time + hold + travel.travel_time
        } else {
            arrival_time
        };
        Ok(SendPlan {
            travel,
            arrival_time,
            exploration_end_time,
            return_time,
        })
    }

    /// Dispatch a fleet. Ships and fuel leave the planet together with the
    /// mission being recorded; a rejected send changes nothing.
    pub fn send(
        &self,
        world: &mut World,
        owner: PlayerId,
        request: SendRequest,
        now: Timestamp,
    ) -> Result<FleetMission> {
        let plan = self.plan_send(world, owner, &request, now)?;
        let id = world.next_mission_id();
        let planet = world.planet_mut(request.origin)?;
        for (ship, count) in request.fleet.iter() {
            planet.fleet.remove(ship, count);
        }
        planet.resources.deuterium -= plan.travel.fuel;

        let mission = FleetMission {
            id,
            owner_id: owner,
            fleet: request.fleet,
            mission_type: request.mission_type,
            origin_coords: planet.coordinates,
            target_coords: request.target,
            start_time: now,
            arrival_time: plan.arrival_time,
            return_time: plan.return_time,
            exploration_end_time: plan.exploration_end_time,
            processed_arrival: false,
            loot: Loot::default(),
            found_boost: None,
        };
        debug!(
            mission = %id,
            player = %owner,
            kind = %mission.mission_type,
            target = %mission.target_coords,
            arrival = mission.arrival_time,
            fuel = plan.travel.fuel,
            "fleet sent"
        );
        world.missions.insert(id, mission.clone());
        Ok(mission)
    }

    /// Apply every transition of `owner`'s missions that is due at `now`,
    /// in order of arrival time then id. Arrival is applied before return
    /// when both are due. A failing mission is skipped and the rest continue.
    pub fn process_due(&self, world: &mut World, owner: PlayerId, now: Timestamp) -> MissionReport {
        let mut due: Vec<(Timestamp, MissionId)> = world
            .missions
            .values()
            .filter(|mission| mission.owner_id == owner)
            .map(|mission| (mission.arrival_time, mission.id))
            .collect();
        due.sort_unstable();

        let mut report = MissionReport::default();
        for (_, id) in due {
            let Some(mission) = world.missions.get(&id) else {
                continue;
            };
            if !mission.processed_arrival && now >= mission.arrival_time {
                match self.process_arrival(world, id) {
                    Ok(true) => report.arrived.push(id),
                    Ok(false) => {}
                    Err(err) => {
                        report.skipped.push((id, err));
                        continue;
                    }
                }
            }
            let return_due = world
                .missions
                .get(&id)
                .is_some_and(|m| m.processed_arrival && now >= m.return_time);
            if return_due {
                match self.process_return(world, id) {
                    Ok(()) => report.returned.push(id),
                    Err(err) => report.skipped.push((id, err)),
                }
            }
        }
        report
    }

    /// Apply the arrival effect of a mission.
    ///
    /// Returns `false` when the effect was already applied. The mission is
    /// deleted when it has no return leg or nothing of its fleet survives.
    pub fn process_arrival(&self, world: &mut World, id: MissionId) -> Result<bool> {
        let mut mission = world
            .missions
            .get(&id)
            .cloned()
            .ok_or(GameError::MissionNotFound(id))?;
        if mission.processed_arrival {
            return Ok(false);
        }

        match mission.mission_type {
            MissionType::Attack => self.arrive_attack(world, &mut mission)?,
            MissionType::Spy => self.arrive_spy(world, &mut mission)?,
            MissionType::Harvest => self.arrive_harvest(world, &mut mission)?,
            MissionType::Colonize => self.arrive_colonize(world, &mission)?,
            MissionType::Expedition => self.arrive_expedition(world, &mut mission)?,
            MissionType::Explore => self.arrive_explore(world, &mut mission)?,
        }
        mission.processed_arrival = true;

        if !mission.mission_type.has_return_leg() || mission.fleet.is_empty() {
            debug!(mission = %id, kind = %mission.mission_type, "mission ended at target");
            world.missions.remove(&id);
        } else {
            trace!(mission = %id, return_time = mission.return_time, "mission turning back");
            world.missions.insert(id, mission);
        }
        Ok(true)
    }

    /// Credit a mission home and delete it.
    ///
    /// If the origin planet is gone or changed hands, fleet and loot are
    /// dropped.
    pub fn process_return(&self, world: &mut World, id: MissionId) -> Result<()> {
        let mission = world
            .missions
            .remove(&id)
            .ok_or(GameError::MissionNotFound(id))?;

        let origin = world
            .planets
            .values_mut()
            .find(|planet| planet.coordinates == mission.origin_coords);
        let Some(planet) = origin.filter(|planet| planet.owner == mission.owner_id) else {
            warn!(
                mission = %id,
                origin = %mission.origin_coords,
                "origin planet gone, fleet and loot dropped"
            );
            return Ok(());
        };

        planet.fleet.merge(&mission.fleet);
        let capacity = ProductionCalculator::new(self.catalog, self.config).capacity(&planet.buildings);
        planet
            .resources
            .credit_capped(&mission.loot.resources(), &capacity);

        if let Some(player) = world.players.get_mut(&mission.owner_id) {
            player.credits += mission.loot.credits;
            if let Some(boost) = mission.found_boost {
                player.inventory.boosts.push(boost);
            }
        }
        debug!(mission = %id, ships = mission.fleet.total(), "fleet returned");
        Ok(())
    }

    fn arrive_attack(&self, world: &mut World, mission: &mut FleetMission) -> Result<()> {
        let at = mission.arrival_time;
        let Some(target) = world
            .planet_at(mission.target_coords)
            .filter(|planet| planet.owner != mission.owner_id)
            .map(|planet| (planet.id, planet.owner))
        else {
            debug!(mission = %mission.id, "attack target empty");
            return Ok(());
        };
        let (planet_id, defender_id) = target;
        self.catch_up(world, planet_id, defender_id, at)?;

        let attacker = world.player(mission.owner_id)?;
        let defender = world.player(defender_id)?;
        let planet = world.planet(planet_id)?;
        let attacker_tech = TechLevels::of(attacker, at);
        let defender_tech = TechLevels::of(defender, at);
        let capacity = ProductionCalculator::new(self.catalog, self.config).capacity(&planet.buildings);
        let protection =
            f64::from(defender.active_boosts.level(BoostKind::StorageProtectionBoost, at)) / 100.0;

        let outcome = simulate_combat(
            self.catalog,
            self.config,
            &CombatInput {
                attacker_fleet: &mission.fleet,
                defender_fleet: &planet.fleet,
                defender_defenses: &planet.defenses,
                attacker_tech: &attacker_tech,
                defender_tech: &defender_tech,
                defender_resources: planet.resources,
                defender_capacity: capacity,
                protected_factor: self.config.protected_resources_factor.max(protection),
            },
        )?;

        let mut loot = Loot::default();
        loot.add_resources(&outcome.loot);
        let report = BattleReport {
            id: mission.id.0,
            target_coords: mission.target_coords,
            attacker_name: attacker.username.clone(),
            defender_name: defender.username.clone(),
            is_player_attacker: true,
            attacker_fleet: mission.fleet.clone(),
            defender_fleet: planet.fleet.clone(),
            defender_defenses: planet.defenses.clone(),
            attacker_losses: outcome.attacker_losses.clone(),
            defender_losses: outcome.defender_losses.clone(),
            defender_defenses_losses: outcome.defender_defenses_losses.clone(),
            loot,
            debris_created: outcome.debris,
        };

        let planet = world.planet_mut(planet_id)?;
        planet.fleet = outcome.defender_fleet_after;
        planet.defenses = outcome.defender_defenses_after;
        planet.resources = outcome.defender_resources_after;
        mission.fleet = outcome.attacker_fleet_after;
        mission.loot.add_resources(&outcome.loot);
        world.add_debris(mission.target_coords, &outcome.debris);

        let subject = format!("Battle at {}", mission.target_coords);
        let defender_report = BattleReport {
            is_player_attacker: false,
            ..report.clone()
        };
        world.send_message(
            mission.owner_id,
            at,
            subject.clone(),
            MessageBody::Battle(BattleMessageBody { report }),
        );
        world.send_message(
            defender_id,
            at,
            subject,
            MessageBody::Battle(BattleMessageBody {
                report: defender_report,
            }),
        );
        Ok(())
    }

    fn arrive_spy(&self, world: &mut World, mission: &mut FleetMission) -> Result<()> {
        let at = mission.arrival_time;
        let Some((planet_id, defender_id)) = world
            .planet_at(mission.target_coords)
            .filter(|planet| planet.owner != mission.owner_id)
            .map(|planet| (planet.id, planet.owner))
        else {
            debug!(mission = %mission.id, "spy target empty");
            return Ok(());
        };
        self.catch_up(world, planet_id, defender_id, at)?;

        let attacker = world.player(mission.owner_id)?;
        let defender = world.player(defender_id)?;
        let planet = world.planet(planet_id)?;
        let mut rng = mission_rng(mission);
        let resolution = spy::resolve_spy(
            &self.config.spy,
            attacker.research.get(ResearchType::SpyTechnology),
            defender.research.get(ResearchType::SpyTechnology),
            !planet.fleet.is_empty(),
            &mut rng,
        );

        let report = SpyReport {
            target_coords: mission.target_coords,
            failed: resolution.failed,
            probes_lost: resolution.probes_lost.min(mission.fleet.total()),
            resources: resolution.resources.then_some(planet.resources),
            fleet: resolution.fleet.then(|| planet.fleet.clone()),
            defenses: resolution.defenses.then(|| planet.defenses.clone()),
            buildings: resolution.buildings.then(|| planet.buildings.clone()),
            research: resolution.research.then(|| defender.research.clone()),
        };
        let spy_name = attacker.username.clone();

        remove_probes(&mut mission.fleet, resolution.probes_lost);
        world.send_message(
            mission.owner_id,
            at,
            format!("Spy report {}", mission.target_coords),
            MessageBody::Spy(SpyMessage { report }),
        );
        if resolution.detected {
            world.send_message(
                defender_id,
                at,
                "Espionage detected",
                MessageBody::EspionageEvent(EspionageEventMessage {
                    spy_coords: mission.origin_coords,
                    spy_name,
                }),
            );
        }
        Ok(())
    }

    fn arrive_harvest(&self, world: &mut World, mission: &mut FleetMission) -> Result<()> {
        let free = (cargo_capacity(self.catalog, &mission.fleet)? - mission.loot.cargo_used()).max(0.0);
        let Some(field) = world.debris.get_mut(&mission.target_coords) else {
            return Ok(());
        };
        let metal = field.metal.min(free).max(0.0);
        let crystal = field.crystal.min(free - metal).max(0.0);
        field.metal -= metal;
        field.crystal -= crystal;
        if field.is_empty() {
            world.debris.remove(&mission.target_coords);
        }
        mission
            .loot
            .add_resources(&Resources::new(metal, crystal, 0.0));
        debug!(mission = %mission.id, metal, crystal, "debris harvested");
        Ok(())
    }

    fn arrive_colonize(&self, world: &mut World, mission: &FleetMission) -> Result<()> {
        let owner = world.player(mission.owner_id)?;
        let astrophysics = owner.research.get(ResearchType::Astrophysics);
        let occupied = world.planet_at(mission.target_coords).is_some();
        let colonies = world.colony_count(mission.owner_id);
        let success = !occupied && colonies < astrophysics as usize;

        if success {
            let planet = world.insert_planet(
                mission.owner_id,
                "Colony",
                mission.target_coords,
                false,
                self.config,
                mission.arrival_time,
            );
            debug!(mission = %mission.id, planet = %planet, "colony founded");
        }
        world.send_message(
            mission.owner_id,
            mission.arrival_time,
            format!("Colonization {}", mission.target_coords),
            MessageBody::Colonization(ColonizationMessage {
                coords: mission.target_coords,
                success,
            }),
        );
        Ok(())
    }

    fn arrive_expedition(&self, world: &mut World, mission: &mut FleetMission) -> Result<()> {
        let mut rng = mission_rng(mission);
        let result = expedition::resolve_expedition(self.catalog, &mission.fleet, &mut rng)?;

        if let Some(gained) = &result.details.resources_gained {
            mission.loot.add_resources(gained);
        }
        if let Some(credits) = result.details.credits_gained {
            mission.loot.credits += credits;
        }
        if let Some(delay) = result.details.delay_seconds {
            mission.exploration_end_time = mission.exploration_end_time.map(|end| end + delay);
            mission.return_time += delay;
        }
        mission.fleet = result.fleet_after;
        debug!(mission = %mission.id, outcome = ?result.outcome, "expedition resolved");

        world.send_message(
            mission.owner_id,
            mission.arrival_time,
            "Expedition report",
            MessageBody::Expedition(ExpeditionMessage {
                outcome: result.outcome,
                details: result.details,
            }),
        );
        Ok(())
    }

    fn arrive_explore(&self, world: &mut World, mission: &mut FleetMission) -> Result<()> {
        let mut rng = mission_rng(mission);
        let mut result = exploration::resolve_exploration(
            self.catalog,
            &mission.fleet,
            mission.target_coords,
            &mut rng,
        )?;

        if let Some(gained) = &result.details.resources_gained {
            mission.loot.add_resources(gained);
        }
        if let Some(draw) = result.boost {
            let boost = Boost {
                id: world.next_boost_id(),
                kind: draw.kind,
                level: draw.level,
                duration: draw.duration,
            };
            result.details.found_boost = Some(boost.clone());
            mission.found_boost = Some(boost);
        }
        mission.fleet = result.fleet_after;
        debug!(mission = %mission.id, outcome = ?result.outcome, "exploration resolved");

        world.send_message(
            mission.owner_id,
            mission.arrival_time,
            "Exploration report",
            MessageBody::Exploration(ExplorationMessage {
                outcome: result.outcome,
                details: result.details,
            }),
        );
        Ok(())
    }

    /// Advance a target planet to `at` before it is observed.
    fn catch_up(
        &self,
        world: &mut World,
        planet_id: PlanetId,
        owner_id: PlayerId,
        at: Timestamp,
    ) -> Result<()> {
        let colonies = world.colony_count(owner_id);
        let planet = world
            .planets
            .get_mut(&planet_id)
            .ok_or(GameError::PlanetNotFound(planet_id))?;
        let owner = world
            .players
            .get_mut(&owner_id)
            .ok_or(GameError::PlayerNotFound(owner_id))?;
        QueueEngine::new(self.catalog, self.config).advance(planet, owner, colonies, at)?;
        Ok(())
    }
}

/// Outcome RNG for a mission, reproducible from its id and arrival time.
fn mission_rng(mission: &FleetMission) -> StdRng {
    StdRng::seed_from_u64(mission.id.0 ^ mission.arrival_time.rotate_left(32))
}

/// Remove lost probes, spy probes first.
fn remove_probes(fleet: &mut Fleet, mut lost: u64) {
    let probes = fleet.get(ShipType::SpyProbe).min(lost);
    fleet.remove(ShipType::SpyProbe, probes);
    lost -= probes;
    let others: Vec<(ShipType, u64)> = fleet.iter().collect();
    for (ship, count) in others {
        if lost == 0 {
            break;
        }
        let gone = count.min(lost);
        fleet.remove(ship, gone);
        lost -= gone;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DefenseType, MessageBody};

    struct Setup {
        catalog: Catalog,
        config: EngineConfig,
        world: World,
        attacker: PlayerId,
        home: PlanetId,
        defender: PlayerId,
        target: PlanetId,
    }

    fn setup() -> Setup {
        let catalog = Catalog::standard();
        let config = EngineConfig::default();
        let mut world = World::new();
        let (attacker, home) = world
            .create_player("attacker", Coordinates::new(1, 1, 1), &config, 0)
            .unwrap();
        let (defender, target) = world
            .create_player("defender", Coordinates::new(1, 1, 5), &config, 0)
            .unwrap();
        let planet = world.planet_mut(home).unwrap();
        planet.fleet.add(ShipType::LightFighter, 10);
        planet.fleet.add(ShipType::SpyProbe, 3);
        planet.fleet.add(ShipType::ColonyShip, 1);
        planet.resources.deuterium = 10_000.0;
        Setup {
            catalog,
            config,
            world,
            attacker,
            home,
            defender,
            target,
        }
    }

    fn send(s: &mut Setup, fleet: Fleet, target: Coordinates, kind: MissionType) -> FleetMission {
        let engine = MissionEngine::new(&s.catalog, &s.config);
        let request = SendRequest {
            origin: s.home,
            fleet,
            target,
            mission_type: kind,
        };
        engine.send(&mut s.world, s.attacker, request, 0).unwrap()
    }

    fn fighters(count: u64) -> Fleet {
        [(ShipType::LightFighter, count)].into_iter().collect()
    }

    #[test]
    fn test_send_debits_ships_and_fuel() {
        let mut s = setup();
        let mission = send(&mut s, fighters(4), Coordinates::new(1, 1, 5), MissionType::Attack);
        let planet = s.world.planet(s.home).unwrap();
        assert_eq!(planet.fleet.get(ShipType::LightFighter), 6);
        assert!(planet.resources.deuterium < 10_000.0);
        assert_eq!(
            mission.return_time - mission.arrival_time,
            mission.arrival_time - mission.start_time
        );
        assert!(mission.exploration_end_time.is_none());
        assert_eq!(MissionPhase::of(&mission, 0), MissionPhase::EnRoute);
        assert_eq!(
            MissionPhase::of(&mission, mission.arrival_time),
            MissionPhase::Arrived
        );
    }

    #[test]
    fn test_rejected_send_changes_nothing() {
        let mut s = setup();
        s.world.planet_mut(s.home).unwrap().resources.deuterium = 0.0;
        let before = s.world.clone();
        let engine = MissionEngine::new(&s.catalog, &s.config);
        let request = SendRequest {
            origin: s.home,
            fleet: fighters(2),
            target: Coordinates::new(1, 1, 5),
            mission_type: MissionType::Attack,
        };
        assert!(matches!(
            engine.send(&mut s.world, s.attacker, request.clone(), 0),
            Err(GameError::InsufficientFuel { .. })
        ));
        let too_many = SendRequest {
            fleet: fighters(11),
            ..request.clone()
        };
        assert!(matches!(
            engine.send(&mut s.world, s.attacker, too_many, 0),
            Err(GameError::InsufficientShips { required: 11, .. })
        ));
        let empty = SendRequest {
            fleet: Fleet::new(),
            ..request.clone()
        };
        assert_eq!(
            engine.send(&mut s.world, s.attacker, empty, 0).unwrap_err(),
            GameError::EmptyFleet
        );
        let foreign = SendRequest {
            origin: s.target,
            ..request
        };
        assert!(matches!(
            engine.send(&mut s.world, s.attacker, foreign, 0),
            Err(GameError::NotPlanetOwner { .. })
        ));
        assert_eq!(s.world, before);
    }

    #[test]
    fn test_zero_count_fleet_is_empty() {
        let mut s = setup();
        let before = s.world.clone();
        let engine = MissionEngine::new(&s.catalog, &s.config);
        let request = SendRequest {
            origin: s.home,
            fleet: serde_json::from_str(r#"{"DEATHSTAR":0}"#).unwrap(),
            target: Coordinates::new(1, 1, 5),
            mission_type: MissionType::Attack,
        };
        assert_eq!(
            engine.send(&mut s.world, s.attacker, request, 0).unwrap_err(),
            GameError::EmptyFleet
        );
        assert_eq!(s.world, before);
    }

    #[test]
    fn test_holding_missions_wait_at_target() {
        let mut s = setup();
        let mission = send(&mut s, fighters(1), Coordinates::new(1, 2, 8), MissionType::Expedition);
        let end = mission.exploration_end_time.unwrap();
        assert_eq!(end, mission.arrival_time + s.config.expedition_hold_secs);
        assert_eq!(mission.return_time, end + (mission.arrival_time - mission.start_time));
    }

    #[test]
    fn test_arrival_is_idempotent() {
        let mut s = setup();
        s.world
            .planet_mut(s.target)
            .unwrap()
            .defenses
            .add(DefenseType::RocketLauncher, 2);
        let mission = send(&mut s, fighters(10), Coordinates::new(1, 1, 5), MissionType::Attack);
        let engine = MissionEngine::new(&s.catalog, &s.config);

        let first = engine.process_due(&mut s.world, s.attacker, mission.arrival_time);
        assert_eq!(first.arrived, vec![mission.id]);
        let after_first = s.world.clone();

        // Still short of the return leg, so only the arrival is in play.
        assert!(mission.return_time > mission.arrival_time);
        let second = engine.process_due(&mut s.world, s.attacker, mission.arrival_time);
        assert!(second.arrived.is_empty());
        assert!(second.returned.is_empty());
        assert_eq!(s.world, after_first);
        assert!(!engine.process_arrival(&mut s.world, mission.id).unwrap());
    }

    #[test]
    fn test_attack_reports_to_both_sides() {
        let mut s = setup();
        s.world.planet_mut(s.target).unwrap().resources = Resources::new(4000.0, 2000.0, 0.0);
        let mission = send(&mut s, fighters(10), Coordinates::new(1, 1, 5), MissionType::Attack);
        let engine = MissionEngine::new(&s.catalog, &s.config);
        engine.process_due(&mut s.world, s.attacker, mission.arrival_time);

        let stored = &s.world.missions[&mission.id];
        assert!(stored.processed_arrival);
        assert!(stored.loot.cargo_used() > 0.0);

        let attacker_msg = s.world.messages_for(s.attacker).next().unwrap();
        let defender_msg = s.world.messages_for(s.defender).next().unwrap();
        match (&attacker_msg.body, &defender_msg.body) {
            (MessageBody::Battle(a), MessageBody::Battle(d)) => {
                assert!(a.report.is_player_attacker);
                assert!(!d.report.is_player_attacker);
                assert_eq!(a.report.id, d.report.id);
            }
            other => panic!("unexpected bodies {other:?}"),
        }
    }

    #[test]
    fn test_return_credits_origin() {
        let mut s = setup();
        s.world.planet_mut(s.target).unwrap().resources = Resources::new(4000.0, 2000.0, 0.0);
        let mission = send(&mut s, fighters(10), Coordinates::new(1, 1, 5), MissionType::Attack);
        let engine = MissionEngine::new(&s.catalog, &s.config);
        let report = engine.process_due(&mut s.world, s.attacker, mission.return_time);
        assert_eq!(report.arrived, vec![mission.id]);
        assert_eq!(report.returned, vec![mission.id]);
        assert!(s.world.missions.is_empty());
        let home = s.world.planet(s.home).unwrap();
        assert_eq!(home.fleet.get(ShipType::LightFighter), 10);
        assert!(home.resources.metal > s.config.initial_resources.metal);
    }

    #[test]
    fn test_return_to_lost_origin_drops_everything() {
        let mut s = setup();
        let mission = send(&mut s, fighters(5), Coordinates::new(1, 1, 9), MissionType::Harvest);
        s.world.planets.remove(&s.home);
        let engine = MissionEngine::new(&s.catalog, &s.config);
        let report = engine.process_due(&mut s.world, s.attacker, mission.return_time);
        assert_eq!(report.returned, vec![mission.id]);
        assert!(s.world.missions.is_empty());
        assert_eq!(s.world.planets.len(), 1);
    }

    #[test]
    fn test_colonize_occupied_slot_fails() {
        let mut s = setup();
        for astrophysics in [0, 5] {
            s.world
                .player_mut(s.attacker)
                .unwrap()
                .research
                .set(ResearchType::Astrophysics, astrophysics);
            s.world
                .planet_mut(s.home)
                .unwrap()
                .fleet
                .add(ShipType::ColonyShip, 1);
            let colony_ship: Fleet = [(ShipType::ColonyShip, 1)].into_iter().collect();
            let mission = send(&mut s, colony_ship, Coordinates::new(1, 1, 5), MissionType::Colonize);
            let engine = MissionEngine::new(&s.catalog, &s.config);
            engine.process_due(&mut s.world, s.attacker, mission.arrival_time);
            assert!(!s.world.missions.contains_key(&mission.id));
            assert_eq!(s.world.planets.len(), 2);
        }
    }

    #[test]
    fn test_colonize_respects_astrophysics() {
        let mut s = setup();
        let slot = Coordinates::new(1, 1, 7);
        let colony_ship: Fleet = [(ShipType::ColonyShip, 1)].into_iter().collect();
        let mission = send(&mut s, colony_ship.clone(), slot, MissionType::Colonize);
        let engine = MissionEngine::new(&s.catalog, &s.config);
        engine.process_due(&mut s.world, s.attacker, mission.arrival_time);
        assert!(s.world.planet_at(slot).is_none());

        s.world
            .player_mut(s.attacker)
            .unwrap()
            .research
            .set(ResearchType::Astrophysics, 1);
        s.world
            .planet_mut(s.home)
            .unwrap()
            .fleet
            .add(ShipType::ColonyShip, 1);
        let mission = send(&mut s, colony_ship, slot, MissionType::Colonize);
        let engine = MissionEngine::new(&s.catalog, &s.config);
        engine.process_due(&mut s.world, s.attacker, mission.arrival_time);
        let colony = s.world.planet_at(slot).unwrap();
        assert_eq!(colony.owner, s.attacker);
        assert!(!colony.is_homeworld);
        assert_eq!(s.world.colony_count(s.attacker), 1);
    }

    #[test]
    fn test_harvest_collects_up_to_cargo() {
        let mut s = setup();
        let slot = Coordinates::new(1, 1, 9);
        s.world.add_debris(slot, &Resources::new(1000.0, 800.0, 0.0));
        // 10 fighters carry 500
        let mission = send(&mut s, fighters(10), slot, MissionType::Harvest);
        let engine = MissionEngine::new(&s.catalog, &s.config);
        engine.process_arrival(&mut s.world, mission.id).unwrap();
        let loot = s.world.missions[&mission.id].loot;
        assert_eq!(loot.metal, 500.0);
        assert_eq!(loot.crystal, 0.0);
        let field = s.world.debris_at(slot).unwrap();
        assert_eq!(field.metal, 500.0);
        assert_eq!(field.crystal, 800.0);
    }

    #[test]
    fn test_spy_reports_undefended_planet() {
        let mut s = setup();
        let probes: Fleet = [(ShipType::SpyProbe, 2)].into_iter().collect();
        let mission = send(&mut s, probes, Coordinates::new(1, 1, 5), MissionType::Spy);
        let engine = MissionEngine::new(&s.catalog, &s.config);
        engine.process_due(&mut s.world, s.attacker, mission.arrival_time);

        let message = s.world.messages_for(s.attacker).next().unwrap();
        let MessageBody::Spy(spy) = &message.body else {
            panic!("expected spy report");
        };
        assert!(!spy.report.failed);
        assert_eq!(spy.report.probes_lost, 0);
        assert!(spy.report.resources.is_some());
        assert!(spy.report.fleet.is_some());
        assert!(spy.report.research.is_none());
        assert_eq!(s.world.messages_for(s.defender).count(), 0);
    }

    #[test]
    fn test_remove_probes_prefers_probes() {
        let mut fleet: Fleet = [(ShipType::LightFighter, 2), (ShipType::SpyProbe, 1)]
            .into_iter()
            .collect();
        remove_probes(&mut fleet, 2);
        assert_eq!(fleet.get(ShipType::SpyProbe), 0);
        assert_eq!(fleet.get(ShipType::LightFighter), 1);
    }

    #[test]
    fn test_outcome_rng_is_reproducible() {
        let mut a = setup();
        let mut b = setup();
        let ma = send(&mut a, fighters(10), Coordinates::new(1, 3, 3), MissionType::Expedition);
        let mb = send(&mut b, fighters(10), Coordinates::new(1, 3, 3), MissionType::Expedition);
        let engine = MissionEngine::new(&a.catalog, &a.config);
        engine.process_due(&mut a.world, a.attacker, ma.arrival_time);
        engine.process_due(&mut b.world, b.attacker, mb.arrival_time + 500);
        assert_eq!(a.world, b.world);
    }
}
