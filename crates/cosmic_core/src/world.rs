//! In-memory record tables.
//!
//! `World` is the unit of state the engine mutates. The server keeps one
//! behind its storage boundary; tests and tools build their own. Every
//! table is ordered so that iteration, and therefore simulation, is
//! deterministic.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{GameError, Result};
use crate::model::{
    Coordinates, FleetMission, Message, MessageBody, MessageId, MissionId, Planet, PlanetId,
    Player, PlayerId, Resources, Timestamp,
};

/// Salvage at one slot. Only metal and crystal are ever recovered.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DebrisField {
    /// Metal available.
    pub metal: f64,
    /// Crystal available.
    pub crystal: f64,
}

impl DebrisField {
    /// Whether nothing is left to harvest.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metal <= 0.0 && self.crystal <= 0.0
    }

    /// Add wreckage; deuterium is ignored.
    pub fn add(&mut self, wreckage: &Resources) {
        self.metal += wreckage.metal.max(0.0);
        self.crystal += wreckage.crystal.max(0.0);
    }
}

/// The records one player's pass can read or write.
///
/// Built by [`World::scope_of`]; a store copies only these into a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    players: BTreeSet<PlayerId>,
    planets: BTreeSet<PlanetId>,
    missions: BTreeSet<MissionId>,
    slots: BTreeSet<Coordinates>,
}

impl Scope {
    /// Whether the player record is in scope.
    #[must_use]
    pub fn has_player(&self, id: PlayerId) -> bool {
        self.players.contains(&id)
    }

    /// Whether the planet record is in scope.
    #[must_use]
    pub fn has_planet(&self, id: PlanetId) -> bool {
        self.planets.contains(&id)
    }

    /// Whether the mission record is in scope.
    #[must_use]
    pub fn has_mission(&self, id: MissionId) -> bool {
        self.missions.contains(&id)
    }
}

/// All game records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct World {
    /// Players by id.
    pub players: BTreeMap<PlayerId, Player>,
    /// Planets by id.
    pub planets: BTreeMap<PlanetId, Planet>,
    /// Missions in flight.
    pub missions: BTreeMap<MissionId, FleetMission>,
    /// Debris fields by slot.
    pub debris: BTreeMap<Coordinates, DebrisField>,
    /// Mailbox messages in creation order.
    pub messages: Vec<Message>,
    next_id: u64,
}

impl World {
    /// Create an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Allocate a mission id.
    pub fn next_mission_id(&mut self) -> MissionId {
        MissionId(self.allocate())
    }

    /// Allocate a boost id.
    pub fn next_boost_id(&mut self) -> crate::model::BoostId {
        crate::model::BoostId(self.allocate())
    }

    /// Register a player with a homeworld at `coordinates`.
    pub fn create_player(
        &mut self,
        username: impl Into<String>,
        coordinates: Coordinates,
        config: &EngineConfig,
        now: Timestamp,
    ) -> Result<(PlayerId, PlanetId)> {
        coordinates.validate(&config.galaxy)?;
        if self.planet_at(coordinates).is_some() {
            return Err(GameError::SlotOccupied(coordinates));
        }
        let player_id = PlayerId(self.allocate());
        self.players
            .insert(player_id, Player::new(player_id, username, now));
        let planet_id = self.insert_planet(player_id, "Homeworld", coordinates, true, config, now);
        Ok((player_id, planet_id))
    }

    /// Create a planet at an empty slot. The caller checks the slot.
    pub fn insert_planet(
        &mut self,
        owner: PlayerId,
        name: impl Into<String>,
        coordinates: Coordinates,
        is_homeworld: bool,
        config: &EngineConfig,
        now: Timestamp,
    ) -> PlanetId {
        let id = PlanetId(self.allocate());
        let planet = Planet::new(
            id,
            owner,
            name,
            coordinates,
            is_homeworld,
            config.initial_resources,
            now,
        );
        self.planets.insert(id, planet);
        id
    }

    /// Player by id.
    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.players.get(&id).ok_or(GameError::PlayerNotFound(id))
    }

    /// Mutable player by id.
    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players.get_mut(&id).ok_or(GameError::PlayerNotFound(id))
    }

    /// Planet by id.
    pub fn planet(&self, id: PlanetId) -> Result<&Planet> {
        self.planets.get(&id).ok_or(GameError::PlanetNotFound(id))
    }

    /// Mutable planet by id.
    pub fn planet_mut(&mut self, id: PlanetId) -> Result<&mut Planet> {
        self.planets.get_mut(&id).ok_or(GameError::PlanetNotFound(id))
    }

    /// Planet occupying a slot.
    #[must_use]
    pub fn planet_at(&self, coordinates: Coordinates) -> Option<&Planet> {
        self.planets
            .values()
            .find(|planet| planet.coordinates == coordinates)
    }

    /// Planets owned by a player, by id.
    pub fn planets_of(&self, owner: PlayerId) -> impl Iterator<Item = &Planet> + '_ {
        self.planets
            .values()
            .filter(move |planet| planet.owner == owner)
    }

    /// Ids of the planets owned by a player.
    #[must_use]
    pub fn planet_ids_of(&self, owner: PlayerId) -> Vec<PlanetId> {
        self.planets_of(owner).map(|planet| planet.id).collect()
    }

    /// Number of non-homeworld planets a player owns.
    #[must_use]
    pub fn colony_count(&self, owner: PlayerId) -> usize {
        self.planets_of(owner)
            .filter(|planet| !planet.is_homeworld)
            .count()
    }

    /// Missions owned by a player, by id.
    #[must_use]
    pub fn mission_ids_of(&self, owner: PlayerId) -> Vec<MissionId> {
        self.missions
            .values()
            .filter(|mission| mission.owner_id == owner)
            .map(|mission| mission.id)
            .collect()
    }

    /// Debris at a slot, if any.
    #[must_use]
    pub fn debris_at(&self, coordinates: Coordinates) -> Option<&DebrisField> {
        self.debris.get(&coordinates)
    }

    /// Merge wreckage into the field at a slot.
    pub fn add_debris(&mut self, coordinates: Coordinates, wreckage: &Resources) {
        if wreckage.metal <= 0.0 && wreckage.crystal <= 0.0 {
            return;
        }
        self.debris.entry(coordinates).or_default().add(wreckage);
    }

    /// Deliver a message.
    pub fn send_message(
        &mut self,
        recipient_id: PlayerId,
        timestamp: Timestamp,
        subject: impl Into<String>,
        body: MessageBody,
    ) -> MessageId {
        let id = MessageId(self.allocate());
        self.messages.push(Message {
            id,
            recipient_id,
            timestamp,
            is_read: false,
            subject: subject.into(),
            body,
        });
        id
    }

    /// Records reachable from `player`'s pass.
    ///
    /// Covers the player and their missions, every slot those missions leave
    /// from or fly to plus `extra_slots`, the planets and debris at those
    /// slots, and every player owning one of those planets together with all
    /// of that player's planets.
    #[must_use]
    pub fn scope_of(&self, player: PlayerId, extra_slots: &[Coordinates]) -> Scope {
        let mut scope = Scope::default();
        scope.players.insert(player);
        for mission in self.missions.values().filter(|m| m.owner_id == player) {
            scope.missions.insert(mission.id);
            scope.slots.insert(mission.origin_coords);
            scope.slots.insert(mission.target_coords);
        }
        scope.slots.extend(extra_slots.iter().copied());
        for planet in self.planets.values() {
            if scope.slots.contains(&planet.coordinates) {
                scope.players.insert(planet.owner);
            }
        }
        for planet in self.planets.values() {
            if scope.players.contains(&planet.owner) || scope.slots.contains(&planet.coordinates) {
                scope.planets.insert(planet.id);
            }
        }
        scope
    }

    /// Copy of the records in `scope`. Messages start empty; new ones are
    /// appended on [`absorb`](Self::absorb).
    #[must_use]
    pub fn extract(&self, scope: &Scope) -> World {
        World {
            players: pick(&self.players, &scope.players),
            planets: pick(&self.planets, &scope.planets),
            missions: pick(&self.missions, &scope.missions),
            debris: pick(&self.debris, &scope.slots),
            messages: Vec::new(),
            next_id: self.next_id,
        }
    }

    /// Write back a part taken with [`extract`](Self::extract). Scoped
    /// records missing from `part` are deleted; records it created are added.
    pub fn absorb(&mut self, scope: &Scope, part: World) {
        splice(&mut self.players, &scope.players, part.players);
        splice(&mut self.planets, &scope.planets, part.planets);
        splice(&mut self.missions, &scope.missions, part.missions);
        splice(&mut self.debris, &scope.slots, part.debris);
        self.messages.extend(part.messages);
        self.next_id = self.next_id.max(part.next_id);
    }

    /// A player's messages, newest first.
    pub fn messages_for(&self, recipient: PlayerId) -> impl Iterator<Item = &Message> + '_ {
        self.messages
            .iter()
            .rev()
            .filter(move |message| message.recipient_id == recipient)
    }
}

fn pick<K: Ord + Copy, V: Clone>(table: &BTreeMap<K, V>, keys: &BTreeSet<K>) -> BTreeMap<K, V> {
    keys.iter()
        .filter_map(|key| table.get(key).map(|value| (*key, value.clone())))
        .collect()
}

fn splice<K: Ord + Copy, V>(table: &mut BTreeMap<K, V>, keys: &BTreeSet<K>, part: BTreeMap<K, V>) {
    for key in keys {
        table.remove(key);
    }
    table.extend(part);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_player_places_homeworld() {
        let config = EngineConfig::default();
        let mut world = World::new();
        let (player, planet) = world
            .create_player("alice", Coordinates::new(1, 1, 1), &config, 100)
            .unwrap();
        let home = world.planet(planet).unwrap();
        assert!(home.is_homeworld);
        assert_eq!(home.owner, player);
        assert_eq!(home.resources, config.initial_resources);
        assert_eq!(world.colony_count(player), 0);
        assert_ne!(player.0, planet.0);
    }

    #[test]
    fn test_occupied_or_invalid_slot_is_rejected() {
        let config = EngineConfig::default();
        let mut world = World::new();
        world
            .create_player("alice", Coordinates::new(1, 1, 1), &config, 0)
            .unwrap();
        assert!(matches!(
            world.create_player("bob", Coordinates::new(1, 1, 1), &config, 0),
            Err(GameError::SlotOccupied(_))
        ));
        assert!(matches!(
            world.create_player("bob", Coordinates::new(1, 1, 16), &config, 0),
            Err(GameError::CoordinatesOutOfRange(_))
        ));
    }

    #[test]
    fn test_debris_accumulates_metal_and_crystal() {
        let mut world = World::new();
        let slot = Coordinates::new(2, 3, 4);
        world.add_debris(slot, &Resources::new(100.0, 50.0, 999.0));
        world.add_debris(slot, &Resources::new(10.0, 0.0, 0.0));
        world.add_debris(Coordinates::new(1, 1, 1), &Resources::ZERO);
        assert_eq!(
            world.debris_at(slot),
            Some(&DebrisField {
                metal: 110.0,
                crystal: 50.0
            })
        );
        assert_eq!(world.debris.len(), 1);
    }

    #[test]
    fn test_scoped_pass_matches_full_pass() {
        use crate::catalog::Catalog;
        use crate::mission::{MissionEngine, SendRequest};
        use crate::model::{MissionType, ShipType};
        use crate::tick::run_pass;

        let catalog = Catalog::standard();
        let config = EngineConfig::default();
        let mut world = World::new();
        let (raider, home) = world
            .create_player("raider", Coordinates::new(1, 1, 1), &config, 0)
            .unwrap();
        let (victim, _) = world
            .create_player("victim", Coordinates::new(1, 1, 5), &config, 0)
            .unwrap();
        let (_, bystander_home) = world
            .create_player("bystander", Coordinates::new(1, 1, 9), &config, 0)
            .unwrap();
        {
            let planet = world.planet_mut(home).unwrap();
            planet.fleet.add(ShipType::LightFighter, 10);
            planet.resources.deuterium = 1000.0;
        }
        let mission = MissionEngine::new(&catalog, &config)
            .send(
                &mut world,
                raider,
                SendRequest {
                    origin: home,
                    fleet: [(ShipType::LightFighter, 10)].into_iter().collect(),
                    target: Coordinates::new(1, 1, 5),
                    mission_type: MissionType::Attack,
                },
                0,
            )
            .unwrap();

        let mut full = world.clone();
        run_pass(&catalog, &config, &mut full, raider, mission.return_time).unwrap();

        let scope = world.scope_of(raider, &[]);
        assert!(scope.has_player(victim));
        assert!(scope.has_mission(mission.id));
        assert!(!scope.has_planet(bystander_home));
        let mut part = world.extract(&scope);
        assert_eq!(part.planets.len(), 2);
        run_pass(&catalog, &config, &mut part, raider, mission.return_time).unwrap();
        world.absorb(&scope, part);

        assert_eq!(world, full);
        assert!(world.missions.is_empty());
        assert_eq!(world.messages_for(victim).count(), 1);
    }
}
