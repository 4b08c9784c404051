//! Test fixtures and helpers.
//!
//! Pre-built worlds for consistent testing.

use cosmic_core::config::EngineConfig;
use cosmic_core::model::{
    BuildingType, Coordinates, DefenseType, Defenses, Fleet, PlanetId, PlayerId, Resources,
    ShipType, Timestamp,
};
use cosmic_core::world::World;

/// A world with two neighbouring players.
#[derive(Debug, Clone)]
pub struct Duel {
    /// The world.
    pub world: World,
    /// First player, usually the one sending fleets.
    pub attacker: PlayerId,
    /// First player's homeworld.
    pub attacker_home: PlanetId,
    /// Second player.
    pub defender: PlayerId,
    /// Second player's homeworld.
    pub defender_home: PlanetId,
}

/// Homeworld slot of the attacker in [`duel`].
pub const ATTACKER_SLOT: Coordinates = Coordinates::new(1, 42, 4);

/// Homeworld slot of the defender in [`duel`].
pub const DEFENDER_SLOT: Coordinates = Coordinates::new(1, 42, 9);

/// Two players in the same system, created at `now`. The attacker holds
/// fuel and a few basic buildings.
///
/// # Panics
///
/// Panics if the default galaxy bounds exclude the fixture slots.
#[must_use]
pub fn duel(config: &EngineConfig, now: Timestamp) -> Duel {
    let mut world = World::new();
    let (attacker, attacker_home) = world
        .create_player("attacker", ATTACKER_SLOT, config, now)
        .expect("fixture slot is valid and free");
    let (defender, defender_home) = world
        .create_player("defender", DEFENDER_SLOT, config, now)
        .expect("fixture slot is valid and free");
    if let Some(home) = world.planets.get_mut(&attacker_home) {
        home.buildings.set(BuildingType::MetalMine, 5);
        home.buildings.set(BuildingType::CrystalMine, 3);
        home.buildings.set(BuildingType::SolarPlant, 6);
        home.buildings.set(BuildingType::Shipyard, 2);
        home.resources = Resources::new(5000.0, 5000.0, 5000.0);
    }
    Duel {
        world,
        attacker,
        attacker_home,
        defender,
        defender_home,
    }
}

/// A fleet of one ship type.
#[must_use]
pub fn ships(ship: ShipType, count: u64) -> Fleet {
    [(ship, count)].into_iter().collect()
}

/// Defenses of one type.
#[must_use]
pub fn defenses(defense: DefenseType, count: u64) -> Defenses {
    [(defense, count)].into_iter().collect()
}
