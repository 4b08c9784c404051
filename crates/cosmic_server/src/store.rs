//! Storage boundary.
//!
//! The engine only ever sees a `&mut World`. A store decides where that
//! world lives and guarantees that a transaction's changes land together
//! or not at all. A transaction sees the records one player's pass can
//! reach, not the whole world.

use std::sync::{Mutex, PoisonError};

use cosmic_core::error::Result;
use cosmic_core::model::{Coordinates, PlayerId};
use cosmic_core::world::World;

/// Where game records live.
pub trait GameStore: Send + Sync + 'static {
    /// Run `f` against a consistent snapshot.
    fn read<R>(&self, f: impl FnOnce(&World) -> R) -> R;

    /// Run `f` against the records reachable from `player`'s pass (plus
    /// `slots`) and keep its changes only if it returns `Ok`.
    fn transaction<R>(
        &self,
        player: PlayerId,
        slots: &[Coordinates],
        f: impl FnOnce(&mut World) -> Result<R>,
    ) -> Result<R>;
}

/// A store that keeps the whole world in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    world: Mutex<World>,
}

impl MemoryStore {
    /// Wrap an existing world.
    #[must_use]
    pub fn new(world: World) -> Self {
        Self {
            world: Mutex::new(world),
        }
    }

    /// Copy of the current world.
    #[must_use]
    pub fn snapshot(&self) -> World {
        self.read(World::clone)
    }
}

impl GameStore for MemoryStore {
    fn read<R>(&self, f: impl FnOnce(&World) -> R) -> R {
        let world = self.world.lock().unwrap_or_else(PoisonError::into_inner);
        f(&world)
    }

    fn transaction<R>(
        &self,
        player: PlayerId,
        slots: &[Coordinates],
        f: impl FnOnce(&mut World) -> Result<R>,
    ) -> Result<R> {
        let mut world = self.world.lock().unwrap_or_else(PoisonError::into_inner);
        let scope = world.scope_of(player, slots);
        let mut draft = world.extract(&scope);
        let value = f(&mut draft)?;
        world.absorb(&scope, draft);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmic_core::config::EngineConfig;
    use cosmic_core::error::GameError;
    use cosmic_core::model::{MissionId, Resources};

    fn two_players() -> (MemoryStore, PlayerId, PlayerId) {
        let config = EngineConfig::default();
        let mut world = World::new();
        let (alice, _) = world
            .create_player("alice", Coordinates::new(1, 1, 1), &config, 0)
            .unwrap();
        let (bob, _) = world
            .create_player("bob", Coordinates::new(3, 3, 3), &config, 0)
            .unwrap();
        (MemoryStore::new(world), alice, bob)
    }

    #[test]
    fn test_failed_transaction_is_discarded() {
        let (store, alice, _) = two_players();
        let before = store.snapshot();
        let result: Result<()> = store.transaction(alice, &[], |world| {
            world.player_mut(alice)?.credits = 50.0;
            world.add_debris(Coordinates::new(1, 1, 1), &Resources::new(10.0, 0.0, 0.0));
            Err(GameError::MissionNotFound(MissionId(1)))
        });
        assert!(result.is_err());
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_transaction_sees_only_its_scope() {
        let (store, alice, bob) = two_players();
        store
            .transaction(alice, &[Coordinates::new(2, 2, 2)], |world| {
                assert!(world.player(bob).is_err());
                assert_eq!(world.planets.len(), 1);
                world.player_mut(alice)?.credits = 50.0;
                world.add_debris(Coordinates::new(2, 2, 2), &Resources::new(10.0, 0.0, 0.0));
                Ok(())
            })
            .unwrap();
        let world = store.snapshot();
        assert_eq!(world.players.len(), 2);
        assert_eq!(world.planets.len(), 2);
        assert_eq!(world.player(alice).unwrap().credits, 50.0);
        assert_eq!(world.debris.len(), 1);
    }
}
