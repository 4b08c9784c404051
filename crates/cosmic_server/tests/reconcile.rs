//! Full passes through the reconciler.

use std::sync::Arc;

use cosmic_core::catalog::Catalog;
use cosmic_core::error::GameError;
use cosmic_core::model::{
    BuildingType, Coordinates, MissionType, PlayerId, QueueKind, Resources, ShipType,
};
use cosmic_core::queue::EnqueueRequest;
use cosmic_server::{GameStore, MemoryStore, Reconciler, ServerConfig};
use cosmic_test_utils::fixtures::{duel, ships, Duel, DEFENDER_SLOT};

fn reconciler(state: &Duel) -> Reconciler<MemoryStore> {
    Reconciler::new(
        Arc::new(MemoryStore::new(state.world.clone())),
        Arc::new(Catalog::standard()),
        ServerConfig {
            conflict_retry_delay_ms: 1,
            ..ServerConfig::default()
        },
    )
}

#[tokio::test]
async fn test_mine_produces_one_hour_of_output() {
    let config = ServerConfig::default();
    let mut state = duel(&config.engine, 0);
    {
        let home = state.world.planet_mut(state.defender_home).unwrap();
        home.buildings.set(BuildingType::MetalMine, 5);
        home.buildings.set(BuildingType::SolarPlant, 10);
        home.resources = Resources::ZERO;
    }
    let reconciler = reconciler(&state);
    reconciler.advance_player(state.defender, 3600).await.unwrap();

    let catalog = Catalog::standard();
    let expected = catalog
        .building(BuildingType::MetalMine)
        .unwrap()
        .production_at(5);
    let home = reconciler
        .store()
        .read(|world| world.planet(state.defender_home).unwrap().clone());
    assert!((home.resources.metal - expected).abs() < 1e-6);
    assert!(home.build_queue.is_empty());
}

#[tokio::test]
async fn test_repeated_pass_is_idempotent() {
    let config = ServerConfig::default();
    let mut state = duel(&config.engine, 0);
    state
        .world
        .planet_mut(state.attacker_home)
        .unwrap()
        .fleet
        .add(ShipType::LightFighter, 10);
    let reconciler = reconciler(&state);
    let mission = reconciler
        .send_fleet(
            state.attacker_home,
            ships(ShipType::LightFighter, 10),
            DEFENDER_SLOT,
            MissionType::Attack,
            10,
        )
        .await
        .unwrap();

    reconciler
        .advance_player(state.attacker, mission.arrival_time)
        .await
        .unwrap();
    let once = reconciler.store().snapshot();
    reconciler
        .advance_player(state.attacker, mission.arrival_time)
        .await
        .unwrap();
    assert_eq!(reconciler.store().snapshot(), once);
    assert!(once.missions[&mission.id].processed_arrival);
}

#[tokio::test]
async fn test_send_without_fuel_leaves_planet_untouched() {
    let config = ServerConfig::default();
    let mut state = duel(&config.engine, 0);
    {
        let home = state.world.planet_mut(state.attacker_home).unwrap();
        home.fleet.add(ShipType::CargoShip, 5);
        home.resources.deuterium = 0.0;
        home.buildings.set(BuildingType::DeuteriumSynthesizer, 0);
    }
    let reconciler = reconciler(&state);
    let err = reconciler
        .send_fleet(
            state.attacker_home,
            ships(ShipType::CargoShip, 5),
            Coordinates::new(4, 100, 3),
            MissionType::Harvest,
            0,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, GameError::InsufficientFuel { .. }));

    let home = reconciler
        .store()
        .read(|world| world.planet(state.attacker_home).unwrap().clone());
    assert_eq!(home.fleet.get(ShipType::CargoShip), 5);
    assert_eq!(home.resources.deuterium, 0.0);
    assert!(reconciler.store().read(|world| world.missions.is_empty()));
}

#[tokio::test]
async fn test_colonize_occupied_slot_creates_nothing() {
    let config = ServerConfig::default();
    let mut state = duel(&config.engine, 0);
    state
        .world
        .planet_mut(state.attacker_home)
        .unwrap()
        .fleet
        .add(ShipType::ColonyShip, 1);
    let reconciler = reconciler(&state);
    let mission = reconciler
        .send_fleet(
            state.attacker_home,
            ships(ShipType::ColonyShip, 1),
            DEFENDER_SLOT,
            MissionType::Colonize,
            0,
        )
        .await
        .unwrap();
    reconciler
        .advance_player(state.attacker, mission.arrival_time)
        .await
        .unwrap();

    let world = reconciler.store().snapshot();
    assert!(world.missions.is_empty());
    assert_eq!(world.planets.len(), 2);
    assert_eq!(world.planet_at(DEFENDER_SLOT).unwrap().owner, state.defender);
}

#[tokio::test]
async fn test_enqueue_debits_and_queues() {
    let config = ServerConfig::default();
    let state = duel(&config.engine, 0);
    let reconciler = reconciler(&state);
    let item = reconciler
        .enqueue(
            state.attacker_home,
            EnqueueRequest::level(BuildingType::MetalMine, QueueKind::Building),
            0,
        )
        .await
        .unwrap();
    assert_eq!(item.target_level_or_amount, 6);

    let home = reconciler
        .store()
        .read(|world| world.planet(state.attacker_home).unwrap().clone());
    assert_eq!(home.build_queue, vec![item]);
    assert!(home.resources.metal < 5000.0);

    let rejected = reconciler
        .enqueue(
            state.attacker_home,
            EnqueueRequest::units(ShipType::Deathstar, 1),
            0,
        )
        .await;
    assert!(matches!(rejected, Err(GameError::RequirementsNotMet { .. })));
}

#[tokio::test]
async fn test_busy_player_is_deferred() {
    let config = ServerConfig::default();
    let state = duel(&config.engine, 0);
    let reconciler = reconciler(&state);
    let held = reconciler.locks().try_acquire(state.attacker).unwrap();

    let err = reconciler.advance_player(state.attacker, 10).await.unwrap_err();
    assert_eq!(err, GameError::ConcurrencyConflict(state.attacker));

    let report = reconciler.sweep(10_000).await;
    assert_eq!(report.deferred, vec![state.attacker]);
    assert_eq!(report.advanced, vec![state.defender]);

    drop(held);
    let report = reconciler.sweep(20_000).await;
    assert_eq!(report.advanced, vec![state.attacker, state.defender]);
    assert!(report.deferred.is_empty());

    let report = reconciler.sweep(20_100).await;
    assert!(report.advanced.is_empty());
}

#[tokio::test]
async fn test_unknown_player_fails() {
    let config = ServerConfig::default();
    let state = duel(&config.engine, 0);
    let reconciler = reconciler(&state);
    assert_eq!(
        reconciler.advance_player(PlayerId(999), 1).await.unwrap_err(),
        GameError::PlayerNotFound(PlayerId(999))
    );
}
