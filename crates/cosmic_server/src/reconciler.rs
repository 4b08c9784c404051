//! Entry points the service layer calls.
//!
//! Every entry point takes the owning player's lock, brings the player up to
//! date and then applies its own change, all inside one store transaction.

use std::sync::Arc;

use cosmic_core::catalog::Catalog;
use cosmic_core::error::{GameError, Result};
use cosmic_core::mission::{MissionEngine, SendRequest};
use cosmic_core::model::{
    Coordinates, Fleet, FleetMission, MissionType, Planet, PlanetId, PlayerId, QueueItem,
    Timestamp,
};
use cosmic_core::queue::{commit, EnqueueRequest, QueueEngine};
use cosmic_core::tick::{run_pass, PassReport};
use tracing::{debug, info, warn};

use crate::locks::{PlayerGuard, PlayerLocks};
use crate::store::GameStore;
use crate::ServerConfig;

/// Result of one idle sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Players brought up to date.
    pub advanced: Vec<PlayerId>,
    /// Players busy in another pass, left for the next sweep.
    pub deferred: Vec<PlayerId>,
    /// Players whose pass failed.
    pub failed: Vec<PlayerId>,
}

/// Runs passes and player actions against a store.
#[derive(Debug)]
pub struct Reconciler<S: GameStore> {
    store: Arc<S>,
    catalog: Arc<Catalog>,
    config: ServerConfig,
    locks: PlayerLocks,
}

impl<S: GameStore> Reconciler<S> {
    /// Create a reconciler.
    pub fn new(store: Arc<S>, catalog: Arc<Catalog>, config: ServerConfig) -> Self {
        Self {
            store,
            catalog,
            config,
            locks: PlayerLocks::new(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Per-player locks, shared with anything else that mutates players.
    pub fn locks(&self) -> &PlayerLocks {
        &self.locks
    }

    async fn lock(&self, player: PlayerId) -> Result<PlayerGuard> {
        self.locks
            .acquire(player, self.config.conflict_retry_delay())
            .await
    }

    fn owner_of(&self, planet: PlanetId) -> Result<PlayerId> {
        self.store
            .read(|world| world.planet(planet).map(|planet| planet.owner))
    }

    /// Run the full reconciliation pass for a player.
    pub async fn advance_player(&self, player: PlayerId, now: Timestamp) -> Result<PassReport> {
        let _guard = self.lock(player).await?;
        let engine = &self.config.engine;
        self.store
            .transaction(player, &[], |world| {
                run_pass(&self.catalog, engine, world, player, now)
            })
    }

    /// Queue a building, research, ship, defense or ship upgrade order on a
    /// planet. The owner's pass runs first so levels and stock are current.
    pub async fn enqueue(
        &self,
        planet: PlanetId,
        request: EnqueueRequest,
        now: Timestamp,
    ) -> Result<QueueItem> {
        let owner = self.owner_of(planet)?;
        let _guard = self.lock(owner).await?;
        let engine = &self.config.engine;
        let item = self.store.transaction(owner, &[], |world| {
            run_pass(&self.catalog, engine, world, owner, now)?;
            let target = world.planet(planet)?;
            let player = world.player(owner)?;
            let owned: Vec<&Planet> = world.planets_of(owner).collect();
            let plan = QueueEngine::new(&self.catalog, engine)
                .plan(target, player, &owned, request, now)?;
            Ok(commit(world.planet_mut(planet)?, plan))
        })?;
        debug!(
            planet = %planet,
            object = %item.object_id,
            end = item.end_time,
            "order queued"
        );
        Ok(item)
    }

    /// Dispatch ships from a planet.
    pub async fn send_fleet(
        &self,
        origin: PlanetId,
        fleet: Fleet,
        target: Coordinates,
        mission_type: MissionType,
        now: Timestamp,
    ) -> Result<FleetMission> {
        let owner = self.owner_of(origin)?;
        let _guard = self.lock(owner).await?;
        let engine = &self.config.engine;
        self.store.transaction(owner, &[target], |world| {
            run_pass(&self.catalog, engine, world, owner, now)?;
            MissionEngine::new(&self.catalog, engine).send(
                world,
                owner,
                SendRequest {
                    origin,
                    fleet,
                    target,
                    mission_type,
                },
                now,
            )
        })
    }

    /// Advance every player idle for at least the configured threshold.
    pub async fn sweep(&self, now: Timestamp) -> SweepReport {
        let threshold = self.config.idle_threshold_secs;
        let idle: Vec<PlayerId> = self.store.read(|world| {
            world
                .players
                .values()
                .filter(|player| now.saturating_sub(player.last_activity) >= threshold)
                .map(|player| player.id)
                .collect()
        });

        let mut report = SweepReport::default();
        for player in idle {
            match self.advance_player(player, now).await {
                Ok(_) => report.advanced.push(player),
                Err(GameError::ConcurrencyConflict(_)) => {
                    warn!(player = %player, "pass deferred to next sweep");
                    report.deferred.push(player);
                }
                Err(err) => {
                    warn!(player = %player, error = %err, "pass failed");
                    report.failed.push(player);
                }
            }
        }
        if !report.advanced.is_empty() || !report.deferred.is_empty() {
            info!(
                now,
                advanced = report.advanced.len(),
                deferred = report.deferred.len(),
                failed = report.failed.len(),
                "sweep complete"
            );
        }
        report
    }
}
