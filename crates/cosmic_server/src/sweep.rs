//! Background idle sweep.

use std::sync::Arc;

use cosmic_core::model::Timestamp;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use crate::reconciler::Reconciler;
use crate::store::GameStore;

/// Sweep idle players every `sweep_interval_secs` until `shutdown` flips
/// to `true` or its sender is dropped.
///
/// Missed ticks are skipped rather than bunched: a late sweep already sees
/// all elapsed time.
pub async fn run_sweeper<S, C>(
    reconciler: Arc<Reconciler<S>>,
    clock: C,
    mut shutdown: watch::Receiver<bool>,
) where
    S: GameStore,
    C: Fn() -> Timestamp,
{
    let mut ticker = interval(reconciler.config().sweep_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(
        every_secs = reconciler.config().sweep_interval_secs,
        "sweeper started"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                reconciler.sweep(clock()).await;
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
    info!("sweeper stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameStore, MemoryStore, ServerConfig};
    use cosmic_core::catalog::Catalog;
    use cosmic_core::model::Coordinates;
    use cosmic_core::world::World;
    use std::time::Duration;

    #[tokio::test]
    async fn test_first_tick_sweeps_and_shutdown_stops() {
        let config = ServerConfig::default();
        let mut world = World::new();
        let (player, _) = world
            .create_player("idle", Coordinates::new(1, 1, 1), &config.engine, 0)
            .unwrap();
        let reconciler = Arc::new(Reconciler::new(
            Arc::new(MemoryStore::new(world)),
            Arc::new(Catalog::standard()),
            config,
        ));

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(run_sweeper(Arc::clone(&reconciler), || 10_000, rx));
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        let last_activity = reconciler
            .store()
            .read(|world| world.player(player).unwrap().last_activity);
        assert_eq!(last_activity, 10_000);
    }
}
