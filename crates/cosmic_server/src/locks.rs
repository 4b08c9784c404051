//! Per-player pass exclusion.
//!
//! Passes for different players run freely; two passes for the same player
//! never overlap. A pass that finds the player busy waits once for the
//! configured delay and retries, then gives up with a concurrency conflict
//! so the next sweep can pick the player up.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use cosmic_core::error::{GameError, Result};
use cosmic_core::model::PlayerId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::trace;

/// Held for the duration of one pass.
pub type PlayerGuard = OwnedMutexGuard<()>;

/// One lock per player, created on first use.
#[derive(Debug, Default)]
pub struct PlayerLocks {
    locks: Mutex<HashMap<PlayerId, Arc<AsyncMutex<()>>>>,
}

impl PlayerLocks {
    /// Create an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, player: PlayerId) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(player).or_default())
    }

    /// Take the player's lock if it is free.
    #[must_use]
    pub fn try_acquire(&self, player: PlayerId) -> Option<PlayerGuard> {
        self.slot(player).try_lock_owned().ok()
    }

    /// Take the player's lock, retrying once after `retry_delay`.
    pub async fn acquire(&self, player: PlayerId, retry_delay: Duration) -> Result<PlayerGuard> {
        if let Some(guard) = self.try_acquire(player) {
            return Ok(guard);
        }
        trace!(player = %player, "player busy, retrying");
        tokio::time::sleep(retry_delay).await;
        self.try_acquire(player)
            .ok_or(GameError::ConcurrencyConflict(player))
    }
}
