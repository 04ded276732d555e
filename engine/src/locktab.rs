//! Per-identity singleflight lock table.
//!
//! At most one full verification per target identity is ever in flight.
//! Locks on different identities never contend; a second request for the
//! same identity blocks until the first releases. The returned handle is a
//! movable value — the synchronous caller either drops it itself or hands
//! it to exactly one background task, which then owns the release.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use vouch_types::IdentityId;

pub struct LockTable {
    locks: Mutex<HashMap<IdentityId, Arc<Mutex<()>>>>,
}

/// An exclusive named lock. Dropping it is the release; ownership transfer
/// across tasks makes double release unrepresentable.
pub struct LockHandle {
    key: IdentityId,
    _guard: OwnedMutexGuard<()>,
}

impl LockHandle {
    pub fn key(&self) -> &IdentityId {
        &self.key
    }
}

impl LockTable {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Acquire the lock for one identity, waiting if another task holds it.
    pub async fn acquire(&self, key: &IdentityId) -> LockHandle {
        let slot = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(*key)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let guard = slot.lock_owned().await;
        LockHandle {
            key: *key,
            _guard: guard,
        }
    }

    /// Drop table entries no task currently holds or waits on.
    pub async fn cleanup(&self) {
        let mut locks = self.locks.lock().await;
        locks.retain(|_, slot| Arc::strong_count(slot) > 1);
    }

    /// Number of identities with a table entry (held or stale).
    pub async fn tracked_keys(&self) -> usize {
        self.locks.lock().await.len()
    }
}

impl Default for LockTable {
    fn default() -> Self {
        Self::new()
    }
}
