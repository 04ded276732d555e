//! Nullable identity loader — in-memory records.

use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use vouch_engine::{IdentityLoader, IdentityRecord, LoadError};
use vouch_types::IdentityId;

/// An in-memory identity loader.
///
/// `load_self` returns `NotLoggedIn` until [`NullLoader::set_self`] is
/// called. Target loads are counted so tests can assert that cache hits
/// skip loading entirely.
pub struct NullLoader {
    records: Mutex<HashMap<IdentityId, IdentityRecord>>,
    self_id: Mutex<Option<IdentityId>>,
    target_loads: AtomicUsize,
}

impl NullLoader {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            self_id: Mutex::new(None),
            target_loads: AtomicUsize::new(0),
        }
    }

    pub fn add(&self, record: IdentityRecord) {
        self.records.lock().unwrap().insert(record.id, record);
    }

    /// Make the identity with this id the authenticated caller.
    pub fn set_self(&self, id: IdentityId) {
        *self.self_id.lock().unwrap() = Some(id);
    }

    /// How many times `load_by_identifier` has run.
    pub fn target_loads(&self) -> usize {
        self.target_loads.load(Ordering::SeqCst)
    }
}

impl Default for NullLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityLoader for NullLoader {
    fn load_by_identifier<'a>(
        &'a self,
        id: &'a IdentityId,
    ) -> BoxFuture<'a, Result<IdentityRecord, LoadError>> {
        Box::pin(async move {
            self.target_loads.fetch_add(1, Ordering::SeqCst);
            self.records
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .ok_or(LoadError::NotFound(*id))
        })
    }

    fn load_self(&self) -> BoxFuture<'_, Result<IdentityRecord, LoadError>> {
        Box::pin(async move {
            let id = (*self.self_id.lock().unwrap()).ok_or(LoadError::NotLoggedIn)?;
            self.records
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or(LoadError::NotFound(id))
        })
    }
}
