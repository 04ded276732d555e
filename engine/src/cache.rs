//! The dual-tier result cache and the track-token cache.
//!
//! Both are process-wide and injected into the orchestrator; neither is
//! ambient state. Only fully successful verifications are ever inserted, so
//! a cache hit always means "this identity verified cleanly not long ago".

use crate::record::{IdentityRecord, IdentitySnapshot};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use vouch_types::{IdentityId, ProofSet, Timestamp};

/// A cached verification result.
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub snapshot: IdentitySnapshot,
    pub cached_at: Timestamp,
}

/// Process-wide verification result cache, keyed by the target's stable
/// identifier regardless of which assertion reached it.
pub struct ResultCache {
    long_timeout_secs: u64,
    entries: Mutex<HashMap<IdentityId, CacheEntry>>,
}

impl ResultCache {
    pub fn new(long_timeout_secs: u64) -> Self {
        Self {
            long_timeout_secs,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<IdentityId, CacheEntry>> {
        self.entries.lock().expect("result cache lock poisoned")
    }

    /// Record a fully successful verification.
    pub fn insert(&self, snapshot: IdentitySnapshot, now: Timestamp) {
        self.entries().insert(
            snapshot.id,
            CacheEntry {
                snapshot,
                cached_at: now,
            },
        );
    }

    pub fn get(&self, id: &IdentityId) -> Option<CacheEntry> {
        self.entries().get(id).cloned()
    }

    /// Fast tier: accept any entry younger than the long timeout. Only legal
    /// when the request carries no assertions at all.
    pub fn get_fast(&self, id: &IdentityId, now: Timestamp) -> Option<IdentitySnapshot> {
        let entry = self.get(id)?;
        if entry.cached_at.has_expired(self.long_timeout_secs, now) {
            return None;
        }
        Some(entry.snapshot)
    }

    /// Slow tier: accept an entry only while the target's live sigchain
    /// version still matches what was cached — a content test, not an age
    /// test. A recent entry can still be behind a proof revocation; a
    /// version match cannot.
    pub fn get_slow(&self, them: &IdentityRecord) -> Option<IdentitySnapshot> {
        let entry = self.get(&them.id)?;
        if entry.snapshot.sigchain_version != them.sigchain_version {
            return None;
        }
        Some(entry.snapshot)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// An opaque handle to a finished verification's proof set, handed to the
/// observer so a later track statement can reference the exact result the
/// user saw.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TrackToken(String);

impl TrackToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mints track tokens and holds the proof sets they point at.
pub struct TokenCache {
    next: AtomicU64,
    entries: Mutex<HashMap<TrackToken, ProofSet>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert(&self, proofs: ProofSet) -> TrackToken {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        let token = TrackToken(format!("tok-{n:08x}"));
        self.entries
            .lock()
            .expect("token cache lock poisoned")
            .insert(token.clone(), proofs);
        token
    }

    /// Consume a token, returning the proof set it referenced.
    pub fn take(&self, token: &TrackToken) -> Option<ProofSet> {
        self.entries
            .lock()
            .expect("token cache lock poisoned")
            .remove(token)
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::IdentityRecord;
    use vouch_types::Username;

    fn record(version: u64) -> IdentityRecord {
        IdentityRecord::new(
            IdentityId::new([7; 16]),
            Username::new("alice").unwrap(),
            version,
        )
    }

    fn snapshot(version: u64, at: u64) -> IdentitySnapshot {
        record(version).export(Timestamp::new(at))
    }

    #[test]
    fn fast_tier_honors_age() {
        let cache = ResultCache::new(3600);
        cache.insert(snapshot(1, 100), Timestamp::new(100));

        let id = IdentityId::new([7; 16]);
        assert!(cache.get_fast(&id, Timestamp::new(160)).is_some());
        assert!(cache.get_fast(&id, Timestamp::new(100 + 3600)).is_none());
    }

    #[test]
    fn fast_tier_ignores_content() {
        let cache = ResultCache::new(3600);
        cache.insert(snapshot(1, 100), Timestamp::new(100));

        // A version bump on the live record does not matter to the fast tier.
        assert!(cache
            .get_fast(&IdentityId::new([7; 16]), Timestamp::new(200))
            .is_some());
    }

    #[test]
    fn slow_tier_honors_version_not_age() {
        let cache = ResultCache::new(3600);
        cache.insert(snapshot(1, 100), Timestamp::new(100));

        // Same version: acceptable no matter how old the entry is.
        assert!(cache.get_slow(&record(1)).is_some());
        // Bumped version: stale content, rejected.
        assert!(cache.get_slow(&record(2)).is_none());
    }

    #[test]
    fn miss_on_unknown_identity() {
        let cache = ResultCache::new(3600);
        assert!(cache
            .get_fast(&IdentityId::new([9; 16]), Timestamp::new(0))
            .is_none());
        assert!(cache.get_slow(&record(1)).is_none());
    }

    #[test]
    fn tokens_are_unique_and_single_use() {
        let tokens = TokenCache::new();
        let a = tokens.insert(ProofSet::new());
        let b = tokens.insert(ProofSet::new());
        assert_ne!(a, b);

        assert!(tokens.take(&a).is_some());
        assert!(tokens.take(&a).is_none());
    }
}
