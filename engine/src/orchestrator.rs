//! The verification orchestrator — the request state machine.
//!
//! Composes the assertion splitter, the dual-tier cache, the singleflight
//! lock table, and the completion synchronizer into the end-to-end identify
//! flow. Every stage is a potential early return; the singleflight lock is
//! a movable handle released on every exit path, either here or by the
//! background task it was handed to.

use crate::cache::{ResultCache, TokenCache};
use crate::checker::{CompletionListener, ProofCheckEngine};
use crate::config::EngineConfig;
use crate::error::IdentifyError;
use crate::listener::CheckCompletedListener;
use crate::locktab::{LockHandle, LockTable};
use crate::observer::ProgressObserver;
use crate::record::{IdentityLoader, IdentityRecord, LoadError};
use crate::state::VerificationState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use vouch_assertion::{parse_and_only, AssertionAnd, AssertionPartition};
use vouch_types::{IdentityId, ProofState, Timestamp};

/// A single identify request.
#[derive(Clone, Debug)]
pub struct IdentifyRequest {
    pub target: IdentityId,
    /// Caller-supplied assertion string; empty means "whoever this identity
    /// currently is".
    pub assertion: String,
    /// Cap on how long this request waits for its remote clauses to
    /// resolve, overriding the engine config. The background check is never
    /// cancelled by expiry.
    pub deadline: Option<Duration>,
}

impl IdentifyRequest {
    pub fn new(target: IdentityId, assertion: impl Into<String>) -> Self {
        Self {
            target,
            assertion: assertion.into(),
            deadline: None,
        }
    }
}

/// The externally visible outcome of a successful identify.
#[derive(Clone, Debug)]
pub struct IdentifyResult {
    pub snapshot: crate::record::IdentitySnapshot,
    pub completed_at: Timestamp,
}

/// The identity-verification orchestrator.
///
/// Cheap to clone; clones share the cache, token cache, and lock table, so
/// one engine instance per process is the expected shape.
#[derive(Clone)]
pub struct IdentifyEngine {
    loader: Arc<dyn IdentityLoader>,
    checker: Arc<dyn ProofCheckEngine>,
    cache: Arc<ResultCache>,
    tokens: Arc<TokenCache>,
    locks: Arc<LockTable>,
    config: EngineConfig,
}

impl IdentifyEngine {
    pub fn new(
        loader: Arc<dyn IdentityLoader>,
        checker: Arc<dyn ProofCheckEngine>,
        config: EngineConfig,
    ) -> Self {
        Self {
            loader,
            checker,
            cache: Arc::new(ResultCache::new(config.cache_long_timeout_secs)),
            tokens: Arc::new(TokenCache::new()),
            locks: Arc::new(LockTable::new()),
            config,
        }
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub fn tokens(&self) -> &Arc<TokenCache> {
        &self.tokens
    }

    pub fn locks(&self) -> &Arc<LockTable> {
        &self.locks
    }

    /// Drive one identify request to completion.
    pub async fn run(
        &self,
        req: &IdentifyRequest,
        observer: Arc<dyn ProgressObserver>,
    ) -> Result<IdentifyResult, IdentifyError> {
        tracing::debug!(id = %req.target, assertion = %req.assertion, "identify: start");

        // Singleflight: the handle is dropped (released) on every early
        // return below, and handed off at finish_verification.
        let lock = self.locks.acquire(&req.target).await;
        tracing::debug!(id = %req.target, "identify: singleflight lock acquired");

        let assertion = parse_and_only(&req.assertion)?;
        let parts = assertion.split();

        // The fast tier only serves requests that assert nothing.
        if parts.is_empty() {
            if let Some(snapshot) = self.cache.get_fast(&req.target, Timestamp::now()) {
                tracing::debug!(id = %req.target, "identify: fast cache hit");
                return Ok(IdentifyResult {
                    completed_at: snapshot.verified_at,
                    snapshot,
                });
            }
        }

        let me = match self.loader.load_self().await {
            Ok(record) => Some(record),
            Err(LoadError::NotLoggedIn) => {
                tracing::debug!("identify: no authenticated caller, anonymous read");
                None
            }
            Err(err) => {
                return Err(IdentifyError::Load {
                    id: "self".to_string(),
                    reason: err.to_string(),
                })
            }
        };

        let them = match self.loader.load_by_identifier(&req.target).await {
            Ok(record) => Arc::new(record),
            Err(err) => {
                return Err(IdentifyError::Load {
                    id: req.target.to_string(),
                    reason: err.to_string(),
                })
            }
        };

        if !parts.local.matches_set(&them.base_proof_set()) {
            return Err(IdentifyError::unmet(them.username.to_string(), false));
        }

        if me.as_ref().is_some_and(|m| m.id == them.id) {
            tracing::debug!(id = %req.target, "identify: self load");
            let now = Timestamp::now();
            return Ok(IdentifyResult {
                snapshot: them.export(now),
                completed_at: now,
            });
        }

        let use_remote = !parts.remote.is_empty();

        if !use_remote {
            if let Some(snapshot) = self.cache.get_slow(&them) {
                tracing::debug!(id = %req.target, "identify: slow cache hit, first check");
                return Ok(IdentifyResult {
                    completed_at: snapshot.verified_at,
                    snapshot,
                });
            }
        }

        let state = Arc::new(VerificationState::new(&them));
        let mut use_tracking = false;
        if let Some(me) = &me {
            if let Some(track) = me.track_for(&them.id) {
                use_tracking = true;
                state.set_track(track.clone());
            }
        }

        // Precompute the keys surfaced to the observer, before any network
        // check begins.
        let identify_keys = state.keys().to_vec();

        // Every remote clause must at least be *present* on the identity,
        // checked or not, before any network verification is paid for.
        let present = state.proofs_in_states(&[ProofState::None, ProofState::Ok]);
        if !parts.remote.matches_set(&present) {
            tracing::debug!(id = %req.target, "identify: remote assertions missing, early fail");
            return Err(IdentifyError::unmet(them.username.to_string(), true));
        }

        if use_remote {
            if let Some(snapshot) = self.cache.get_slow(&them) {
                tracing::debug!(id = %req.target, "identify: slow cache hit, second check");
                return Ok(IdentifyResult {
                    completed_at: snapshot.verified_at,
                    snapshot,
                });
            }
        }

        observer.start(&them.username);
        for key in &identify_keys {
            observer.display_key(key);
        }
        observer.report_last_track(state.track_summary().as_ref());

        self.finish_verification(req, them.clone(), state, parts, observer, lock, use_tracking)
            .await?;

        let now = Timestamp::now();
        tracing::debug!(id = %req.target, "identify: done");
        Ok(IdentifyResult {
            snapshot: them.export(now),
            completed_at: now,
        })
    }

    /// Dispatch to one of the three concurrency strategies. Whatever path is
    /// taken, `lock` ends up owned by exactly one finisher.
    #[allow(clippy::too_many_arguments)]
    async fn finish_verification(
        &self,
        req: &IdentifyRequest,
        them: Arc<IdentityRecord>,
        state: Arc<VerificationState>,
        parts: AssertionPartition,
        observer: Arc<dyn ProgressObserver>,
        lock: LockHandle,
        use_tracking: bool,
    ) -> Result<(), IdentifyError> {
        observer.launch_network_checks(&them.export(Timestamp::now()));

        if use_tracking {
            tracing::debug!(id = %req.target, "identify: tracked, full check in the foreground");
            return self
                .run_full_check(them, state, parts.remote, observer, None, lock)
                .await;
        }

        if parts.remote.is_empty() {
            tracing::debug!(id = %req.target, "identify: no remote assertions, full check in the background");
            let engine = self.clone();
            tokio::spawn(async move {
                if let Err(err) = engine
                    .run_full_check(them, state, AssertionAnd::empty(), observer, None, lock)
                    .await
                {
                    tracing::warn!(error = %err, "background identify check failed");
                }
            });
            return Ok(());
        }

        tracing::debug!(id = %req.target, "identify: remote assertions, waiting on partial results");
        let (tx, rx) = oneshot::channel();
        let listener = Arc::new(CheckCompletedListener::new(tx, parts.remote.clone()));
        let engine = self.clone();
        tokio::spawn(async move {
            // The remote conjunction is not re-verified here: the listener's
            // signal already carries that judgement to the waiting caller.
            if let Err(err) = engine
                .run_full_check(
                    them,
                    state,
                    AssertionAnd::empty(),
                    observer,
                    Some(listener as Arc<dyn CompletionListener>),
                    lock,
                )
                .await
            {
                tracing::warn!(error = %err, "background identify check failed");
            }
        });

        let deadline = req
            .deadline
            .or(self.config.wait_deadline_secs.map(Duration::from_secs));
        let signalled = match deadline {
            Some(limit) => match tokio::time::timeout(limit, rx).await {
                Ok(received) => received,
                Err(_elapsed) => {
                    tracing::warn!(id = %req.target, "identify: deadline expired waiting for proof results");
                    return Err(IdentifyError::WaitTimeout);
                }
            },
            None => rx.await,
        };
        // A dropped sender means the check ended without ever signalling.
        signalled.unwrap_or(Err(IdentifyError::DidNotComplete))
    }

    /// The full proof check, shared by all three strategies. Verifies
    /// `verify_remote` against OK-state proofs afterwards (empty for the
    /// strategies where the synchronizer owns that judgement), caches on
    /// success, and releases the lock.
    async fn run_full_check(
        &self,
        them: Arc<IdentityRecord>,
        state: Arc<VerificationState>,
        verify_remote: AssertionAnd,
        observer: Arc<dyn ProgressObserver>,
        listener: Option<Arc<dyn CompletionListener>>,
        lock: LockHandle,
    ) -> Result<(), IdentifyError> {
        self.checker
            .identify(state.clone(), false, observer.clone(), listener)
            .await;

        let token = self.tokens.insert(state.export_proofs());
        observer.report_track_token(&token);

        let result = if verify_remote.matches_set(&state.proofs_in_states(&[ProofState::Ok])) {
            Ok(())
        } else {
            Err(IdentifyError::unmet(state.username().to_string(), true))
        };

        if result.is_ok() {
            self.maybe_cache_result(&them, &state);
        }

        drop(lock);
        result
    }

    /// Cache the terminal snapshot — only a fully successful verification
    /// ever lands in the cache.
    fn maybe_cache_result(&self, them: &IdentityRecord, state: &VerificationState) {
        if !state.is_ok() {
            return;
        }
        let now = Timestamp::now();
        let mut proofs = them.base_proof_set();
        proofs.merge(&state.export_proofs());
        self.cache.insert(them.export_with_proofs(proofs, now), now);
        tracing::debug!(id = %them.id, "identify: cached successful result");
    }
}
