//! The completion synchronizer.
//!
//! Sits between a background proof check and a caller that only needs a
//! subset of its results. Signals the caller as soon as that subset is
//! satisfied or anything fails — usually well before the full check ends.

use crate::checker::CompletionListener;
use crate::error::IdentifyError;
use std::sync::Mutex;
use tokio::sync::oneshot;
use vouch_assertion::AssertionAnd;
use vouch_types::{Proof, ProofSet};

type Signal = oneshot::Sender<Result<(), IdentifyError>>;

/// Accumulates proof results and resolves a single-use channel once the
/// needed clauses are settled.
pub struct CheckCompletedListener {
    inner: Mutex<ListenerInner>,
}

struct ListenerInner {
    /// Taken out on first signal; `None` afterwards, so a second signal is
    /// impossible.
    tx: Option<Signal>,
    needed: AssertionAnd,
    received: ProofSet,
    first_failure: Option<IdentifyError>,
    satisfied: bool,
}

impl CheckCompletedListener {
    pub fn new(tx: Signal, needed: AssertionAnd) -> Self {
        Self {
            inner: Mutex::new(ListenerInner {
                tx: Some(tx),
                needed,
                received: ProofSet::new(),
                first_failure: None,
                satisfied: false,
            }),
        }
    }

    fn respond(inner: &mut ListenerInner) {
        let Some(tx) = inner.tx.take() else {
            return;
        };
        let outcome = match inner.first_failure.take() {
            Some(err) => Err(err),
            None if inner.satisfied => Ok(()),
            // Checking ended without the needed clauses ever resolving —
            // an explicit failure, never an inferred success.
            None => Err(IdentifyError::DidNotComplete),
        };
        let _ = tx.send(outcome);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ListenerInner> {
        self.inner.lock().expect("listener lock poisoned")
    }
}

impl CompletionListener for CheckCompletedListener {
    fn proof_checked(&self, proof: &Proof) {
        let mut inner = self.lock();
        inner.received.add(proof.clone());

        if proof.state.is_failure() && inner.first_failure.is_none() {
            inner.first_failure = Some(IdentifyError::ProofFailed {
                label: proof.label(),
                state: proof.state,
            });
        }

        // Quadratic in the clause count, which in practice is tiny.
        inner.satisfied = inner.needed.matches_set(&inner.received);

        if inner.first_failure.is_some() || inner.satisfied {
            Self::respond(&mut inner);
        }
    }

    fn check_done(&self) {
        let mut inner = self.lock();
        Self::respond(&mut inner);
    }
}
