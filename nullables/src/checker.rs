//! Nullable proof-check engine — scripted results with pause points.

use futures_util::future::BoxFuture;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use vouch_engine::{CompletionListener, ProgressObserver, ProofCheckEngine, VerificationState};
use vouch_types::Proof;

/// One step of a scripted check: the proof result to emit, optionally held
/// until the test releases its gate.
#[derive(Clone)]
pub struct ScriptedProof {
    pub proof: Proof,
    pub gate: Option<Arc<Notify>>,
}

impl ScriptedProof {
    pub fn new(proof: Proof) -> Self {
        Self { proof, gate: None }
    }

    /// The step will wait on `gate` before emitting; release it with
    /// `gate.notify_one()`. A permit notified in advance is kept, so tests
    /// never race the checker.
    pub fn gated(proof: Proof, gate: Arc<Notify>) -> Self {
        Self {
            proof,
            gate: Some(gate),
        }
    }
}

/// A proof-check engine that replays a script instead of contacting proof
/// servers, honoring the real engine's contract: record on the state,
/// notify the listener per proof, then finish the state and signal
/// completion.
pub struct NullChecker {
    script: Mutex<Vec<ScriptedProof>>,
    invocations: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl NullChecker {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(Vec::new()),
            invocations: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn push(&self, step: ScriptedProof) {
        self.script.lock().unwrap().push(step);
    }

    /// How many times `identify` has been invoked.
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    /// How many invocations are currently running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// The most invocations ever observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for NullChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProofCheckEngine for NullChecker {
    fn identify<'a>(
        &'a self,
        state: Arc<VerificationState>,
        _force_recheck: bool,
        _observer: Arc<dyn ProgressObserver>,
        listener: Option<Arc<dyn CompletionListener>>,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(running, Ordering::SeqCst);

            let script: Vec<ScriptedProof> = self.script.lock().unwrap().clone();
            for step in script {
                if let Some(gate) = &step.gate {
                    gate.notified().await;
                }
                state.record_proof(step.proof.clone());
                if let Some(listener) = &listener {
                    listener.proof_checked(&step.proof);
                }
            }

            state.finish();
            if let Some(listener) = &listener {
                listener.check_done();
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        })
    }
}
