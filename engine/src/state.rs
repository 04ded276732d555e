//! Request-scoped verification state.

use crate::record::{IdentityRecord, TrackStatement, TrackSummary};
use std::sync::{Mutex, MutexGuard};
use vouch_types::{IdentityId, IdentityKey, Proof, ProofSet, ProofState, Username};

/// The terminal outcome of a full proof check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckOutcome {
    pub proofs_checked: usize,
    pub failures: usize,
}

impl CheckOutcome {
    pub fn is_ok(&self) -> bool {
        self.failures == 0
    }
}

/// Mutable accumulator for one verification.
///
/// Exclusively owned by one request, but written by that request's
/// background check task while the completion synchronizer observes it.
/// All cross-task access goes through the interior lock; callers only ever
/// see projected copies of the proof set.
pub struct VerificationState {
    target: IdentityId,
    username: Username,
    keys: Vec<IdentityKey>,
    inner: Mutex<StateInner>,
}

struct StateInner {
    proofs: ProofSet,
    track: Option<TrackStatement>,
    outcome: Option<CheckOutcome>,
}

impl VerificationState {
    /// Build a fresh state for a target, seeded with its declared claims in
    /// the unchecked state.
    pub fn new(them: &IdentityRecord) -> Self {
        Self {
            target: them.id,
            username: them.username.clone(),
            keys: them.keys.clone(),
            inner: Mutex::new(StateInner {
                proofs: them.claimed_proof_set(),
                track: None,
                outcome: None,
            }),
        }
    }

    fn inner(&self) -> MutexGuard<'_, StateInner> {
        self.inner.lock().expect("verification state lock poisoned")
    }

    pub fn target(&self) -> &IdentityId {
        &self.target
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    /// The keys to surface to the observer, precomputed before any network
    /// check begins.
    pub fn keys(&self) -> &[IdentityKey] {
        &self.keys
    }

    pub fn set_track(&self, track: TrackStatement) {
        self.inner().track = Some(track);
    }

    pub fn track_summary(&self) -> Option<TrackSummary> {
        self.inner().track.as_ref().map(|t| t.summary())
    }

    /// Record one checked proof, replacing its unchecked placeholder.
    pub fn record_proof(&self, proof: Proof) {
        self.inner().proofs.upsert(proof);
    }

    /// Compute and store the terminal outcome from the accumulated proofs.
    /// Called by the proof-check engine once all proofs are checked.
    pub fn finish(&self) {
        let mut inner = self.inner();
        let checked = inner
            .proofs
            .iter()
            .filter(|p| p.state != ProofState::None)
            .count();
        let failures = inner.proofs.failure_count();
        inner.outcome = Some(CheckOutcome {
            proofs_checked: checked,
            failures,
        });
    }

    pub fn outcome(&self) -> Option<CheckOutcome> {
        self.inner().outcome
    }

    /// Whether the check finished fully successfully. Only such results are
    /// ever cached.
    pub fn is_ok(&self) -> bool {
        self.inner().outcome.is_some_and(|o| o.is_ok())
    }

    /// Projected copy of the proofs currently in one of the given states.
    pub fn proofs_in_states(&self, states: &[ProofState]) -> ProofSet {
        self.inner().proofs.in_states(states)
    }

    /// Copy of the full accumulated proof set.
    pub fn export_proofs(&self) -> ProofSet {
        self.inner().proofs.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ProofClaim;
    use vouch_types::ProofService;

    fn them() -> IdentityRecord {
        let mut rec = IdentityRecord::new(
            IdentityId::new([2; 16]),
            Username::new("bob").unwrap(),
            1,
        );
        rec.claims.push(ProofClaim::new(ProofService::Twitter, "bob"));
        rec.claims.push(ProofClaim::new(ProofService::Github, "bob"));
        rec
    }

    #[test]
    fn seeded_proofs_are_unchecked() {
        let state = VerificationState::new(&them());
        assert_eq!(state.proofs_in_states(&[ProofState::None]).len(), 2);
        assert!(state.outcome().is_none());
        assert!(!state.is_ok());
    }

    #[test]
    fn recording_moves_a_proof_out_of_none() {
        let state = VerificationState::new(&them());
        state.record_proof(Proof::social(ProofService::Twitter, "bob", ProofState::Ok));

        assert_eq!(state.proofs_in_states(&[ProofState::None]).len(), 1);
        assert_eq!(state.proofs_in_states(&[ProofState::Ok]).len(), 1);
    }

    #[test]
    fn finish_counts_failures() {
        let state = VerificationState::new(&them());
        state.record_proof(Proof::social(ProofService::Twitter, "bob", ProofState::Ok));
        state.record_proof(Proof::social(
            ProofService::Github,
            "bob",
            ProofState::PermFailure,
        ));
        state.finish();

        let outcome = state.outcome().unwrap();
        assert_eq!(outcome.proofs_checked, 2);
        assert_eq!(outcome.failures, 1);
        assert!(!state.is_ok());
    }

    #[test]
    fn finish_with_no_proofs_is_ok() {
        let rec = IdentityRecord::new(
            IdentityId::new([3; 16]),
            Username::new("carol").unwrap(),
            1,
        );
        let state = VerificationState::new(&rec);
        state.finish();
        assert!(state.is_ok());
    }
}
