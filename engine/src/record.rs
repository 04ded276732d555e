//! Loaded identity records and the loader boundary.

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use vouch_types::{
    IdentityId, IdentityKey, Proof, ProofService, ProofSet, ProofState, Timestamp, Username,
};

/// A social proof an identity has declared, unverified at load time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofClaim {
    pub service: ProofService,
    pub handle: String,
}

impl ProofClaim {
    pub fn new(service: ProofService, handle: impl Into<String>) -> Self {
        Self {
            service,
            handle: handle.into(),
        }
    }
}

/// A previously recorded trust statement one identity holds about another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackStatement {
    pub target: IdentityId,
    pub target_username: Username,
    /// The target's sigchain version at the time the statement was made.
    pub sigchain_version: u64,
    pub recorded_at: Timestamp,
}

impl TrackStatement {
    pub fn summary(&self) -> TrackSummary {
        TrackSummary {
            username: self.target_username.to_string(),
            sigchain_version: self.sigchain_version,
            recorded_at: self.recorded_at,
        }
    }
}

/// What the progress observer is told about a prior trust statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub username: String,
    pub sigchain_version: u64,
    pub recorded_at: Timestamp,
}

/// A loaded identity. Never mutated after load; all verification-time
/// mutation happens on the request's `VerificationState`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub id: IdentityId,
    pub username: Username,
    pub keys: Vec<IdentityKey>,
    /// Monotonic version of the identity's sigchain; bumps whenever its
    /// keys or proofs change. The slow cache tier compares against this.
    pub sigchain_version: u64,
    /// Declared social proofs, unverified at load.
    pub claims: Vec<ProofClaim>,
    /// Trust statements this identity holds about others. Only populated
    /// on the caller's own record.
    pub tracks: HashMap<IdentityId, TrackStatement>,
}

impl IdentityRecord {
    pub fn new(id: IdentityId, username: Username, sigchain_version: u64) -> Self {
        Self {
            id,
            username,
            keys: Vec::new(),
            sigchain_version,
            claims: Vec::new(),
            tracks: HashMap::new(),
        }
    }

    /// The proofs already verified when the record was loaded: the username
    /// itself and one fingerprint proof per key. Local assertion clauses
    /// check against this set.
    pub fn base_proof_set(&self) -> ProofSet {
        let mut set = ProofSet::new();
        set.add(Proof::username(self.username.as_str()));
        for key in &self.keys {
            set.add(Proof::fingerprint(key.fingerprint.to_hex()));
        }
        set
    }

    /// Declared social proofs as an unchecked proof set. This seeds the
    /// verification state; checking moves each proof out of `None`.
    pub fn claimed_proof_set(&self) -> ProofSet {
        let mut set = ProofSet::new();
        for claim in &self.claims {
            set.add(Proof::social(claim.service, claim.handle.clone(), ProofState::None));
        }
        set
    }

    pub fn track_for(&self, target: &IdentityId) -> Option<&TrackStatement> {
        self.tracks.get(target)
    }

    /// Export as the externally visible snapshot, with the record's own
    /// proof knowledge (base facts plus unchecked claims).
    pub fn export(&self, verified_at: Timestamp) -> IdentitySnapshot {
        let mut proofs = self.base_proof_set();
        proofs.merge(&self.claimed_proof_set());
        self.export_with_proofs(proofs, verified_at)
    }

    /// Export with an explicit proof set, e.g. the checked proofs of a
    /// finished verification.
    pub fn export_with_proofs(&self, proofs: ProofSet, verified_at: Timestamp) -> IdentitySnapshot {
        IdentitySnapshot {
            id: self.id,
            username: self.username.clone(),
            keys: self.keys.clone(),
            sigchain_version: self.sigchain_version,
            proofs,
            verified_at,
        }
    }
}

/// The externally visible identity-plus-keys result. Also what the result
/// cache stores.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdentitySnapshot {
    pub id: IdentityId,
    pub username: Username,
    pub keys: Vec<IdentityKey>,
    pub sigchain_version: u64,
    pub proofs: ProofSet,
    pub verified_at: Timestamp,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("not logged in")]
    NotLoggedIn,

    #[error("identity {0} not found")]
    NotFound(IdentityId),

    #[error("load failed: {0}")]
    Other(String),
}

/// Loads identity records from storage or the network.
pub trait IdentityLoader: Send + Sync {
    fn load_by_identifier<'a>(
        &'a self,
        id: &'a IdentityId,
    ) -> BoxFuture<'a, Result<IdentityRecord, LoadError>>;

    /// Load the caller's own record. `LoadError::NotLoggedIn` when there is
    /// no authenticated caller.
    fn load_self(&self) -> BoxFuture<'_, Result<IdentityRecord, LoadError>>;
}
