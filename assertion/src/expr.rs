//! The assertion expression model: clauses, conjunctions, partitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use vouch_types::{KeyFingerprint, ProofKind, ProofService, ProofSet, Username};

/// A single claimed fact about an identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssertionClause {
    Username(Username),
    Fingerprint(KeyFingerprint),
    Social {
        service: ProofService,
        handle: String,
    },
}

impl AssertionClause {
    /// Remote clauses need live verification; local ones are checkable from
    /// already-loaded identity data.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Social { .. })
    }

    pub fn proof_kind(&self) -> ProofKind {
        match self {
            Self::Username(_) => ProofKind::Username,
            Self::Fingerprint(_) => ProofKind::Fingerprint,
            Self::Social { service, .. } => ProofKind::Social(*service),
        }
    }

    /// The value a matching proof must carry.
    pub fn value(&self) -> String {
        match self {
            Self::Username(name) => name.as_str().to_string(),
            Self::Fingerprint(fp) => fp.to_hex(),
            Self::Social { handle, .. } => handle.clone(),
        }
    }

    /// Presence match: does the set contain a proof asserting this fact?
    /// State filtering is the caller's job, applied when projecting the set.
    pub fn matched_by(&self, set: &ProofSet) -> bool {
        set.contains(self.proof_kind(), &self.value())
    }
}

impl fmt::Display for AssertionClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username(name) => write!(f, "{name}"),
            Self::Fingerprint(fp) => write!(f, "fp:{fp}"),
            Self::Social { service, handle } => write!(f, "{service}:{handle}"),
        }
    }
}

/// A conjunction of assertion clauses. The empty conjunction matches
/// everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionAnd {
    clauses: Vec<AssertionClause>,
}

impl AssertionAnd {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_clauses(clauses: Vec<AssertionClause>) -> Self {
        Self { clauses }
    }

    pub fn clauses(&self) -> &[AssertionClause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Whether every clause is matched by some proof in the set.
    pub fn matches_set(&self, set: &ProofSet) -> bool {
        self.clauses.iter().all(|c| c.matched_by(set))
    }

    /// Partition into local and remote conjunctions. Every clause lands in
    /// exactly one side.
    pub fn split(&self) -> AssertionPartition {
        let (remote, local): (Vec<_>, Vec<_>) =
            self.clauses.iter().cloned().partition(|c| c.is_remote());
        AssertionPartition {
            local: AssertionAnd { clauses: local },
            remote: AssertionAnd { clauses: remote },
        }
    }
}

impl fmt::Display for AssertionAnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.clauses.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join("+"))
    }
}

/// The local/remote split of an assertion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssertionPartition {
    pub local: AssertionAnd,
    pub remote: AssertionAnd,
}

impl AssertionPartition {
    /// True when the original assertion had no clauses at all.
    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.remote.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vouch_types::{Proof, ProofState};

    fn social(service: ProofService, handle: &str) -> AssertionClause {
        AssertionClause::Social {
            service,
            handle: handle.to_string(),
        }
    }

    #[test]
    fn split_puts_every_clause_on_exactly_one_side() {
        let and = AssertionAnd::from_clauses(vec![
            AssertionClause::Username(Username::new("alice").unwrap()),
            social(ProofService::Twitter, "alice"),
            AssertionClause::Fingerprint(KeyFingerprint::of_bytes(b"k")),
        ]);

        let parts = and.split();
        assert_eq!(parts.local.len(), 2);
        assert_eq!(parts.remote.len(), 1);
        assert_eq!(parts.local.len() + parts.remote.len(), and.len());
    }

    #[test]
    fn empty_conjunction_matches_anything() {
        let and = AssertionAnd::empty();
        assert!(and.matches_set(&ProofSet::new()));
    }

    #[test]
    fn matches_set_requires_all_clauses() {
        let and = AssertionAnd::from_clauses(vec![
            social(ProofService::Twitter, "alice"),
            social(ProofService::Github, "alice"),
        ]);

        let mut set = ProofSet::new();
        set.add(Proof::social(ProofService::Twitter, "alice", ProofState::None));
        assert!(!and.matches_set(&set));

        set.add(Proof::social(ProofService::Github, "alice", ProofState::None));
        assert!(and.matches_set(&set));
    }

    #[test]
    fn matching_ignores_proof_state() {
        let and = AssertionAnd::from_clauses(vec![social(ProofService::Twitter, "alice")]);
        let mut set = ProofSet::new();
        set.add(Proof::social(
            ProofService::Twitter,
            "alice",
            ProofState::PermFailure,
        ));
        assert!(and.matches_set(&set));
    }
}
