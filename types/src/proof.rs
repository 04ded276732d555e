//! Proofs and proof sets.
//!
//! A proof binds an identity to a fact: its username, one of its key
//! fingerprints, or a handle on an external service. A [`ProofSet`] is the
//! accumulated record of which proofs exist and what state checking has
//! left them in.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// External services a social proof can live on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProofService {
    Twitter,
    Github,
    Reddit,
    HackerNews,
    Dns,
    Https,
}

impl ProofService {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Github => "github",
            Self::Reddit => "reddit",
            Self::HackerNews => "hackernews",
            Self::Dns => "dns",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for ProofService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProofService {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "twitter" => Ok(Self::Twitter),
            "github" => Ok(Self::Github),
            "reddit" => Ok(Self::Reddit),
            "hackernews" => Ok(Self::HackerNews),
            "dns" => Ok(Self::Dns),
            "https" | "web" => Ok(Self::Https),
            other => Err(ParseError::UnknownService(other.to_string())),
        }
    }
}

/// The kind of fact a proof asserts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProofKind {
    /// The identity's username. Checkable from loaded data.
    Username,
    /// One of the identity's key fingerprints. Checkable from loaded data.
    Fingerprint,
    /// A handle on an external service. Checkable only by live verification.
    Social(ProofService),
}

impl fmt::Display for ProofKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username => write!(f, "username"),
            Self::Fingerprint => write!(f, "fingerprint"),
            Self::Social(service) => write!(f, "{service}"),
        }
    }
}

/// The outcome of checking a single proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofState {
    /// Declared but not yet checked.
    None,
    /// Checked and valid.
    Ok,
    /// Check failed in a way that may heal (network error, rate limit).
    TempFailure,
    /// Check failed permanently (proof content gone or wrong).
    PermFailure,
    /// The identity revoked this proof.
    Revoked,
}

impl ProofState {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::TempFailure | Self::PermFailure | Self::Revoked)
    }
}

impl fmt::Display for ProofState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Ok => "ok",
            Self::TempFailure => "temp failure",
            Self::PermFailure => "perm failure",
            Self::Revoked => "revoked",
        };
        write!(f, "{s}")
    }
}

/// A single proof: a kind, its value, and the state checking left it in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub kind: ProofKind,
    pub value: String,
    pub state: ProofState,
}

impl Proof {
    pub fn new(kind: ProofKind, value: impl Into<String>, state: ProofState) -> Self {
        Self {
            kind,
            value: value.into(),
            state,
        }
    }

    pub fn username(name: impl Into<String>) -> Self {
        Self::new(ProofKind::Username, name, ProofState::Ok)
    }

    pub fn fingerprint(hex: impl Into<String>) -> Self {
        Self::new(ProofKind::Fingerprint, hex, ProofState::Ok)
    }

    pub fn social(service: ProofService, handle: impl Into<String>, state: ProofState) -> Self {
        Self::new(ProofKind::Social(service), handle, state)
    }

    /// Human-readable label, e.g. `twitter:alice`.
    pub fn label(&self) -> String {
        format!("{}:{}", self.kind, self.value)
    }

    /// Whether this proof asserts the same fact as another, ignoring state.
    /// Values compare case-insensitively.
    pub fn same_fact(&self, kind: ProofKind, value: &str) -> bool {
        self.kind == kind && self.value.eq_ignore_ascii_case(value)
    }
}

/// An accumulating collection of proofs.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProofSet {
    proofs: Vec<Proof>,
}

impl ProofSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_proofs(proofs: Vec<Proof>) -> Self {
        Self { proofs }
    }

    /// Append a proof without looking at what is already present.
    pub fn add(&mut self, proof: Proof) {
        self.proofs.push(proof);
    }

    /// Replace the proof asserting the same fact, or append if absent.
    pub fn upsert(&mut self, proof: Proof) {
        match self
            .proofs
            .iter_mut()
            .find(|p| p.same_fact(proof.kind, &proof.value))
        {
            Some(existing) => *existing = proof,
            None => self.proofs.push(proof),
        }
    }

    /// Whether a proof asserting this fact is present, in any state.
    pub fn contains(&self, kind: ProofKind, value: &str) -> bool {
        self.proofs.iter().any(|p| p.same_fact(kind, value))
    }

    /// The subset of proofs currently in one of the given states.
    pub fn in_states(&self, states: &[ProofState]) -> ProofSet {
        ProofSet {
            proofs: self
                .proofs
                .iter()
                .filter(|p| states.contains(&p.state))
                .cloned()
                .collect(),
        }
    }

    /// Fold another set into this one, replacing proofs for facts both
    /// assert.
    pub fn merge(&mut self, other: &ProofSet) {
        for proof in other.iter() {
            self.upsert(proof.clone());
        }
    }

    /// Number of proofs in a failure state.
    pub fn failure_count(&self) -> usize {
        self.proofs.iter().filter(|p| p.state.is_failure()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Proof> {
        self.proofs.iter()
    }

    pub fn len(&self) -> usize {
        self.proofs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proofs.is_empty()
    }
}
