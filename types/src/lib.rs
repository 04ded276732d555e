//! Fundamental types for vouch.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: identity identifiers, usernames, key fingerprints, proof
//! services and states, proof sets, and timestamps.

pub mod error;
pub mod identity;
pub mod keys;
pub mod proof;
pub mod time;

pub use error::ParseError;
pub use identity::{IdentityId, Username};
pub use keys::{IdentityKey, KeyFingerprint, KeyKind};
pub use proof::{Proof, ProofKind, ProofService, ProofSet, ProofState};
pub use time::Timestamp;
