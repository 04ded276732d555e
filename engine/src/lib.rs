//! Identity verification core.
//!
//! The [`orchestrator::IdentifyEngine`] checks that a claimed remote identity
//! actually matches the live, observable proof state of that identity:
//!
//! 1. the caller's assertion splits into locally- and remotely-checkable
//!    clauses;
//! 2. concurrent verifications of the same target serialize through a
//!    per-identity singleflight lock;
//! 3. two cache tiers with different freshness policies short-circuit
//!    redundant network work;
//! 4. the proof-checking engine runs under one of three concurrency
//!    strategies, chosen by whether a prior trust relationship exists;
//! 5. a completion synchronizer unblocks the caller as soon as the subset of
//!    results it actually needs has resolved, independent of when the full
//!    check finishes.
//!
//! The proof-checking engine, identity loader, and progress observer are
//! capability traits; `vouch-nullables` provides deterministic doubles.

pub mod cache;
pub mod checker;
pub mod config;
pub mod error;
pub mod listener;
pub mod locktab;
pub mod observer;
pub mod orchestrator;
pub mod record;
pub mod state;

pub use cache::{CacheEntry, ResultCache, TokenCache, TrackToken};
pub use checker::{CompletionListener, ProofCheckEngine};
pub use config::{ConfigError, EngineConfig};
pub use error::IdentifyError;
pub use listener::CheckCompletedListener;
pub use locktab::{LockHandle, LockTable};
pub use observer::ProgressObserver;
pub use orchestrator::{IdentifyEngine, IdentifyRequest, IdentifyResult};
pub use record::{
    IdentityLoader, IdentityRecord, IdentitySnapshot, LoadError, ProofClaim, TrackStatement,
    TrackSummary,
};
pub use state::{CheckOutcome, VerificationState};
