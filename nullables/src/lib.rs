//! Nullable collaborators for deterministic testing.
//!
//! The engine's external dependencies (identity loading, proof checking,
//! progress display) are trait seams. This crate provides implementations
//! that:
//! - return scripted, deterministic results
//! - can be paused and released programmatically (`tokio::sync::Notify`)
//! - never touch the filesystem or network
//!
//! Usage: swap the real collaborators for nullables in tests.

pub mod checker;
pub mod loader;
pub mod observer;

pub use checker::{NullChecker, ScriptedProof};
pub use loader::NullLoader;
pub use observer::{NullObserver, ObserverEvent};
