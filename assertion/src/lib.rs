//! Identity assertion expressions.
//!
//! An assertion is a conjunction of claimed facts about an identity:
//! a username, a key fingerprint, a handle on an external service. Callers
//! write them as `+`-joined clauses (`alice+twitter:alice`). Clauses split
//! into a *local* subset, checkable from already-loaded identity data, and
//! a *remote* subset, checkable only against live proof state.

pub mod error;
pub mod expr;
pub mod parse;

pub use error::AssertionParseError;
pub use expr::{AssertionAnd, AssertionClause, AssertionPartition};
pub use parse::parse_and_only;
