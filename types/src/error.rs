//! Parse errors for the textual forms of the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid identity id: {0}")]
    InvalidIdentityId(String),

    #[error("invalid key fingerprint: {0}")]
    InvalidFingerprint(String),

    #[error("invalid username: {0}")]
    InvalidUsername(String),

    #[error("unknown proof service: {0}")]
    UnknownService(String),
}
