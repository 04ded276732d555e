use thiserror::Error;
use vouch_assertion::AssertionParseError;
use vouch_types::ProofState;

/// Why an identify request failed.
///
/// Structural errors abort the request state machine immediately. Per-proof
/// failures accumulate inside the verification state and surface here only
/// through [`IdentifyError::ProofFailed`] (via the completion synchronizer)
/// or an unmet-assertion error at the end of a synchronous check.
#[derive(Debug, Error)]
pub enum IdentifyError {
    #[error("bad assertion: {0}")]
    Assertion(#[from] AssertionParseError),

    #[error("{username} does not satisfy the required local assertions")]
    UnmetLocalAssertion { username: String },

    #[error("{username} does not satisfy the required remote assertions")]
    UnmetRemoteAssertion { username: String },

    #[error("not logged in")]
    NotLoggedIn,

    #[error("failed to load identity {id}: {reason}")]
    Load { id: String, reason: String },

    #[error("proof {label} failed: {state}")]
    ProofFailed { label: String, state: ProofState },

    #[error("verification finished without resolving the requested assertions")]
    DidNotComplete,

    #[error("timed out waiting for proof results")]
    WaitTimeout,
}

impl IdentifyError {
    /// The unmet-assertion error for one side of the partition.
    pub fn unmet(username: impl Into<String>, remote: bool) -> Self {
        let username = username.into();
        if remote {
            Self::UnmetRemoteAssertion { username }
        } else {
            Self::UnmetLocalAssertion { username }
        }
    }
}
