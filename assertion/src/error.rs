use thiserror::Error;
use vouch_types::ProofService;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssertionParseError {
    #[error("empty assertion clause")]
    EmptyClause,

    #[error("unknown proof service: {0}")]
    UnknownService(String),

    #[error("bad key fingerprint in assertion: {0}")]
    BadFingerprint(String),

    #[error("bad username in assertion: {0}")]
    BadUsername(String),

    #[error("bad handle for {service}: {handle:?}")]
    BadHandle {
        service: ProofService,
        handle: String,
    },
}
