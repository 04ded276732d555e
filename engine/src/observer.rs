//! The progress-observer boundary (UI surface).

use crate::cache::TrackToken;
use crate::record::{IdentitySnapshot, TrackSummary};
use vouch_types::{IdentityKey, Username};

/// Receives verification lifecycle events. Implementations render progress
/// to a user; tests substitute a recorder.
pub trait ProgressObserver: Send + Sync {
    /// Verification of the named identity is starting.
    fn start(&self, username: &Username);

    /// One precomputed key on the identity, reported before network checks.
    fn display_key(&self, key: &IdentityKey);

    /// The caller's prior trust statement about the target, if any.
    fn report_last_track(&self, summary: Option<&TrackSummary>);

    /// Network checks are being launched against this in-progress snapshot.
    fn launch_network_checks(&self, snapshot: &IdentitySnapshot);

    /// The finished verification's token, usable to anchor a later track
    /// statement.
    fn report_track_token(&self, token: &TrackToken);
}
