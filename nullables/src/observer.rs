//! Nullable progress observer — records every lifecycle event.

use std::sync::Mutex;
use vouch_engine::{IdentitySnapshot, ProgressObserver, TrackSummary, TrackToken};
use vouch_types::{IdentityKey, Username};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObserverEvent {
    Start(String),
    /// Hex fingerprint of a surfaced key.
    DisplayKey(String),
    /// Username from the prior track statement, if one existed.
    LastTrack(Option<String>),
    /// Username on the in-progress snapshot.
    LaunchNetworkChecks(String),
    TrackToken(TrackToken),
}

/// Records observer events for assertions.
pub struct NullObserver {
    events: Mutex<Vec<ObserverEvent>>,
}

impl NullObserver {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<ObserverEvent> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: ObserverEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl Default for NullObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for NullObserver {
    fn start(&self, username: &Username) {
        self.push(ObserverEvent::Start(username.to_string()));
    }

    fn display_key(&self, key: &IdentityKey) {
        self.push(ObserverEvent::DisplayKey(key.fingerprint.to_hex()));
    }

    fn report_last_track(&self, summary: Option<&TrackSummary>) {
        self.push(ObserverEvent::LastTrack(
            summary.map(|s| s.username.clone()),
        ));
    }

    fn launch_network_checks(&self, snapshot: &IdentitySnapshot) {
        self.push(ObserverEvent::LaunchNetworkChecks(
            snapshot.username.to_string(),
        ));
    }

    fn report_track_token(&self, token: &TrackToken) {
        self.push(ObserverEvent::TrackToken(token.clone()));
    }
}
