//! Peer presence records and snapshots.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Presence record for one connected peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeerState {
    /// Opaque peer identifier chosen by the client.
    pub peer_id: String,
    /// Display name the peer announced, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
    /// Chapter of the shared document the peer is focused on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<u32>,
    /// Time of the peer's last connect or update.
    pub last_seen: DateTime<Utc>,
}

impl PeerState {
    pub(crate) fn new(peer_id: &str, persona: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            peer_id: peer_id.to_owned(),
            persona,
            chapter: None,
            last_seen: now,
        }
    }
}

/// Snapshot of the online set, returned by every registry operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OnlinePeers {
    /// Online peer ids, sorted.
    pub online: Vec<String>,
    /// Presence record of each online peer, in the same order as `online`.
    pub users: Vec<PeerState>,
}

impl OnlinePeers {
    /// Returns true if `peer_id` is in the snapshot.
    #[must_use]
    pub fn contains(&self, peer_id: &str) -> bool {
        self.online.iter().any(|id| id == peer_id)
    }
}
