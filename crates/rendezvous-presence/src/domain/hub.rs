//! The presence broadcast hub.
//!
//! One instance per server process, shared by every request handler. A
//! single mutex guards both the peer registry and the edit buffer, so every
//! operation is serialized against every other one. Nothing inside the
//! critical sections blocks or awaits, and events are logged only after the
//! guard is released.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rendezvous_core::error::CoordinationError;
use serde_json::Value;
use tracing::debug;

use super::peer::{OnlinePeers, PeerState};

/// Tracks connected peers and relays buffered edits to pollers.
#[derive(Debug, Default)]
pub struct PresenceHub {
    state: Mutex<HubState>,
}

#[derive(Debug, Default)]
struct HubState {
    peers: BTreeMap<String, PeerState>,
    pending: Vec<Value>,
}

impl HubState {
    fn snapshot(&self) -> OnlinePeers {
        OnlinePeers {
            online: self.peers.keys().cloned().collect(),
            users: self.peers.values().cloned().collect(),
        }
    }
}

/// Returns true for payloads the hub drops instead of buffering.
fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl PresenceHub {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HubState>, CoordinationError> {
        self.state
            .lock()
            .map_err(|e| CoordinationError::poisoned("presence hub", e))
    }

    /// Registers `peer_id` as online. An empty id is ignored; a repeated
    /// connect keeps membership unchanged but refreshes `last_seen` and, when
    /// given, the persona.
    ///
    /// # Errors
    ///
    /// Returns `CoordinationError::Infrastructure` if the hub mutex is poisoned.
    pub fn connect(
        &self,
        peer_id: &str,
        persona: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<OnlinePeers, CoordinationError> {
        let (came_online, peers) = {
            let mut state = self.lock()?;
            let mut came_online = false;
            if !peer_id.is_empty() {
                let persona = non_empty(persona);
                match state.peers.entry(peer_id.to_owned()) {
                    Entry::Occupied(mut entry) => {
                        let peer = entry.get_mut();
                        peer.last_seen = now;
                        if persona.is_some() {
                            peer.persona = persona;
                        }
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(PeerState::new(peer_id, persona, now));
                        came_online = true;
                    }
                }
            }
            (came_online, state.snapshot())
        };

        if came_online {
            debug!(peer_id, online = peers.online.len(), "peer came online");
        }
        Ok(peers)
    }

    /// Removes `peer_id` from the online set if present.
    ///
    /// # Errors
    ///
    /// Returns `CoordinationError::Infrastructure` if the hub mutex is poisoned.
    pub fn disconnect(&self, peer_id: &str) -> Result<OnlinePeers, CoordinationError> {
        let (went_offline, peers) = {
            let mut state = self.lock()?;
            let went_offline = state.peers.remove(peer_id).is_some();
            (went_offline, state.snapshot())
        };

        if went_offline {
            debug!(peer_id, online = peers.online.len(), "peer went offline");
        }
        Ok(peers)
    }

    /// Updates the chapter focus and/or persona of an online peer. Updates
    /// for peers that are not online are ignored; an update never connects.
    ///
    /// # Errors
    ///
    /// Returns `CoordinationError::Infrastructure` if the hub mutex is poisoned.
    pub fn update(
        &self,
        peer_id: &str,
        chapter: Option<u32>,
        persona: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<OnlinePeers, CoordinationError> {
        let mut state = self.lock()?;
        if let Some(peer) = state.peers.get_mut(peer_id) {
            peer.last_seen = now;
            if chapter.is_some() {
                peer.chapter = chapter;
            }
            if let Some(persona) = non_empty(persona) {
                peer.persona = Some(persona);
            }
        }
        Ok(state.snapshot())
    }

    /// Appends `payload` to the edit buffer. Empty payloads (`null`, `""`,
    /// `[]`, `{}`) are dropped. Returns whether the payload was queued.
    ///
    /// # Errors
    ///
    /// Returns `CoordinationError::Infrastructure` if the hub mutex is poisoned.
    pub fn submit_edit(&self, payload: Value) -> Result<bool, CoordinationError> {
        if is_empty_payload(&payload) {
            return Ok(false);
        }
        let mut state = self.lock()?;
        state.pending.push(payload);
        Ok(true)
    }

    /// Drains the edit buffer, returning its contents in submission order.
    ///
    /// # Errors
    ///
    /// Returns `CoordinationError::Infrastructure` if the hub mutex is poisoned.
    pub fn poll_edits(&self) -> Result<Vec<Value>, CoordinationError> {
        let mut state = self.lock()?;
        Ok(std::mem::take(&mut state.pending))
    }

    /// Returns the current online set without changing it.
    ///
    /// # Errors
    ///
    /// Returns `CoordinationError::Infrastructure` if the hub mutex is poisoned.
    pub fn online(&self) -> Result<OnlinePeers, CoordinationError> {
        Ok(self.lock()?.snapshot())
    }
}
