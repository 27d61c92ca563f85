//! Signaling session records and their wire payloads.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::config::IceServer;

/// SDP type tag carried by every answer.
pub const ANSWER_TYPE: &str = "answer";

/// Answer returned to the offering client.
///
/// The SDP is the offer's SDP echoed back verbatim: the store performs a
/// local-loop negotiation only. Forwarding the offer to a remote peer is the
/// job of whatever sits in front of the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAnswer {
    /// Always [`ANSWER_TYPE`].
    #[serde(rename = "type")]
    pub kind: String,
    /// Answer SDP.
    pub sdp: String,
    /// ICE servers the client should use.
    pub ice_servers: Vec<IceServer>,
}

impl SessionAnswer {
    pub(crate) fn echo(sdp: &str, ice_servers: &[IceServer]) -> Self {
        Self {
            kind: ANSWER_TYPE.to_owned(),
            sdp: sdp.to_owned(),
            ice_servers: ice_servers.to_vec(),
        }
    }
}

/// Server-side record of one offer/answer negotiation.
#[derive(Debug, Clone)]
pub struct SignalingSession {
    /// Opaque unique session identifier.
    pub session_id: String,
    /// The offer as submitted by the client.
    pub offer: Value,
    /// Answer computed at creation; never changes afterwards.
    pub answer: SessionAnswer,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time at which the session stops being observable.
    pub expires_at: DateTime<Utc>,
    /// ICE candidates in submission order.
    pub ice_candidates: Vec<Value>,
    /// Caller-supplied credential. Stored, never checked.
    pub token: Option<String>,
}

impl SignalingSession {
    /// A session is dead from `expires_at` onwards.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Serializable view of the session.
    #[must_use]
    pub fn to_payload(&self) -> SessionPayload {
        SessionPayload {
            session_id: self.session_id.clone(),
            answer: self.answer.clone(),
            expires_at: self.expires_at,
            ice_candidates: self.ice_candidates.clone(),
        }
    }
}

/// Wire form of a session, returned by every store operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    /// Session identifier.
    #[serde(rename = "sessionID")]
    pub session_id: String,
    /// The computed answer.
    pub answer: SessionAnswer,
    /// Expiry time (RFC 3339).
    pub expires_at: DateTime<Utc>,
    /// ICE candidates in submission order.
    pub ice_candidates: Vec<Value>,
}

/// Payload returned by session creation: the session plus the ICE servers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSession {
    /// The newly created session.
    #[serde(flatten)]
    pub session: SessionPayload,
    /// ICE servers the client should use.
    pub ice_servers: Vec<IceServer>,
}
