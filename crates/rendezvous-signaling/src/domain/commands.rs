//! Commands for the signaling store.

use rendezvous_core::command::Command;
use serde_json::Value;
use uuid::Uuid;

/// Command to open a negotiation session from an SDP offer.
#[derive(Debug, Clone)]
pub struct CreateSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Offer descriptor; must carry an `sdp` string.
    pub offer: Value,
    /// Optional opaque credential kept with the session.
    pub token: Option<String>,
}

impl Command for CreateSession {
    fn command_type(&self) -> &'static str {
        "signaling.create_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to attach an ICE candidate to a live session.
#[derive(Debug, Clone)]
pub struct AddIceCandidate {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Target session.
    pub session_id: String,
    /// Opaque candidate descriptor.
    pub candidate: Value,
}

impl Command for AddIceCandidate {
    fn command_type(&self) -> &'static str {
        "signaling.add_ice_candidate"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
