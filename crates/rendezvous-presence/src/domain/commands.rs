//! Commands for the presence hub.

use rendezvous_core::command::Command;
use serde_json::Value;
use uuid::Uuid;

/// Command to register a peer as online.
#[derive(Debug, Clone)]
pub struct ConnectPeer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The peer coming online.
    pub peer_id: String,
    /// Optional display name.
    pub persona: Option<String>,
}

impl Command for ConnectPeer {
    fn command_type(&self) -> &'static str {
        "presence.connect"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to remove a peer from the online set.
#[derive(Debug, Clone)]
pub struct DisconnectPeer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The peer going offline.
    pub peer_id: String,
}

impl Command for DisconnectPeer {
    fn command_type(&self) -> &'static str {
        "presence.disconnect"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to update what an online peer is working on.
#[derive(Debug, Clone)]
pub struct UpdatePeer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The peer to update.
    pub peer_id: String,
    /// New chapter focus, if changed.
    pub chapter: Option<u32>,
    /// New display name, if changed.
    pub persona: Option<String>,
}

impl Command for UpdatePeer {
    fn command_type(&self) -> &'static str {
        "presence.update"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to buffer an edit for the next poller.
#[derive(Debug, Clone)]
pub struct SubmitEdit {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Opaque edit payload.
    pub payload: Value,
}

impl Command for SubmitEdit {
    fn command_type(&self) -> &'static str {
        "presence.submit_edit"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to drain the edit buffer.
#[derive(Debug, Clone)]
pub struct PollEdits {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for PollEdits {
    fn command_type(&self) -> &'static str {
        "presence.poll_edits"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
