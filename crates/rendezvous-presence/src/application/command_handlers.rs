//! Command handlers for the presence hub.
//!
//! Each handler stamps the command with the current time where needed,
//! applies it to the hub, and logs it under its correlation ID.

use rendezvous_core::clock::Clock;
use rendezvous_core::command::Command;
use rendezvous_core::error::CoordinationError;
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::commands::{ConnectPeer, DisconnectPeer, PollEdits, SubmitEdit, UpdatePeer};
use crate::domain::hub::PresenceHub;
use crate::domain::peer::OnlinePeers;

/// Handles the `ConnectPeer` command and returns the resulting online set.
///
/// # Errors
///
/// Returns `CoordinationError::Infrastructure` if the hub mutex is poisoned.
pub fn handle_connect(
    command: &ConnectPeer,
    clock: &dyn Clock,
    hub: &PresenceHub,
) -> Result<OnlinePeers, CoordinationError> {
    let peers = hub.connect(&command.peer_id, command.persona.clone(), clock.now())?;
    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        peer_id = %command.peer_id,
        online = peers.online.len(),
        "peer connected"
    );
    Ok(peers)
}

/// Handles the `DisconnectPeer` command and returns the resulting online set.
///
/// # Errors
///
/// Returns `CoordinationError::Infrastructure` if the hub mutex is poisoned.
pub fn handle_disconnect(
    command: &DisconnectPeer,
    hub: &PresenceHub,
) -> Result<OnlinePeers, CoordinationError> {
    let peers = hub.disconnect(&command.peer_id)?;
    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        peer_id = %command.peer_id,
        online = peers.online.len(),
        "peer disconnected"
    );
    Ok(peers)
}

/// Handles the `UpdatePeer` command and returns the resulting online set.
///
/// # Errors
///
/// Returns `CoordinationError::Infrastructure` if the hub mutex is poisoned.
pub fn handle_update(
    command: &UpdatePeer,
    clock: &dyn Clock,
    hub: &PresenceHub,
) -> Result<OnlinePeers, CoordinationError> {
    let peers = hub.update(
        &command.peer_id,
        command.chapter,
        command.persona.clone(),
        clock.now(),
    )?;
    debug!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        peer_id = %command.peer_id,
        chapter = ?command.chapter,
        "peer updated"
    );
    Ok(peers)
}

/// Handles the `SubmitEdit` command. Returns whether the edit was buffered;
/// empty payloads are dropped without error.
///
/// # Errors
///
/// Returns `CoordinationError::Infrastructure` if the hub mutex is poisoned.
pub fn handle_submit_edit(
    command: SubmitEdit,
    hub: &PresenceHub,
) -> Result<bool, CoordinationError> {
    let correlation_id = command.correlation_id();
    let command_type = command.command_type();
    let queued = hub.submit_edit(command.payload)?;
    debug!(%correlation_id, command = command_type, queued, "edit submitted");
    Ok(queued)
}

/// Handles the `PollEdits` command, draining every buffered edit.
///
/// # Errors
///
/// Returns `CoordinationError::Infrastructure` if the hub mutex is poisoned.
pub fn handle_poll_edits(
    command: &PollEdits,
    hub: &PresenceHub,
) -> Result<Vec<Value>, CoordinationError> {
    let edits = hub.poll_edits()?;
    debug!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        drained = edits.len(),
        "edits polled"
    );
    Ok(edits)
}
