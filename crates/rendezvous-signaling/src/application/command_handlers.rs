//! Command handlers for the signaling store.
//!
//! Handlers read the clock once per command and hand that instant to the
//! store, so the expiry sweep and the mutation agree on "now".

use rendezvous_core::clock::Clock;
use rendezvous_core::command::Command;
use rendezvous_core::error::CoordinationError;
use rendezvous_core::token::TokenGenerator;
use tracing::{info, warn};

use crate::domain::commands::{AddIceCandidate, CreateSession};
use crate::domain::session::{CreatedSession, SessionPayload};
use crate::domain::store::SignalingSessionStore;

/// Handles the `CreateSession` command: validates the offer, stores a new
/// session and returns it together with the ICE-server list.
///
/// # Errors
///
/// Returns `CoordinationError::InvalidOffer` if the offer has no SDP.
/// Returns `CoordinationError::Infrastructure` on id exhaustion or a
/// poisoned store mutex.
pub fn handle_create_session(
    command: CreateSession,
    clock: &dyn Clock,
    tokens: &dyn TokenGenerator,
    store: &SignalingSessionStore,
) -> Result<CreatedSession, CoordinationError> {
    let correlation_id = command.correlation_id();
    let command_type = command.command_type();
    let has_token = command.token.is_some();

    match store.create_session(command.offer, command.token, clock.now(), tokens) {
        Ok(created) => {
            info!(
                %correlation_id,
                command = command_type,
                session_id = %created.session.session_id,
                expires_at = %created.session.expires_at,
                has_token,
                "signaling session created"
            );
            Ok(created)
        }
        Err(err) => {
            warn!(%correlation_id, command = command_type, error = %err, "session creation rejected");
            Err(err)
        }
    }
}

/// Handles the `AddIceCandidate` command, returning the updated session.
///
/// # Errors
///
/// Returns `CoordinationError::UnknownSession` if the session is missing or
/// expired.
/// Returns `CoordinationError::Infrastructure` if the store mutex is poisoned.
pub fn handle_add_ice_candidate(
    command: AddIceCandidate,
    clock: &dyn Clock,
    store: &SignalingSessionStore,
) -> Result<SessionPayload, CoordinationError> {
    let correlation_id = command.correlation_id();
    let command_type = command.command_type();

    let updated = store.add_ice_candidate(&command.session_id, command.candidate, clock.now())?;
    info!(
        %correlation_id,
        command = command_type,
        session_id = %updated.session_id,
        candidates = updated.ice_candidates.len(),
        "ice candidate added"
    );
    Ok(updated)
}

/// Sweeps expired sessions outside of any client request. Returns the number
/// of sessions removed.
///
/// # Errors
///
/// Returns `CoordinationError::Infrastructure` if the store mutex is poisoned.
pub fn handle_prune_expired(
    clock: &dyn Clock,
    store: &SignalingSessionStore,
) -> Result<usize, CoordinationError> {
    store.prune_expired(clock.now())
}
