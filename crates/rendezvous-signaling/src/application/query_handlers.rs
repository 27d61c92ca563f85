//! Query handlers for the signaling store.
//!
//! Queries still sweep expired sessions before reading, so they take the
//! clock like the command handlers do.

use rendezvous_core::clock::Clock;
use rendezvous_core::error::CoordinationError;

use crate::domain::session::SessionPayload;
use crate::domain::store::SignalingSessionStore;

/// Retrieves a live session by id. Missing and expired sessions are `None`.
///
/// # Errors
///
/// Returns `CoordinationError::Infrastructure` if the store mutex is poisoned.
pub fn get_session_by_id(
    session_id: &str,
    clock: &dyn Clock,
    store: &SignalingSessionStore,
) -> Result<Option<SessionPayload>, CoordinationError> {
    store.get_session(session_id, clock.now())
}

/// Lists all live sessions.
///
/// # Errors
///
/// Returns `CoordinationError::Infrastructure` if the store mutex is poisoned.
pub fn list_sessions(
    clock: &dyn Clock,
    store: &SignalingSessionStore,
) -> Result<Vec<SessionPayload>, CoordinationError> {
    store.list_sessions(clock.now())
}
