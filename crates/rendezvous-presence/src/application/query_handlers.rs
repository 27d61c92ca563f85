//! Query handlers for the presence hub.

use rendezvous_core::error::CoordinationError;

use crate::domain::hub::PresenceHub;
use crate::domain::peer::OnlinePeers;

/// Returns the current online set without modifying it.
///
/// # Errors
///
/// Returns `CoordinationError::Infrastructure` if the hub mutex is poisoned.
pub fn get_online_peers(hub: &PresenceHub) -> Result<OnlinePeers, CoordinationError> {
    hub.online()
}
