//! Shared application state.

use std::sync::Arc;

use rendezvous_core::clock::Clock;
use rendezvous_core::token::TokenGenerator;
use rendezvous_presence::domain::hub::PresenceHub;
use rendezvous_signaling::domain::config::SignalingConfig;
use rendezvous_signaling::domain::store::SignalingSessionStore;

/// Application state shared across all request handlers.
///
/// Cloning is cheap and every clone refers to the same hub and store; both
/// live from server start until shutdown.
#[derive(Clone)]
pub struct AppState {
    /// Time source for presence stamps and session expiry.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// Source of signaling session ids.
    pub tokens: Arc<dyn TokenGenerator + Send + Sync>,
    /// Presence registry and edit buffer.
    pub presence_hub: Arc<PresenceHub>,
    /// Signaling sessions.
    pub signaling_store: Arc<SignalingSessionStore>,
}

impl AppState {
    /// Create new application state with an empty hub and store.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock + Send + Sync>,
        tokens: Arc<dyn TokenGenerator + Send + Sync>,
        signaling_config: SignalingConfig,
    ) -> Self {
        Self {
            clock,
            tokens,
            presence_hub: Arc::new(PresenceHub::new()),
            signaling_store: Arc::new(SignalingSessionStore::new(signaling_config)),
        }
    }
}
