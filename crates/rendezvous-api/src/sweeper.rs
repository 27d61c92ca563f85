//! Background expiry sweep for the signaling store.
//!
//! The store already prunes on every call. The sweeper only bounds memory
//! while no client is talking to the server.

use std::time::Duration;

use rendezvous_signaling::application::command_handlers;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::state::AppState;

/// Spawns a task that prunes expired signaling sessions every `period`.
///
/// The task runs until it is aborted or the runtime shuts down.
pub fn spawn_session_sweeper(state: AppState, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match command_handlers::handle_prune_expired(
                state.clock.as_ref(),
                &state.signaling_store,
            ) {
                Ok(0) => {}
                Ok(removed) => debug!(removed, "expired signaling sessions swept"),
                Err(err) => warn!(error = %err, "signaling session sweep failed"),
            }
        }
    })
}
