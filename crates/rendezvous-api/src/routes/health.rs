//! Liveness endpoint.
//!
//! Reports `degraded` instead of failing when a component lock is poisoned,
//! which separates a wedged process from a dead one.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Body of GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` if either component is unusable.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Peers currently online, if the hub is readable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peers_online: Option<usize>,
    /// Stored signaling sessions, if the store is readable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sessions_stored: Option<usize>,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let peers_online = state.presence_hub.online().ok().map(|p| p.online.len());
    let sessions_stored = state.signaling_store.session_count().ok();
    let status = if peers_online.is_some() && sessions_stored.is_some() {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        peers_online,
        sessions_stored,
    })
}

/// Returns the health router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
