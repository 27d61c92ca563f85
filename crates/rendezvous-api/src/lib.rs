//! Rendezvous API — the HTTP shim in front of the presence hub and the
//! signaling store.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod sweeper;

use axum::Router;
use axum::extract::DefaultBodyLimit;

use crate::state::AppState;

/// Largest request body accepted by any route.
pub const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Builds the full application router over `app_state`.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/presence", routes::presence::router())
        .nest("/api/v1/signaling", routes::signaling::router())
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .with_state(app_state)
}
