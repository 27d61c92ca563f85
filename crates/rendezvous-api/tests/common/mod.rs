//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use rendezvous_core::clock::Clock;
use rendezvous_core::token::TokenGenerator;
use rendezvous_signaling::domain::config::{IceServer, SignalingConfig};
use rendezvous_test_support::{FixedClock, ManualClock, SequenceTokens};
use tower::ServiceExt;

use rendezvous_api::build_router;
use rendezvous_api::state::AppState;

/// Session TTL used across all integration tests.
pub const TEST_TTL_SECS: u64 = 120;

/// Fixed timestamp used across all integration tests.
pub fn test_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

fn test_config() -> SignalingConfig {
    SignalingConfig::new(
        TEST_TTL_SECS,
        vec![IceServer::from_url("stun:stun.example.org:3478")],
    )
}

fn build_with_clock(clock: Arc<dyn Clock + Send + Sync>) -> Router {
    let tokens: Arc<dyn TokenGenerator + Send + Sync> = Arc::new(SequenceTokens::default());
    build_router(AppState::new(clock, tokens, test_config()))
}

/// Build the full app router with a fixed clock and sequential session ids
/// (`token-1`, `token-2`, ...). Uses the same route structure as `main.rs`.
///
/// Clones of the returned router share one hub and one store.
pub fn build_test_app() -> Router {
    build_with_clock(Arc::new(FixedClock(test_start())))
}

/// Build the full app router over a clock the test can move forward.
pub fn build_test_app_with_manual_clock() -> (Router, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(test_start()));
    (build_with_clock(clock.clone()), clock)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}
