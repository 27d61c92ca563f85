//! Routes for the signaling session store.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use rendezvous_signaling::application::{command_handlers, query_handlers};
use rendezvous_signaling::domain::commands;
use rendezvous_signaling::domain::session::{CreatedSession, SessionPayload};

use crate::error::{ApiError, ErrorBody};
use crate::state::AppState;

/// Request body for POST /sessions.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// The SDP offer. Validated by the store, so any JSON is accepted here.
    #[serde(default)]
    pub offer: Value,
    /// Caller credential, stored with the session.
    #[serde(default)]
    pub token: Option<String>,
}

/// Request body for POST /sessions/{session_id}/candidates.
#[derive(Debug, Deserialize)]
pub struct AddCandidateRequest {
    /// Opaque ICE candidate.
    #[serde(default)]
    pub candidate: Value,
}

/// POST /sessions
#[instrument(skip(state, request))]
async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<CreatedSession>), ApiError> {
    let command = commands::CreateSession {
        correlation_id: Uuid::new_v4(),
        offer: request.offer,
        token: request.token,
    };

    info!(correlation_id = %command.correlation_id, "handling create_session command");

    let created = command_handlers::handle_create_session(
        command,
        state.clock.as_ref(),
        state.tokens.as_ref(),
        &state.signaling_store,
    )?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /sessions
#[instrument(skip(state))]
async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<Vec<SessionPayload>>, ApiError> {
    let sessions = query_handlers::list_sessions(state.clock.as_ref(), &state.signaling_store)?;
    Ok(Json(sessions))
}

/// GET /sessions/{session_id}
#[instrument(skip(state))]
async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Response, ApiError> {
    let session =
        query_handlers::get_session_by_id(&session_id, state.clock.as_ref(), &state.signaling_store)?;

    Ok(match session {
        Some(payload) => Json(payload).into_response(),
        None => ErrorBody {
            error: "session_not_found",
            message: format!("session not found: {session_id}"),
        }
        .into_response_with(StatusCode::NOT_FOUND),
    })
}

/// POST /sessions/{session_id}/candidates
#[instrument(skip(state, request))]
async fn add_ice_candidate(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<AddCandidateRequest>,
) -> Result<Json<SessionPayload>, ApiError> {
    let command = commands::AddIceCandidate {
        correlation_id: Uuid::new_v4(),
        session_id,
        candidate: request.candidate,
    };

    info!(correlation_id = %command.correlation_id, "handling add_ice_candidate command");

    let updated = command_handlers::handle_add_ice_candidate(
        command,
        state.clock.as_ref(),
        &state.signaling_store,
    )?;

    Ok(Json(updated))
}

/// Returns the router for the signaling store.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(create_session).get(list_sessions))
        .route("/sessions/{session_id}", get(get_session))
        .route("/sessions/{session_id}/candidates", post(add_ice_candidate))
}
