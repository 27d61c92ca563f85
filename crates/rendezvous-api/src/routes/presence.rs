//! Routes for the presence hub.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use rendezvous_presence::application::{command_handlers, query_handlers};
use rendezvous_presence::domain::commands;
use rendezvous_presence::domain::peer::OnlinePeers;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /connect.
#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    /// The peer coming online. A missing or empty id is ignored.
    #[serde(default)]
    pub id: String,
    /// Optional display name.
    #[serde(default)]
    pub persona: Option<String>,
}

/// Request body for POST /disconnect.
#[derive(Debug, Deserialize)]
pub struct DisconnectRequest {
    /// The peer going offline.
    #[serde(default)]
    pub id: String,
}

/// Request body for POST /update.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    /// The peer to update.
    #[serde(default)]
    pub id: String,
    /// Chapter the peer is now working on.
    #[serde(default)]
    pub chapter: Option<u32>,
    /// New display name.
    #[serde(default)]
    pub persona: Option<String>,
}

/// Response body for POST /edit.
#[derive(Debug, Serialize)]
pub struct EditAccepted {
    /// `queued` when the edit was buffered, `ignored` when it was empty.
    pub status: &'static str,
}

/// POST /connect
#[instrument(skip(state, request), fields(peer_id = %request.id))]
async fn connect(
    State(state): State<AppState>,
    Json(request): Json<ConnectRequest>,
) -> Result<Json<OnlinePeers>, ApiError> {
    let command = commands::ConnectPeer {
        correlation_id: Uuid::new_v4(),
        peer_id: request.id,
        persona: request.persona,
    };

    info!(correlation_id = %command.correlation_id, "handling connect command");

    let peers =
        command_handlers::handle_connect(&command, state.clock.as_ref(), &state.presence_hub)?;

    Ok(Json(peers))
}

/// POST /disconnect
#[instrument(skip(state, request), fields(peer_id = %request.id))]
async fn disconnect(
    State(state): State<AppState>,
    Json(request): Json<DisconnectRequest>,
) -> Result<Json<OnlinePeers>, ApiError> {
    let command = commands::DisconnectPeer {
        correlation_id: Uuid::new_v4(),
        peer_id: request.id,
    };

    info!(correlation_id = %command.correlation_id, "handling disconnect command");

    let peers = command_handlers::handle_disconnect(&command, &state.presence_hub)?;

    Ok(Json(peers))
}

/// POST /update
#[instrument(skip(state, request), fields(peer_id = %request.id))]
async fn update(
    State(state): State<AppState>,
    Json(request): Json<UpdateRequest>,
) -> Result<Json<OnlinePeers>, ApiError> {
    let command = commands::UpdatePeer {
        correlation_id: Uuid::new_v4(),
        peer_id: request.id,
        chapter: request.chapter,
        persona: request.persona,
    };

    info!(correlation_id = %command.correlation_id, "handling update command");

    let peers =
        command_handlers::handle_update(&command, state.clock.as_ref(), &state.presence_hub)?;

    Ok(Json(peers))
}

/// GET /online
#[instrument(skip(state))]
async fn online(State(state): State<AppState>) -> Result<Json<OnlinePeers>, ApiError> {
    let peers = query_handlers::get_online_peers(&state.presence_hub)?;
    Ok(Json(peers))
}

/// POST /edit
#[instrument(skip(state, payload))]
async fn submit_edit(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<EditAccepted>), ApiError> {
    let command = commands::SubmitEdit {
        correlation_id: Uuid::new_v4(),
        payload,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_edit command");

    let queued = command_handlers::handle_submit_edit(command, &state.presence_hub)?;
    let status = if queued { "queued" } else { "ignored" };

    Ok((StatusCode::ACCEPTED, Json(EditAccepted { status })))
}

/// GET /poll
#[instrument(skip(state))]
async fn poll_edits(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let command = commands::PollEdits {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling poll_edits command");

    let edits = command_handlers::handle_poll_edits(&command, &state.presence_hub)?;

    Ok(Json(edits))
}

/// Returns the router for the presence hub.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/connect", post(connect))
        .route("/disconnect", post(disconnect))
        .route("/update", post(update))
        .route("/online", get(online))
        .route("/edit", post(submit_edit))
        .route("/poll", get(poll_edits))
}
