use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use super::utils::{extract_content, resolve_timeout};
use crate::config::PollConfig;
use crate::QueueManager;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub queue_manager: Arc<QueueManager>,
    pub poll: PollConfig,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushResponse {
    pub success: bool,
    pub message_id: String,
}

/// Kept as a string so a malformed value falls back to the default instead
/// of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct PollQuery {
    #[serde(default)]
    pub timeout: Option<String>,
}

/// POST /api/{queue} - submit a message
pub async fn push_message(
    State(state): State<AppState>,
    Path(queue): Path<String>,
    body: Bytes,
) -> Json<PushResponse> {
    let message = state.queue_manager.enqueue(&queue, extract_content(&body));

    Json(PushResponse {
        success: true,
        message_id: message.id,
    })
}

/// GET /api/{queue}?timeout=ms - take the oldest message, long polling when empty
pub async fn poll_message(
    State(state): State<AppState>,
    Path(queue): Path<String>,
    Query(query): Query<PollQuery>,
) -> Response {
    let timeout = resolve_timeout(query.timeout.as_deref(), &state.poll);

    match state.queue_manager.dequeue(&queue, timeout).await {
        Some(message) => Json(message).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
