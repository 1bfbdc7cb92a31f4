//! Conversation-history handlers.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};

use painel_types::chat::{SessionDetail, SessionSummary};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/conversations - Session summaries, most recent first.
pub async fn list_sessions(
    State(state): State<AppState>,
    _auth: Authenticated,
) -> Result<Json<ApiResponse<Vec<SessionSummary>>>, AppError> {
    let start = Instant::now();
    let sessions = state.conversation_service.list_sessions().await?;
    Ok(Json(ApiResponse::timed(sessions, start)))
}

/// GET /api/v1/conversations/{session_id} - Full transcript of one session.
pub async fn get_session(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<SessionDetail>>, AppError> {
    let start = Instant::now();
    let detail = state.conversation_service.get_session(&session_id).await?;
    Ok(Json(ApiResponse::timed(detail, start)))
}
