//! Message template handlers.

use std::time::Instant;

use axum::Json;
use axum::extract::State;

use painel_types::messaging::{SubmitTemplateRequest, TemplateCatalog, TemplateSubmission};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/templates - Submit a template for review.
pub async fn submit_template(
    State(state): State<AppState>,
    _auth: Authenticated,
    Json(body): Json<SubmitTemplateRequest>,
) -> Result<Json<ApiResponse<TemplateSubmission>>, AppError> {
    let start = Instant::now();
    let submission = state.template_service.submit_template(body).await?;
    Ok(Json(ApiResponse::timed(submission, start)))
}

/// GET /api/v1/templates - Registered templates split by approval.
pub async fn list_templates(
    State(state): State<AppState>,
    _auth: Authenticated,
) -> Result<Json<ApiResponse<TemplateCatalog>>, AppError> {
    let start = Instant::now();
    let catalog = state.template_service.catalog().await?;
    Ok(Json(ApiResponse::timed(catalog, start)))
}
