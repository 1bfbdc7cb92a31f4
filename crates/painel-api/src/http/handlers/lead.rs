//! Lead CRUD handlers for the REST API.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use painel_core::repository::SortOrder;
use painel_core::repository::lead::LeadFilter;
use painel_types::lead::{CreateLeadRequest, Lead, LeadId, LeadStatus, UpdateLeadRequest};

use super::parse_id;
use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::extractors::query::LeadListQuery;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/leads - Create a lead.
pub async fn create_lead(
    State(state): State<AppState>,
    _auth: Authenticated,
    Json(body): Json<CreateLeadRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Lead>>), AppError> {
    let start = Instant::now();
    let lead = state.lead_service.create_lead(body).await?;
    let href = format!("/api/v1/leads/{}", lead.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::timed(lead, start).with_link("self", &href)),
    ))
}

/// GET /api/v1/leads - List leads with filtering, sorting and pagination.
pub async fn list_leads(
    State(state): State<AppState>,
    _auth: Authenticated,
    Query(query): Query<LeadListQuery>,
) -> Result<Json<ApiResponse<Vec<Lead>>>, AppError> {
    let start = Instant::now();

    let sort_order = match query.order.to_lowercase().as_str() {
        "asc" => SortOrder::Asc,
        _ => SortOrder::Desc,
    };
    let filter = LeadFilter {
        status: query.status.map(LeadStatus::from),
        search: query.search,
        sort_by: Some(query.sort),
        sort_order: Some(sort_order),
        limit: query.limit,
        offset: query.offset,
    };

    let leads = state.lead_service.list_leads(Some(filter)).await?;
    Ok(Json(ApiResponse::timed(leads, start).with_link("self", "/api/v1/leads")))
}

/// GET /api/v1/leads/{id} - Get a lead by ID.
pub async fn get_lead(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Lead>>, AppError> {
    let start = Instant::now();
    let id: LeadId = parse_id(&id, "lead")?;
    let lead = state.lead_service.get_lead(&id).await?;
    Ok(Json(ApiResponse::timed(lead, start)))
}

/// PUT /api/v1/leads/{id} - Replace a lead's editable fields.
pub async fn update_lead(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
    Json(body): Json<UpdateLeadRequest>,
) -> Result<Json<ApiResponse<Lead>>, AppError> {
    let start = Instant::now();
    let id: LeadId = parse_id(&id, "lead")?;
    let lead = state.lead_service.update_lead(&id, body).await?;
    Ok(Json(ApiResponse::timed(lead, start)))
}

/// DELETE /api/v1/leads/{id} - Delete a lead permanently.
pub async fn delete_lead(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let id: LeadId = parse_id(&id, "lead")?;
    state.lead_service.delete_lead(&id).await?;
    Ok(Json(ApiResponse::timed(
        serde_json::json!({"deleted": true, "id": id}),
        start,
    )))
}
