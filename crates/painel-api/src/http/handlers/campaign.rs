//! Campaign handlers: creation, listing, send records and dispatch.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use painel_core::dispatch::DispatchProgress;
use painel_core::repository::campaign::CampaignFilter;
use painel_types::campaign::{
    Campaign, CampaignId, CampaignSend, CampaignStatus, CreateCampaignRequest,
    CreateTemplateCampaignRequest,
};

use super::parse_id;
use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::extractors::query::CampaignListQuery;
use crate::http::response::ApiResponse;
use crate::state::AppState;

fn campaign_response(campaign: Campaign, start: Instant) -> ApiResponse<Campaign> {
    let href = format!("/api/v1/campaigns/{}", campaign.id);
    let sends = format!("{href}/sends");
    let dispatch = format!("{href}/dispatch");
    ApiResponse::timed(campaign, start)
        .with_link("self", &href)
        .with_link("sends", &sends)
        .with_link("dispatch", &dispatch)
}

/// POST /api/v1/campaigns - Create a text or image campaign.
pub async fn create_campaign(
    State(state): State<AppState>,
    _auth: Authenticated,
    Json(body): Json<CreateCampaignRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Campaign>>), AppError> {
    let start = Instant::now();
    let campaign = state.campaign_service.create_campaign(body).await?;
    Ok((StatusCode::CREATED, Json(campaign_response(campaign, start))))
}

/// POST /api/v1/campaigns/template - Create a campaign that sends a template.
pub async fn create_template_campaign(
    State(state): State<AppState>,
    _auth: Authenticated,
    Json(body): Json<CreateTemplateCampaignRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Campaign>>), AppError> {
    let start = Instant::now();
    let campaign = state.campaign_service.create_template_campaign(body).await?;
    Ok((StatusCode::CREATED, Json(campaign_response(campaign, start))))
}

/// GET /api/v1/campaigns - Newest first, with search and status filter.
pub async fn list_campaigns(
    State(state): State<AppState>,
    _auth: Authenticated,
    Query(query): Query<CampaignListQuery>,
) -> Result<Json<ApiResponse<Vec<Campaign>>>, AppError> {
    let start = Instant::now();
    let status = query
        .status
        .as_deref()
        .map(str::parse::<CampaignStatus>)
        .transpose()
        .map_err(AppError::Validation)?;
    let filter = CampaignFilter {
        search: query.search,
        status,
        limit: query.limit,
        offset: query.offset,
    };
    let campaigns = state.campaign_service.list_campaigns(Some(filter)).await?;
    Ok(Json(ApiResponse::timed(campaigns, start)))
}

/// GET /api/v1/campaigns/{id}
pub async fn get_campaign(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Campaign>>, AppError> {
    let start = Instant::now();
    let id: CampaignId = parse_id(&id, "campaign")?;
    let campaign = state.campaign_service.get_campaign(&id).await?;
    Ok(Json(campaign_response(campaign, start)))
}

/// DELETE /api/v1/campaigns/{id} - Delete a campaign and its send records.
pub async fn delete_campaign(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let id: CampaignId = parse_id(&id, "campaign")?;
    state.campaign_service.delete_campaign(&id).await?;
    Ok(Json(ApiResponse::timed(
        serde_json::json!({"deleted": true, "id": id}),
        start,
    )))
}

/// GET /api/v1/campaigns/{id}/sends - Per-recipient send records.
pub async fn list_sends(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<CampaignSend>>>, AppError> {
    let start = Instant::now();
    let id: CampaignId = parse_id(&id, "campaign")?;
    let sends = state.campaign_service.list_sends(&id).await?;
    Ok(Json(ApiResponse::timed(sends, start)))
}

/// POST /api/v1/campaigns/{id}/dispatch - Start sending in the background.
///
/// The campaign is claimed (moved to `processando`) before answering, so a
/// second request for the same campaign gets `409`. Missing credentials and
/// unknown campaigns are refused the same way. Otherwise answers
/// `202 Accepted`; progress is visible through the campaign's counters and
/// send records.
pub async fn dispatch_campaign(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<serde_json::Value>>), AppError> {
    let start = Instant::now();
    let id: CampaignId = parse_id(&id, "campaign")?;
    let campaign = state.campaign_service.start_dispatch(&id).await?;
    let audience = campaign.audience;
    let total_targets = campaign.total_targets;

    let service = state.campaign_service.clone();
    tokio::spawn(async move {
        let on_progress = |progress: DispatchProgress| {
            tracing::debug!(
                campaign = %id,
                processed = progress.processed,
                total = progress.total,
                "dispatch progress"
            );
        };
        match service.dispatch_claimed(&campaign, &on_progress).await {
            Ok(summary) => tracing::info!(
                campaign = %id,
                sent = summary.sent,
                failed = summary.failed,
                "background dispatch finished"
            ),
            Err(e) => tracing::warn!(campaign = %id, error = %e, "background dispatch failed"),
        }
    });

    let href = format!("/api/v1/campaigns/{id}");
    let resp = ApiResponse::timed(
        serde_json::json!({
            "id": id,
            "status": "processando",
            "audience": audience,
            "total_targets": total_targets,
        }),
        start,
    )
    .with_link("self", &href);

    Ok((StatusCode::ACCEPTED, Json(resp)))
}

/// POST /api/v1/campaigns/{id}/release - Free a campaign stuck in `processando`.
pub async fn release_campaign(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Campaign>>, AppError> {
    let start = Instant::now();
    let id: CampaignId = parse_id(&id, "campaign")?;
    let campaign = state.campaign_service.release_campaign(&id).await?;
    Ok(Json(campaign_response(campaign, start)))
}
