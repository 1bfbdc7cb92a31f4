//! Vendor CRUD handlers for the REST API.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use painel_core::repository::vendor::VendorFilter;
use painel_types::vendor::{CreateVendorRequest, UpdateVendorRequest, Vendor, VendorId};

use super::parse_id;
use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::extractors::query::VendorListQuery;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/vendors - Create a vendor.
pub async fn create_vendor(
    State(state): State<AppState>,
    _auth: Authenticated,
    Json(body): Json<CreateVendorRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vendor>>), AppError> {
    let start = Instant::now();
    let vendor = state.vendor_service.create_vendor(body).await?;
    let href = format!("/api/v1/vendors/{}", vendor.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::timed(vendor, start).with_link("self", &href)),
    ))
}

/// GET /api/v1/vendors - List vendors by name.
pub async fn list_vendors(
    State(state): State<AppState>,
    _auth: Authenticated,
    Query(query): Query<VendorListQuery>,
) -> Result<Json<ApiResponse<Vec<Vendor>>>, AppError> {
    let start = Instant::now();
    let filter = VendorFilter {
        search: query.search,
        limit: query.limit,
        offset: query.offset,
    };
    let vendors = state.vendor_service.list_vendors(Some(filter)).await?;
    Ok(Json(ApiResponse::timed(vendors, start)))
}

/// GET /api/v1/vendors/{id}
pub async fn get_vendor(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vendor>>, AppError> {
    let start = Instant::now();
    let id: VendorId = parse_id(&id, "vendor")?;
    let vendor = state.vendor_service.get_vendor(&id).await?;
    Ok(Json(ApiResponse::timed(vendor, start)))
}

/// PUT /api/v1/vendors/{id} - Partial update; absent fields are kept.
pub async fn update_vendor(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
    Json(body): Json<UpdateVendorRequest>,
) -> Result<Json<ApiResponse<Vendor>>, AppError> {
    let start = Instant::now();
    let id: VendorId = parse_id(&id, "vendor")?;
    let vendor = state.vendor_service.update_vendor(&id, body).await?;
    Ok(Json(ApiResponse::timed(vendor, start)))
}

/// DELETE /api/v1/vendors/{id}
pub async fn delete_vendor(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let id: VendorId = parse_id(&id, "vendor")?;
    state.vendor_service.delete_vendor(&id).await?;
    Ok(Json(ApiResponse::timed(
        serde_json::json!({"deleted": true, "id": id}),
        start,
    )))
}
