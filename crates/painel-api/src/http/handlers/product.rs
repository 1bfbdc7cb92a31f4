//! Product catalog handlers for the REST API.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use painel_core::service::product::ProductFilter;
use painel_types::product::{CreateProductRequest, Product, ProductId, UpdateProductRequest};

use super::parse_id;
use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::extractors::query::ProductListQuery;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/products
pub async fn create_product(
    State(state): State<AppState>,
    _auth: Authenticated,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), AppError> {
    let start = Instant::now();
    let product = state.product_service.create_product(body).await?;
    let href = format!("/api/v1/products/{}", product.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::timed(product, start).with_link("self", &href)),
    ))
}

/// GET /api/v1/products - Catalog with optional search and category filter.
pub async fn list_products(
    State(state): State<AppState>,
    _auth: Authenticated,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    let start = Instant::now();
    let filter = ProductFilter {
        search: query.search,
        category: query.category,
    };
    let products = state.product_service.list_products(filter).await?;
    Ok(Json(
        ApiResponse::timed(products, start).with_link("categories", "/api/v1/products/categories"),
    ))
}

/// GET /api/v1/products/categories - Distinct categories, sorted.
pub async fn list_categories(
    State(state): State<AppState>,
    _auth: Authenticated,
) -> Result<Json<ApiResponse<Vec<String>>>, AppError> {
    let start = Instant::now();
    let categories = state.product_service.list_categories().await?;
    Ok(Json(ApiResponse::timed(categories, start)))
}

/// GET /api/v1/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let start = Instant::now();
    let id: ProductId = parse_id(&id, "product")?;
    let product = state.product_service.get_product(&id).await?;
    Ok(Json(ApiResponse::timed(product, start)))
}

/// PUT /api/v1/products/{id} - Partial update; absent fields are kept.
pub async fn update_product(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let start = Instant::now();
    let id: ProductId = parse_id(&id, "product")?;
    let product = state.product_service.update_product(&id, body).await?;
    Ok(Json(ApiResponse::timed(product, start)))
}

/// DELETE /api/v1/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let id: ProductId = parse_id(&id, "product")?;
    state.product_service.delete_product(&id).await?;
    Ok(Json(ApiResponse::timed(
        serde_json::json!({"deleted": true, "id": id}),
        start,
    )))
}
