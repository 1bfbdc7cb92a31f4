//! Dashboard statistics endpoint.
//!
//! GET /api/v1/stats - Conversation totals, bot resolution rate, average
//! duration and today's hourly histogram.

use std::time::Instant;

use axum::Json;
use axum::extract::{Query, State};

use painel_types::stats::{DashboardStats, DateRange};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::extractors::query::StatsQuery;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/stats - Aggregate dashboard statistics.
///
/// `start`/`end` (RFC 3339) restrict the conversation counts; the hourly
/// histogram always covers the current local day.
pub async fn get_stats(
    State(state): State<AppState>,
    _auth: Authenticated,
    Query(query): Query<StatsQuery>,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let start = Instant::now();
    if let (Some(from), Some(to)) = (query.start, query.end) {
        if from > to {
            return Err(AppError::Validation("start must not be after end".to_string()));
        }
    }
    let range = DateRange {
        start: query.start,
        end: query.end,
    };
    let stats = state.dashboard_service.stats(&range).await?;
    Ok(Json(ApiResponse::timed(stats, start)))
}
