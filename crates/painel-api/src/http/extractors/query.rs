//! Query parameter extractors for list endpoints.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Query parameters for the lead list endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct LeadListQuery {
    /// Filter by pipeline status.
    pub status: Option<String>,
    /// Case-insensitive substring over name and contact.
    pub search: Option<String>,
    /// Sort field (name, status, created_at).
    #[serde(default = "default_sort")]
    pub sort: String,
    /// Sort order (asc, desc).
    #[serde(default = "default_order")]
    pub order: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn default_sort() -> String {
    "created_at".to_string()
}

fn default_order() -> String {
    "desc".to_string()
}

/// Query parameters for the vendor list endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct VendorListQuery {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for the product catalog.
#[derive(Debug, Deserialize, Default)]
pub struct ProductListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

/// Query parameters for the campaign list endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct CampaignListQuery {
    pub search: Option<String>,
    /// rascunho, processando, concluida, pausada.
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Optional RFC 3339 bounds for dashboard statistics.
#[derive(Debug, Deserialize, Default)]
pub struct StatsQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}
