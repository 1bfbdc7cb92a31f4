//! Dashboard statistics over the conversation summaries table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status the chat agent records when it closed a conversation on its own.
pub const BOT_RESOLVED_STATUS: &str = "resolvida_bot";

/// Closed time range for dashboard queries. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Conversation count for one hour of the local day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyBucket {
    /// Label such as `"14h"`.
    pub hour: String,
    pub count: u32,
}

/// Headline numbers for the dashboard overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_conversations: i64,
    pub total_leads: i64,
    /// Percentage (0-100) of conversations resolved by the bot.
    pub bot_resolution_rate: f64,
    pub average_duration_seconds: f64,
    /// `average_duration_seconds` rendered as `"{m}m {s}s"`.
    pub average_duration: String,
    /// 24 buckets covering today in the configured local offset.
    pub conversations_by_hour: Vec<HourlyBucket>,
}

/// Render a duration in seconds as `"{minutes}m {seconds}s"`.
///
/// Seconds are rounded, minutes floored.
pub fn format_duration(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u64;
    let rest = (seconds % 60.0).round() as u64;
    format!("{minutes}m {rest}s")
}

/// Percentage of `part` over `total`, 0 when `total` is 0.
pub fn rate(part: i64, total: i64) -> f64 {
    if total > 0 {
        part as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}
