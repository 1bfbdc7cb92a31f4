//! Dashboard statistics service.

use chrono::{DateTime, Duration, FixedOffset, Offset, Timelike, Utc};
use painel_types::error::{ConversationError, RepositoryError};
use painel_types::stats::{
    BOT_RESOLVED_STATUS, DashboardStats, DateRange, HourlyBucket, format_duration, rate,
};

use crate::repository::conversation::ConversationStatsRepository;
use crate::repository::lead::LeadRepository;

/// Rows averaged for the mean conversation duration.
pub const DURATION_SAMPLE: i64 = 100;

fn storage(e: RepositoryError) -> ConversationError {
    ConversationError::StorageError(e.to_string())
}

/// Start of the local day containing `now`, expressed in UTC.
pub fn local_midnight(now: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    let local = now.with_timezone(&offset);
    let since_midnight = Duration::seconds(i64::from(local.num_seconds_from_midnight()))
        + Duration::nanoseconds(i64::from(local.nanosecond() % 1_000_000_000));
    (local - since_midnight).with_timezone(&Utc)
}

/// Count timestamps per local hour of day.
pub fn hourly_buckets(timestamps: &[DateTime<Utc>], offset: FixedOffset) -> Vec<HourlyBucket> {
    let mut counts = [0u32; 24];
    for ts in timestamps {
        counts[ts.with_timezone(&offset).hour() as usize] += 1;
    }
    counts
        .iter()
        .enumerate()
        .map(|(hour, count)| HourlyBucket {
            hour: format!("{hour}h"),
            count: *count,
        })
        .collect()
}

pub struct DashboardService<Cv: ConversationStatsRepository, L: LeadRepository> {
    conversations: Cv,
    leads: L,
    offset: FixedOffset,
}

impl<Cv: ConversationStatsRepository, L: LeadRepository> DashboardService<Cv, L> {
    /// `utc_offset_minutes` is the local offset used to find "today".
    /// Out-of-range offsets fall back to UTC.
    pub fn new(conversations: Cv, leads: L, utc_offset_minutes: i32) -> Self {
        let offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                tracing::warn!(utc_offset_minutes, "invalid UTC offset, using UTC");
                Utc.fix()
            });
        Self {
            conversations,
            leads,
            offset,
        }
    }

    pub async fn stats(&self, range: &DateRange) -> Result<DashboardStats, ConversationError> {
        self.stats_at(range, Utc::now()).await
    }

    /// Dashboard numbers as of `now`.
    pub async fn stats_at(
        &self,
        range: &DateRange,
        now: DateTime<Utc>,
    ) -> Result<DashboardStats, ConversationError> {
        let total_conversations = self.conversations.count(range).await.map_err(storage)?;
        let total_leads = self.leads.count().await.map_err(storage)?;
        let resolved = self
            .conversations
            .count_with_status(BOT_RESOLVED_STATUS, range)
            .await
            .map_err(storage)?;

        let durations = self
            .conversations
            .durations(range, DURATION_SAMPLE)
            .await
            .map_err(storage)?;
        let average_duration_seconds = if durations.is_empty() {
            0.0
        } else {
            durations.iter().sum::<i64>() as f64 / durations.len() as f64
        };

        let today = self
            .conversations
            .created_since(local_midnight(now, self.offset))
            .await
            .map_err(storage)?;

        Ok(DashboardStats {
            total_conversations,
            total_leads,
            bot_resolution_rate: rate(resolved, total_conversations),
            average_duration_seconds,
            average_duration: format_duration(average_duration_seconds),
            conversations_by_hour: hourly_buckets(&today, self.offset),
        })
    }
}
