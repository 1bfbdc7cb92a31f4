//! SQLite campaign and send-record repository implementation.

use painel_core::repository::campaign::{CampaignFilter, CampaignRepository};
use painel_types::campaign::{
    Audience, Campaign, CampaignId, CampaignSend, CampaignStatus, DispatchSummary, Recipient,
    SendId, SendOutcome, SendStatus,
};
use painel_types::error::RepositoryError;
use painel_types::lead::LeadId;
use painel_types::vendor::VendorId;
use chrono::Utc;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, like_pattern, parse_datetime, push_pagination, query_error};

pub struct SqliteCampaignRepository {
    pool: DatabasePool,
}

impl SqliteCampaignRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Campaign.
struct CampaignRow {
    id: String,
    name: String,
    message: String,
    image_url: Option<String>,
    template_name: Option<String>,
    audience: String,
    status: String,
    total_targets: i64,
    sent: i64,
    failed: i64,
    created_at: String,
    updated_at: String,
}

impl CampaignRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            message: row.try_get("message")?,
            image_url: row.try_get("image_url")?,
            template_name: row.try_get("template_name")?,
            audience: row.try_get("audience")?,
            status: row.try_get("status")?,
            total_targets: row.try_get("total_targets")?,
            sent: row.try_get("sent")?,
            failed: row.try_get("failed")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_campaign(self) -> Result<Campaign, RepositoryError> {
        let id = self
            .id
            .parse::<CampaignId>()
            .map_err(|e| RepositoryError::Query(format!("invalid campaign id: {e}")))?;
        let audience: Audience = self.audience.parse().map_err(RepositoryError::Query)?;
        let status: CampaignStatus = self.status.parse().map_err(RepositoryError::Query)?;

        Ok(Campaign {
            id,
            name: self.name,
            message: self.message,
            image_url: self.image_url,
            template_name: self.template_name,
            audience,
            status,
            total_targets: self.total_targets,
            sent: self.sent,
            failed: self.failed,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn map_campaign(row: &sqlx::sqlite::SqliteRow) -> Result<Campaign, RepositoryError> {
    CampaignRow::from_row(row).map_err(query_error)?.into_campaign()
}

fn recipient_columns(recipient: &Recipient) -> (&'static str, String) {
    match recipient {
        Recipient::Lead(id) => ("lead", id.to_string()),
        Recipient::Vendor(id) => ("vendor", id.to_string()),
    }
}

fn parse_recipient(kind: &str, id: &str) -> Result<Recipient, RepositoryError> {
    let invalid = |e: uuid::Error| RepositoryError::Query(format!("invalid recipient id: {e}"));
    match kind {
        "lead" => id.parse::<LeadId>().map(Recipient::Lead).map_err(invalid),
        "vendor" => id.parse::<VendorId>().map(Recipient::Vendor).map_err(invalid),
        other => Err(RepositoryError::Query(format!(
            "invalid recipient kind: '{other}'"
        ))),
    }
}

fn map_send(row: &sqlx::sqlite::SqliteRow) -> Result<CampaignSend, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    let campaign_id: String = row.try_get("campaign_id").map_err(query_error)?;
    let kind: String = row.try_get("recipient_kind").map_err(query_error)?;
    let recipient_id: String = row.try_get("recipient_id").map_err(query_error)?;
    let status: String = row.try_get("status").map_err(query_error)?;
    let sent_at: Option<String> = row.try_get("sent_at").map_err(query_error)?;
    let created_at: String = row.try_get("created_at").map_err(query_error)?;

    Ok(CampaignSend {
        id: id
            .parse::<SendId>()
            .map_err(|e| RepositoryError::Query(format!("invalid send id: {e}")))?,
        campaign_id: campaign_id
            .parse::<CampaignId>()
            .map_err(|e| RepositoryError::Query(format!("invalid campaign id: {e}")))?,
        recipient: parse_recipient(&kind, &recipient_id)?,
        status: status.parse::<SendStatus>().map_err(RepositoryError::Query)?,
        error_message: row.try_get("error_message").map_err(query_error)?,
        sent_at: sent_at.as_deref().map(parse_datetime).transpose()?,
        created_at: parse_datetime(&created_at)?,
    })
}

impl CampaignRepository for SqliteCampaignRepository {
    async fn create(&self, campaign: &Campaign) -> Result<Campaign, RepositoryError> {
        sqlx::query(
            "INSERT INTO campaigns (id, name, message, image_url, template_name, audience, status, total_targets, sent, failed, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(campaign.id.to_string())
        .bind(&campaign.name)
        .bind(&campaign.message)
        .bind(&campaign.image_url)
        .bind(&campaign.template_name)
        .bind(campaign.audience.to_string())
        .bind(campaign.status.to_string())
        .bind(campaign.total_targets)
        .bind(campaign.sent)
        .bind(campaign.failed)
        .bind(format_datetime(&campaign.created_at))
        .bind(format_datetime(&campaign.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(campaign.clone())
    }

    async fn get_by_id(&self, id: &CampaignId) -> Result<Option<Campaign>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM campaigns WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.as_ref().map(map_campaign).transpose()
    }

    async fn list(&self, filter: Option<CampaignFilter>) -> Result<Vec<Campaign>, RepositoryError> {
        let filter = filter.unwrap_or_default();
        let mut sql = String::from("SELECT * FROM campaigns");
        let mut conditions: Vec<&str> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(status) = filter.status {
            conditions.push("status = ?");
            binds.push(status.to_string());
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            conditions.push("(LOWER(name) LIKE ? ESCAPE '\\' OR LOWER(audience) LIKE ? ESCAPE '\\')");
            let pattern = like_pattern(search);
            binds.push(pattern.clone());
            binds.push(pattern);
        }

        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC");
        push_pagination(&mut sql, filter.limit, filter.offset);

        let mut query = sqlx::query(&sql);
        for value in &binds {
            query = query.bind(value);
        }
        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        rows.iter().map(map_campaign).collect()
    }

    async fn delete(&self, id: &CampaignId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn set_status(&self, id: &CampaignId, status: CampaignStatus) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE campaigns SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.to_string())
            .bind(format_datetime(&Utc::now()))
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn begin_dispatch(&self, id: &CampaignId) -> Result<bool, RepositoryError> {
        let processing = CampaignStatus::Processing.to_string();
        let result = sqlx::query(
            "UPDATE campaigns SET status = ?, updated_at = ? WHERE id = ? AND status <> ?",
        )
        .bind(&processing)
        .bind(format_datetime(&Utc::now()))
        .bind(id.to_string())
        .bind(&processing)
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn finish(&self, id: &CampaignId, summary: &DispatchSummary) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE campaigns SET status = ?, sent = ?, failed = ?, updated_at = ? WHERE id = ?",
        )
        .bind(CampaignStatus::Completed.to_string())
        .bind(summary.sent)
        .bind(summary.failed)
        .bind(format_datetime(&Utc::now()))
        .bind(id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn insert_sends(&self, sends: &[CampaignSend]) -> Result<(), RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        for send in sends {
            let (kind, recipient_id) = recipient_columns(&send.recipient);
            sqlx::query(
                "INSERT INTO campaign_sends (id, campaign_id, recipient_kind, recipient_id, status, error_message, sent_at, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(send.id.to_string())
            .bind(send.campaign_id.to_string())
            .bind(kind)
            .bind(recipient_id)
            .bind(send.status.to_string())
            .bind(&send.error_message)
            .bind(send.sent_at.as_ref().map(format_datetime))
            .bind(format_datetime(&send.created_at))
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;
        }

        tx.commit().await.map_err(query_error)
    }

    async fn record_outcome(
        &self,
        campaign_id: &CampaignId,
        recipient: &Recipient,
        outcome: &SendOutcome,
    ) -> Result<(), RepositoryError> {
        let (status, sent_at, error_message) = match outcome {
            SendOutcome::Sent { at } => (SendStatus::Sent, Some(format_datetime(at)), None),
            SendOutcome::Failed { reason } => (SendStatus::Failed, None, Some(reason.as_str())),
        };
        let (kind, recipient_id) = recipient_columns(recipient);

        sqlx::query(
            "UPDATE campaign_sends SET status = ?, sent_at = ?, error_message = ?
             WHERE campaign_id = ? AND recipient_kind = ? AND recipient_id = ? AND status = ?",
        )
        .bind(status.to_string())
        .bind(sent_at)
        .bind(error_message)
        .bind(campaign_id.to_string())
        .bind(kind)
        .bind(recipient_id)
        .bind(SendStatus::Pending.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(())
    }

    async fn list_sends(&self, campaign_id: &CampaignId) -> Result<Vec<CampaignSend>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM campaign_sends WHERE campaign_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(campaign_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter().map(map_send).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_support::test_pool;
    use chrono::Duration;

    fn make_campaign(name: &str, audience: Audience, minutes_ago: i64) -> Campaign {
        let at = Utc::now() - Duration::minutes(minutes_ago);
        Campaign {
            id: CampaignId::new(),
            name: name.to_string(),
            message: "Aproveite!".to_string(),
            image_url: None,
            template_name: None,
            audience,
            status: CampaignStatus::Draft,
            total_targets: 2,
            sent: 0,
            failed: 0,
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn test_create_get_list() {
        let repo = SqliteCampaignRepository::new(test_pool().await);
        let older = make_campaign("Natal", Audience::Leads, 10);
        let mut newer = make_campaign("Convenção", Audience::Vendors, 1);
        newer.template_name = Some("convite_convencao".to_string());
        newer.image_url = Some("https://cdn/convite.png".to_string());
        repo.create(&older).await.unwrap();
        repo.create(&newer).await.unwrap();

        let found = repo.get_by_id(&newer.id).await.unwrap().unwrap();
        assert_eq!(found.audience, Audience::Vendors);
        assert_eq!(found.template_name.as_deref(), Some("convite_convencao"));

        let all = repo.list(None).await.unwrap();
        assert_eq!(all[0].id, newer.id);
        assert_eq!(all[1].id, older.id);

        let by_audience = repo
            .list(Some(CampaignFilter {
                search: Some("vended".to_string()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(by_audience.len(), 1);
        assert_eq!(by_audience[0].name, "Convenção");
    }

    #[tokio::test]
    async fn test_status_and_finish() {
        let repo = SqliteCampaignRepository::new(test_pool().await);
        let campaign = make_campaign("Natal", Audience::Leads, 0);
        repo.create(&campaign).await.unwrap();

        repo.set_status(&campaign.id, CampaignStatus::Processing).await.unwrap();
        let processing = repo
            .list(Some(CampaignFilter {
                status: Some(CampaignStatus::Processing),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(processing.len(), 1);

        repo.finish(&campaign.id, &DispatchSummary { sent: 5, failed: 2 })
            .await
            .unwrap();
        let done = repo.get_by_id(&campaign.id).await.unwrap().unwrap();
        assert_eq!(done.status, CampaignStatus::Completed);
        assert_eq!((done.sent, done.failed), (5, 2));

        assert!(matches!(
            repo.set_status(&CampaignId::new(), CampaignStatus::Paused).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_begin_dispatch_claims_once() {
        let repo = SqliteCampaignRepository::new(test_pool().await);
        let campaign = make_campaign("Natal", Audience::Leads, 0);
        repo.create(&campaign).await.unwrap();

        assert!(repo.begin_dispatch(&campaign.id).await.unwrap());
        assert!(!repo.begin_dispatch(&campaign.id).await.unwrap());
        let stored = repo.get_by_id(&campaign.id).await.unwrap().unwrap();
        assert_eq!(stored.status, CampaignStatus::Processing);

        repo.set_status(&campaign.id, CampaignStatus::Paused).await.unwrap();
        assert!(repo.begin_dispatch(&campaign.id).await.unwrap());

        assert!(!repo.begin_dispatch(&CampaignId::new()).await.unwrap());
    }

    #[tokio::test]
    async fn test_sends_outcomes_and_cascade() {
        let repo = SqliteCampaignRepository::new(test_pool().await);
        let campaign = make_campaign("Natal", Audience::Leads, 0);
        repo.create(&campaign).await.unwrap();

        let ok = Recipient::Lead(LeadId::new());
        let bad = Recipient::Lead(LeadId::new());
        repo.insert_sends(&[
            CampaignSend::pending(campaign.id, ok),
            CampaignSend::pending(campaign.id, bad),
        ])
        .await
        .unwrap();

        repo.record_outcome(&campaign.id, &ok, &SendOutcome::Sent { at: Utc::now() })
            .await
            .unwrap();
        repo.record_outcome(
            &campaign.id,
            &bad,
            &SendOutcome::Failed {
                reason: "no phone number".to_string(),
            },
        )
        .await
        .unwrap();

        let sends = repo.list_sends(&campaign.id).await.unwrap();
        assert_eq!(sends.len(), 2);
        let sent = sends.iter().find(|s| s.recipient == ok).unwrap();
        assert_eq!(sent.status, SendStatus::Sent);
        assert!(sent.sent_at.is_some());
        let failed = sends.iter().find(|s| s.recipient == bad).unwrap();
        assert_eq!(failed.status, SendStatus::Failed);
        assert_eq!(failed.error_message.as_deref(), Some("no phone number"));

        // A later run's outcome does not overwrite finished rows.
        repo.insert_sends(&[CampaignSend::pending(campaign.id, ok)])
            .await
            .unwrap();
        repo.record_outcome(
            &campaign.id,
            &ok,
            &SendOutcome::Failed {
                reason: "blocked".to_string(),
            },
        )
        .await
        .unwrap();
        let sends = repo.list_sends(&campaign.id).await.unwrap();
        let for_ok: Vec<SendStatus> = sends
            .iter()
            .filter(|s| s.recipient == ok)
            .map(|s| s.status)
            .collect();
        assert_eq!(for_ok.len(), 2);
        assert!(for_ok.contains(&SendStatus::Sent));
        assert!(for_ok.contains(&SendStatus::Failed));

        repo.delete(&campaign.id).await.unwrap();
        assert!(repo.list_sends(&campaign.id).await.unwrap().is_empty());
    }
}
