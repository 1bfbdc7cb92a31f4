//! SQLite lead repository implementation.

use painel_core::repository::SortOrder;
use painel_core::repository::lead::{LeadFilter, LeadRepository};
use painel_types::error::RepositoryError;
use painel_types::lead::{Lead, LeadId, LeadStatus};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, like_pattern, parse_datetime, push_pagination, query_error};

/// SQLite-backed implementation of `LeadRepository`.
pub struct SqliteLeadRepository {
    pool: DatabasePool,
}

impl SqliteLeadRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Lead.
struct LeadRow {
    id: String,
    name: String,
    contact: Option<String>,
    document: Option<String>,
    status: String,
    email: Option<String>,
    street: Option<String>,
    number: Option<String>,
    district: Option<String>,
    city: Option<String>,
    state: Option<String>,
    postal_code: Option<String>,
    created_at: String,
}

impl LeadRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            contact: row.try_get("contact")?,
            document: row.try_get("document")?,
            status: row.try_get("status")?,
            email: row.try_get("email")?,
            street: row.try_get("street")?,
            number: row.try_get("number")?,
            district: row.try_get("district")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            postal_code: row.try_get("postal_code")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_lead(self) -> Result<Lead, RepositoryError> {
        let id = self
            .id
            .parse::<LeadId>()
            .map_err(|e| RepositoryError::Query(format!("invalid lead id: {e}")))?;

        Ok(Lead {
            id,
            name: self.name,
            contact: self.contact,
            document: self.document,
            status: LeadStatus::from(self.status),
            email: self.email,
            street: self.street,
            number: self.number,
            district: self.district,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn map_row(row: &sqlx::sqlite::SqliteRow) -> Result<Lead, RepositoryError> {
    LeadRow::from_row(row).map_err(query_error)?.into_lead()
}

impl LeadRepository for SqliteLeadRepository {
    async fn create(&self, lead: &Lead) -> Result<Lead, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO leads (id, name, contact, document, status, email, street, number, district, city, state, postal_code, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(lead.id.to_string())
        .bind(&lead.name)
        .bind(&lead.contact)
        .bind(&lead.document)
        .bind(lead.status.as_str())
        .bind(&lead.email)
        .bind(&lead.street)
        .bind(&lead.number)
        .bind(&lead.district)
        .bind(&lead.city)
        .bind(&lead.state)
        .bind(&lead.postal_code)
        .bind(format_datetime(&lead.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(lead.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("lead '{}' already exists", lead.id)),
            ),
            Err(e) => Err(query_error(e)),
        }
    }

    async fn get_by_id(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM leads WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.as_ref().map(map_row).transpose()
    }

    async fn list(&self, filter: Option<LeadFilter>) -> Result<Vec<Lead>, RepositoryError> {
        let filter = filter.unwrap_or_default();
        let mut sql = String::from("SELECT * FROM leads");
        let mut conditions: Vec<&str> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(ref status) = filter.status {
            conditions.push("status = ?");
            binds.push(status.as_str().to_string());
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            conditions.push(
                "(LOWER(name) LIKE ? ESCAPE '\\' OR LOWER(COALESCE(contact, '')) LIKE ? ESCAPE '\\')",
            );
            let pattern = like_pattern(search);
            binds.push(pattern.clone());
            binds.push(pattern);
        }

        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        // Whitelist allowed sort fields to prevent SQL injection
        let safe_sort = match filter.sort_by.as_deref().unwrap_or("created_at") {
            "name" => "name",
            "status" => "status",
            _ => "created_at",
        };
        let order = match filter.sort_order.unwrap_or_default() {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        sql.push_str(&format!(" ORDER BY {safe_sort} {order}"));

        push_pagination(&mut sql, filter.limit, filter.offset);

        let mut query = sqlx::query(&sql);
        for value in &binds {
            query = query.bind(value);
        }
        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        rows.iter().map(map_row).collect()
    }

    async fn update(&self, lead: &Lead) -> Result<Lead, RepositoryError> {
        let result = sqlx::query(
            "UPDATE leads SET name = ?, contact = ?, document = ?, status = ?, email = ?, street = ?, number = ?, district = ?, city = ?, state = ?, postal_code = ?
             WHERE id = ?",
        )
        .bind(&lead.name)
        .bind(&lead.contact)
        .bind(&lead.document)
        .bind(lead.status.as_str())
        .bind(&lead.email)
        .bind(&lead.street)
        .bind(&lead.number)
        .bind(&lead.district)
        .bind(&lead.city)
        .bind(&lead.state)
        .bind(&lead.postal_code)
        .bind(lead.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(lead.clone())
    }

    async fn delete(&self, id: &LeadId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM leads")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_error)?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_support::test_pool;
    use chrono::{Duration, Utc};

    fn make_lead(name: &str, contact: &str, minutes_ago: i64) -> Lead {
        Lead {
            id: LeadId::new(),
            name: name.to_string(),
            contact: Some(contact.to_string()),
            document: None,
            status: LeadStatus::New,
            email: None,
            street: None,
            number: None,
            district: None,
            city: Some("Arcoverde".to_string()),
            state: Some("PE".to_string()),
            postal_code: None,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_by_id() {
        let repo = SqliteLeadRepository::new(test_pool().await);
        let lead = make_lead("Maria Souza", "(87) 99205-2920", 0);

        repo.create(&lead).await.unwrap();

        let found = repo.get_by_id(&lead.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Maria Souza");
        assert_eq!(found.contact.as_deref(), Some("(87) 99205-2920"));
        assert_eq!(found.status, LeadStatus::New);
        assert_eq!(found.city.as_deref(), Some("Arcoverde"));
        assert_eq!(found.created_at.timestamp_micros(), lead.created_at.timestamp_micros());

        assert!(repo.get_by_id(&LeadId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first_with_filters() {
        let repo = SqliteLeadRepository::new(test_pool().await);
        let old = make_lead("Ana", "8711111111", 30);
        let mut mid = make_lead("Bruno", "8722222222", 20);
        mid.status = LeadStatus::Contacted;
        let new = make_lead("Carla", "8733333333", 10);
        for l in [&old, &mid, &new] {
            repo.create(l).await.unwrap();
        }

        let all = repo.list(None).await.unwrap();
        let names: Vec<&str> = all.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Carla", "Bruno", "Ana"]);

        let contacted = repo
            .list(Some(LeadFilter {
                status: Some(LeadStatus::Contacted),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(contacted.len(), 1);
        assert_eq!(contacted[0].name, "Bruno");

        let by_contact = repo
            .list(Some(LeadFilter {
                search: Some("3333".to_string()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(by_contact[0].name, "Carla");

        let page = repo
            .list(Some(LeadFilter {
                sort_by: Some("name".to_string()),
                sort_order: Some(SortOrder::Asc),
                limit: Some(1),
                offset: Some(1),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "Bruno");
    }

    #[tokio::test]
    async fn test_unknown_status_preserved() {
        let repo = SqliteLeadRepository::new(test_pool().await);
        let mut lead = make_lead("Davi", "87", 0);
        lead.status = LeadStatus::Other("aguardando_retorno".to_string());
        repo.create(&lead).await.unwrap();

        let found = repo.get_by_id(&lead.id).await.unwrap().unwrap();
        assert_eq!(found.status, LeadStatus::Other("aguardando_retorno".to_string()));
    }

    #[tokio::test]
    async fn test_update_delete_count() {
        let repo = SqliteLeadRepository::new(test_pool().await);
        let mut lead = make_lead("Eva", "87", 0);
        repo.create(&lead).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);

        lead.status = LeadStatus::Won;
        lead.email = Some("eva@example.com".to_string());
        repo.update(&lead).await.unwrap();
        let found = repo.get_by_id(&lead.id).await.unwrap().unwrap();
        assert_eq!(found.status, LeadStatus::Won);
        assert_eq!(found.email.as_deref(), Some("eva@example.com"));

        repo.delete(&lead.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(matches!(
            repo.delete(&lead.id).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            repo.update(&lead).await,
            Err(RepositoryError::NotFound)
        ));
    }
}
