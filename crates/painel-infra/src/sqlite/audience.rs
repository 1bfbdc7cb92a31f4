//! SQLite audience resolution over the leads and vendors tables.

use painel_core::repository::audience::AudienceRepository;
use painel_types::campaign::{Audience, DispatchTarget, Recipient};
use painel_types::error::RepositoryError;
use painel_types::lead::LeadId;
use painel_types::vendor::VendorId;

use super::pool::DatabasePool;
use super::query_error;

pub struct SqliteAudienceRepository {
    pool: DatabasePool,
}

impl SqliteAudienceRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl AudienceRepository for SqliteAudienceRepository {
    async fn count_targets(&self, audience: Audience) -> Result<i64, RepositoryError> {
        let sql = match audience {
            Audience::Leads => "SELECT COUNT(*) FROM leads",
            Audience::Vendors => "SELECT COUNT(*) FROM vendors",
        };
        let (count,): (i64,) = sqlx::query_as(sql)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_error)?;
        Ok(count)
    }

    async fn list_targets(&self, audience: Audience) -> Result<Vec<DispatchTarget>, RepositoryError> {
        let sql = match audience {
            Audience::Leads => "SELECT id, contact FROM leads ORDER BY created_at ASC, id ASC",
            Audience::Vendors => "SELECT id, phone FROM vendors ORDER BY name ASC, id ASC",
        };
        let rows: Vec<(String, Option<String>)> = sqlx::query_as(sql)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        rows.into_iter()
            .map(|(id, phone)| {
                let recipient = match audience {
                    Audience::Leads => id.parse::<LeadId>().map(Recipient::Lead),
                    Audience::Vendors => id.parse::<VendorId>().map(Recipient::Vendor),
                }
                .map_err(|e| RepositoryError::Query(format!("invalid recipient id: {e}")))?;
                Ok(DispatchTarget { recipient, phone })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::lead::SqliteLeadRepository;
    use crate::sqlite::test_support::test_pool;
    use crate::sqlite::vendor::SqliteVendorRepository;
    use chrono::Utc;
    use painel_core::repository::lead::LeadRepository;
    use painel_core::repository::vendor::VendorRepository;
    use painel_types::lead::{Lead, LeadStatus};
    use painel_types::vendor::Vendor;

    fn lead(name: &str, contact: Option<&str>) -> Lead {
        Lead {
            id: LeadId::new(),
            name: name.to_string(),
            contact: contact.map(String::from),
            document: None,
            status: LeadStatus::New,
            email: None,
            street: None,
            number: None,
            district: None,
            city: None,
            state: None,
            postal_code: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_targets_use_audience_phone_column() {
        let pool = test_pool().await;
        let leads = SqliteLeadRepository::new(pool.clone());
        let vendors = SqliteVendorRepository::new(pool.clone());
        let audience = SqliteAudienceRepository::new(pool);

        let with_phone = lead("Maria", Some("87 99205-2920"));
        let without_phone = lead("João", None);
        leads.create(&with_phone).await.unwrap();
        leads.create(&without_phone).await.unwrap();

        let vendor = Vendor {
            id: VendorId::new(),
            name: "Carlos".to_string(),
            phone: Some("87 98888-7777".to_string()),
            email: None,
            address: None,
            region_served: None,
            cities_served: None,
            created_at: Utc::now(),
        };
        vendors.create(&vendor).await.unwrap();

        assert_eq!(audience.count_targets(Audience::Leads).await.unwrap(), 2);
        assert_eq!(audience.count_targets(Audience::Vendors).await.unwrap(), 1);

        let lead_targets = audience.list_targets(Audience::Leads).await.unwrap();
        assert_eq!(lead_targets.len(), 2);
        let maria = lead_targets
            .iter()
            .find(|t| t.recipient == Recipient::Lead(with_phone.id))
            .unwrap();
        assert_eq!(maria.phone.as_deref(), Some("87 99205-2920"));
        assert!(
            lead_targets
                .iter()
                .any(|t| t.recipient == Recipient::Lead(without_phone.id) && t.phone.is_none())
        );

        let vendor_targets = audience.list_targets(Audience::Vendors).await.unwrap();
        assert_eq!(
            vendor_targets,
            vec![DispatchTarget {
                recipient: Recipient::Vendor(vendor.id),
                phone: Some("87 98888-7777".to_string()),
            }]
        );
    }
}
