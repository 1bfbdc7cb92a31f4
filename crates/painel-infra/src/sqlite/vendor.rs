//! SQLite vendor repository implementation.

use painel_core::repository::vendor::{VendorFilter, VendorRepository};
use painel_types::error::RepositoryError;
use painel_types::vendor::{Vendor, VendorId};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, like_pattern, parse_datetime, push_pagination, query_error};

pub struct SqliteVendorRepository {
    pool: DatabasePool,
}

impl SqliteVendorRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn map_row(row: &sqlx::sqlite::SqliteRow) -> Result<Vendor, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    let created_at: String = row.try_get("created_at").map_err(query_error)?;

    Ok(Vendor {
        id: id
            .parse::<VendorId>()
            .map_err(|e| RepositoryError::Query(format!("invalid vendor id: {e}")))?,
        name: row.try_get("name").map_err(query_error)?,
        phone: row.try_get("phone").map_err(query_error)?,
        email: row.try_get("email").map_err(query_error)?,
        address: row.try_get("address").map_err(query_error)?,
        region_served: row.try_get("region_served").map_err(query_error)?,
        cities_served: row.try_get("cities_served").map_err(query_error)?,
        created_at: parse_datetime(&created_at)?,
    })
}

impl VendorRepository for SqliteVendorRepository {
    async fn create(&self, vendor: &Vendor) -> Result<Vendor, RepositoryError> {
        sqlx::query(
            "INSERT INTO vendors (id, name, phone, email, address, region_served, cities_served, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(vendor.id.to_string())
        .bind(&vendor.name)
        .bind(&vendor.phone)
        .bind(&vendor.email)
        .bind(&vendor.address)
        .bind(&vendor.region_served)
        .bind(&vendor.cities_served)
        .bind(format_datetime(&vendor.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(vendor.clone())
    }

    async fn get_by_id(&self, id: &VendorId) -> Result<Option<Vendor>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM vendors WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.as_ref().map(map_row).transpose()
    }

    async fn list(&self, filter: Option<VendorFilter>) -> Result<Vec<Vendor>, RepositoryError> {
        let filter = filter.unwrap_or_default();
        let mut sql = String::from("SELECT * FROM vendors");
        let mut binds: Vec<String> = Vec::new();

        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            sql.push_str(
                " WHERE LOWER(name) LIKE ? ESCAPE '\\'
                   OR LOWER(COALESCE(region_served, '')) LIKE ? ESCAPE '\\'
                   OR LOWER(COALESCE(cities_served, '')) LIKE ? ESCAPE '\\'",
            );
            let pattern = like_pattern(search);
            binds.extend([pattern.clone(), pattern.clone(), pattern]);
        }

        sql.push_str(" ORDER BY name ASC");
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

    async fn update(&self, vendor: &Vendor) -> Result<Vendor, RepositoryError> {
        let result = sqlx::query(
            "UPDATE vendors SET name = ?, phone = ?, email = ?, address = ?, region_served = ?, cities_served = ?
             WHERE id = ?",
        )
        .bind(&vendor.name)
        .bind(&vendor.phone)
        .bind(&vendor.email)
        .bind(&vendor.address)
        .bind(&vendor.region_served)
        .bind(&vendor.cities_served)
        .bind(vendor.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(vendor.clone())
    }

    async fn delete(&self, id: &VendorId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM vendors WHERE id = ?")
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
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vendors")
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
    use chrono::Utc;

    fn make_vendor(name: &str, region: Option<&str>) -> Vendor {
        Vendor {
            id: VendorId::new(),
            name: name.to_string(),
            phone: Some("87 98888-7777".to_string()),
            email: None,
            address: None,
            region_served: region.map(String::from),
            cities_served: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_crud() {
        let repo = SqliteVendorRepository::new(test_pool().await);
        let mut vendor = make_vendor("Carlos", Some("Sertão"));
        repo.create(&vendor).await.unwrap();

        let found = repo.get_by_id(&vendor.id).await.unwrap().unwrap();
        assert_eq!(found.phone.as_deref(), Some("87 98888-7777"));

        vendor.cities_served = Some("Arcoverde, Buíque".to_string());
        repo.update(&vendor).await.unwrap();
        let found = repo.get_by_id(&vendor.id).await.unwrap().unwrap();
        assert_eq!(found.cities_served.as_deref(), Some("Arcoverde, Buíque"));

        assert_eq!(repo.count().await.unwrap(), 1);
        repo.delete(&vendor.id).await.unwrap();
        assert!(repo.get_by_id(&vendor.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&vendor.id).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_by_name_with_search() {
        let repo = SqliteVendorRepository::new(test_pool().await);
        repo.create(&make_vendor("Paulo", Some("Agreste"))).await.unwrap();
        repo.create(&make_vendor("Ana", Some("Sertão"))).await.unwrap();
        repo.create(&make_vendor("Marcos", Some("Sertão Central"))).await.unwrap();

        let all = repo.list(None).await.unwrap();
        let names: Vec<&str> = all.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Marcos", "Paulo"]);

        let sertao = repo
            .list(Some(VendorFilter {
                search: Some("sertão".to_string()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(sertao.len(), 2);

        let paged = repo
            .list(Some(VendorFilter {
                offset: Some(2),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(paged.len(), 1);
        assert_eq!(paged[0].name, "Paulo");
    }
}
