//! SQLite product repository implementation.

use painel_core::repository::product::ProductRepository;
use painel_types::error::RepositoryError;
use painel_types::product::{Product, ProductId};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

pub struct SqliteProductRepository {
    pool: DatabasePool,
}

impl SqliteProductRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn map_row(row: &sqlx::sqlite::SqliteRow) -> Result<Product, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    let created_at: String = row.try_get("created_at").map_err(query_error)?;

    Ok(Product {
        id: id
            .parse::<ProductId>()
            .map_err(|e| RepositoryError::Query(format!("invalid product id: {e}")))?,
        name: row.try_get("name").map_err(query_error)?,
        code: row.try_get("code").map_err(query_error)?,
        line: row.try_get("line").map_err(query_error)?,
        category: row.try_get("category").map_err(query_error)?,
        presentation: row.try_get("presentation").map_err(query_error)?,
        packaging: row.try_get("packaging").map_err(query_error)?,
        active: row.try_get("active").map_err(query_error)?,
        created_at: parse_datetime(&created_at)?,
    })
}

impl ProductRepository for SqliteProductRepository {
    async fn create(&self, product: &Product) -> Result<Product, RepositoryError> {
        sqlx::query(
            "INSERT INTO products (id, name, code, line, category, presentation, packaging, active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(product.id.to_string())
        .bind(&product.name)
        .bind(&product.code)
        .bind(&product.line)
        .bind(&product.category)
        .bind(&product.presentation)
        .bind(&product.packaging)
        .bind(product.active)
        .bind(format_datetime(&product.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(product.clone())
    }

    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM products WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.as_ref().map(map_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM products ORDER BY name ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        rows.iter().map(map_row).collect()
    }

    async fn update(&self, product: &Product) -> Result<Product, RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET name = ?, code = ?, line = ?, category = ?, presentation = ?, packaging = ?, active = ?
             WHERE id = ?",
        )
        .bind(&product.name)
        .bind(&product.code)
        .bind(&product.line)
        .bind(&product.category)
        .bind(&product.presentation)
        .bind(&product.packaging)
        .bind(product.active)
        .bind(product.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(product.clone())
    }

    async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
