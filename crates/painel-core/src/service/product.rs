//! Product catalog service.

use chrono::Utc;
use painel_types::error::{ProductError, RepositoryError};
use painel_types::product::{CreateProductRequest, Product, ProductId, UpdateProductRequest};

use crate::repository::product::ProductRepository;
use crate::service::{clean, patch};

fn storage(e: RepositoryError) -> ProductError {
    ProductError::StorageError(e.to_string())
}

/// Catalog listing criteria.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring over name, category and line.
    pub search: Option<String>,
    /// Exact category.
    pub category: Option<String>,
}

pub struct ProductService<P: ProductRepository> {
    repo: P,
}

impl<P: ProductRepository> ProductService<P> {
    pub fn new(repo: P) -> Self {
        Self { repo }
    }

    pub async fn create_product(&self, request: CreateProductRequest) -> Result<Product, ProductError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(ProductError::Validation("name is required".to_string()));
        }

        let product = Product {
            id: ProductId::new(),
            name,
            code: clean(request.code),
            line: clean(request.line),
            category: clean(request.category),
            presentation: clean(request.presentation),
            packaging: clean(request.packaging),
            active: request.active.unwrap_or(true),
            created_at: Utc::now(),
        };

        self.repo.create(&product).await.map_err(storage)
    }

    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ProductError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(ProductError::NotFound)
    }

    /// Products ordered by name, narrowed by `filter`.
    pub async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>, ProductError> {
        let products = self.repo.list().await.map_err(storage)?;
        let search = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

        Ok(products
            .into_iter()
            .filter(|p| search.is_none_or(|term| p.matches_search(term)))
            .filter(|p| {
                filter
                    .category
                    .as_deref()
                    .is_none_or(|c| p.category.as_deref() == Some(c))
            })
            .collect())
    }

    /// Distinct non-empty categories, sorted.
    pub async fn list_categories(&self) -> Result<Vec<String>, ProductError> {
        let products = self.repo.list().await.map_err(storage)?;
        let mut categories: Vec<String> = products
            .into_iter()
            .filter_map(|p| p.category)
            .filter(|c| !c.trim().is_empty())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    pub async fn update_product(
        &self,
        id: &ProductId,
        request: UpdateProductRequest,
    ) -> Result<Product, ProductError> {
        let mut product = self.get_product(id).await?;

        if let Some(name) = request.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ProductError::Validation("name cannot be empty".to_string()));
            }
            product.name = name;
        }
        patch(&mut product.code, request.code);
        patch(&mut product.line, request.line);
        patch(&mut product.category, request.category);
        patch(&mut product.presentation, request.presentation);
        patch(&mut product.packaging, request.packaging);
        if let Some(active) = request.active {
            product.active = active;
        }

        self.repo.update(&product).await.map_err(|e| match e {
            RepositoryError::NotFound => ProductError::NotFound,
            other => storage(other),
        })
    }

    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ProductError> {
        self.repo.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => ProductError::NotFound,
            other => storage(other),
        })
    }
}
