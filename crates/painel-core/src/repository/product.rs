//! Product repository trait definition.

use painel_types::error::RepositoryError;
use painel_types::product::{Product, ProductId};

/// Repository trait for the product catalog.
///
/// The catalog is small, so listing returns every product ordered by name
/// and filtering happens in the service.
pub trait ProductRepository: Send + Sync {
    fn create(
        &self,
        product: &Product,
    ) -> impl std::future::Future<Output = Result<Product, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &ProductId,
    ) -> impl std::future::Future<Output = Result<Option<Product>, RepositoryError>> + Send;

    /// Every product, ordered by name ascending.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<Product>, RepositoryError>> + Send;

    fn update(
        &self,
        product: &Product,
    ) -> impl std::future::Future<Output = Result<Product, RepositoryError>> + Send;

    fn delete(
        &self,
        id: &ProductId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
