//! Vendor repository trait definition.

use painel_types::error::RepositoryError;
use painel_types::vendor::{Vendor, VendorId};

/// Filter criteria for listing vendors. Results are ordered by name.
#[derive(Debug, Clone, Default)]
pub struct VendorFilter {
    /// Case-insensitive substring over name, region and cities.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Repository trait for vendor persistence.
pub trait VendorRepository: Send + Sync {
    fn create(
        &self,
        vendor: &Vendor,
    ) -> impl std::future::Future<Output = Result<Vendor, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &VendorId,
    ) -> impl std::future::Future<Output = Result<Option<Vendor>, RepositoryError>> + Send;

    fn list(
        &self,
        filter: Option<VendorFilter>,
    ) -> impl std::future::Future<Output = Result<Vec<Vendor>, RepositoryError>> + Send;

    fn update(
        &self,
        vendor: &Vendor,
    ) -> impl std::future::Future<Output = Result<Vendor, RepositoryError>> + Send;

    fn delete(
        &self,
        id: &VendorId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn count(&self) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;
}
