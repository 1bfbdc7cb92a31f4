//! Lead repository trait definition.

use painel_types::error::RepositoryError;
use painel_types::lead::{Lead, LeadId, LeadStatus};

use super::SortOrder;

/// Filter criteria for listing leads.
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    /// Filter by pipeline status.
    pub status: Option<LeadStatus>,
    /// Case-insensitive substring over name and contact.
    pub search: Option<String>,
    /// Field to sort by ("created_at", "name", "status").
    pub sort_by: Option<String>,
    /// Sort direction. Defaults to newest first.
    pub sort_order: Option<SortOrder>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Repository trait for lead persistence.
///
/// Implementations live in painel-infra (e.g., SqliteLeadRepository).
pub trait LeadRepository: Send + Sync {
    /// Insert a new lead. Returns the stored lead.
    fn create(
        &self,
        lead: &Lead,
    ) -> impl std::future::Future<Output = Result<Lead, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &LeadId,
    ) -> impl std::future::Future<Output = Result<Option<Lead>, RepositoryError>> + Send;

    /// List leads with optional filtering, sorting, and pagination.
    fn list(
        &self,
        filter: Option<LeadFilter>,
    ) -> impl std::future::Future<Output = Result<Vec<Lead>, RepositoryError>> + Send;

    /// Overwrite every mutable column of an existing lead.
    fn update(
        &self,
        lead: &Lead,
    ) -> impl std::future::Future<Output = Result<Lead, RepositoryError>> + Send;

    /// Permanently delete a lead. `NotFound` when no row matched.
    fn delete(
        &self,
        id: &LeadId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn count(&self) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;
}
