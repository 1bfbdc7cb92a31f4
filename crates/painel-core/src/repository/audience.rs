//! Read access to campaign audiences (leads or vendors).

use painel_types::campaign::{Audience, DispatchTarget};
use painel_types::error::RepositoryError;

/// Resolves an [`Audience`] to concrete recipients.
pub trait AudienceRepository: Send + Sync {
    /// Number of rows in the audience table.
    fn count_targets(
        &self,
        audience: Audience,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;

    /// Every recipient id with its phone column (`contact` for leads,
    /// `phone` for vendors), in a stable order.
    fn list_targets(
        &self,
        audience: Audience,
    ) -> impl std::future::Future<Output = Result<Vec<DispatchTarget>, RepositoryError>> + Send;
}
