//! Campaign and send-record repository trait definition.

use painel_types::campaign::{
    Campaign, CampaignId, CampaignSend, CampaignStatus, DispatchSummary, Recipient, SendOutcome,
};
use painel_types::error::RepositoryError;

/// Filter criteria for listing campaigns. Results are newest first.
#[derive(Debug, Clone, Default)]
pub struct CampaignFilter {
    /// Case-insensitive substring over name and audience.
    pub search: Option<String>,
    pub status: Option<CampaignStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Repository trait for campaigns and their per-recipient send records.
pub trait CampaignRepository: Send + Sync {
    fn create(
        &self,
        campaign: &Campaign,
    ) -> impl std::future::Future<Output = Result<Campaign, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &CampaignId,
    ) -> impl std::future::Future<Output = Result<Option<Campaign>, RepositoryError>> + Send;

    fn list(
        &self,
        filter: Option<CampaignFilter>,
    ) -> impl std::future::Future<Output = Result<Vec<Campaign>, RepositoryError>> + Send;

    /// Delete a campaign and, by cascade, its send records.
    fn delete(
        &self,
        id: &CampaignId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Set only the lifecycle status.
    fn set_status(
        &self,
        id: &CampaignId,
        status: CampaignStatus,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Atomically move a campaign into `processando`.
    ///
    /// Returns `false` when the campaign is missing or already processing.
    fn begin_dispatch(
        &self,
        id: &CampaignId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Mark the campaign completed and store the final counters.
    fn finish(
        &self,
        id: &CampaignId,
        summary: &DispatchSummary,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Insert a batch of send records in one transaction.
    fn insert_sends(
        &self,
        sends: &[CampaignSend],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Record the outcome on the `pendente` send rows of `campaign_id`
    /// addressed to `recipient`. Rows from earlier runs keep their result.
    fn record_outcome(
        &self,
        campaign_id: &CampaignId,
        recipient: &Recipient,
        outcome: &SendOutcome,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Send records of a campaign, oldest first.
    fn list_sends(
        &self,
        campaign_id: &CampaignId,
    ) -> impl std::future::Future<Output = Result<Vec<CampaignSend>, RepositoryError>> + Send;
}
