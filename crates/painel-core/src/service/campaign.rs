//! Campaign management service.
//!
//! Creates campaigns, exposes their send records and drives the dispatch
//! loop in [`crate::dispatch`].

use chrono::Utc;
use painel_types::campaign::{
    Audience, Campaign, CampaignId, CampaignSend, CampaignStatus, CreateCampaignRequest,
    CreateTemplateCampaignRequest, DispatchSummary,
};
use painel_types::error::{CampaignError, RepositoryError};
use painel_types::messaging::sanitize_template_name;

use crate::dispatch::{self, DispatchProgress, DispatchSettings};
use crate::messaging::provider::MessagingProvider;
use crate::repository::audience::AudienceRepository;
use crate::repository::campaign::{CampaignFilter, CampaignRepository};
use crate::service::clean;

fn storage(e: RepositoryError) -> CampaignError {
    CampaignError::StorageError(e.to_string())
}

/// Service owning the campaign lifecycle.
pub struct CampaignService<C: CampaignRepository, A: AudienceRepository, M: MessagingProvider> {
    campaigns: C,
    audience: A,
    provider: M,
    settings: DispatchSettings,
}

impl<C: CampaignRepository, A: AudienceRepository, M: MessagingProvider> CampaignService<C, A, M> {
    pub fn new(campaigns: C, audience: A, provider: M, settings: DispatchSettings) -> Self {
        Self {
            campaigns,
            audience,
            provider,
            settings,
        }
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Create a text or image campaign in `rascunho`.
    ///
    /// `total_targets` snapshots the audience size at creation time.
    pub async fn create_campaign(&self, request: CreateCampaignRequest) -> Result<Campaign, CampaignError> {
        let name = request.name.trim().to_string();
        let message = request.message.trim().to_string();
        if name.is_empty() || message.is_empty() {
            return Err(CampaignError::Validation(
                "name, message and audience are required".to_string(),
            ));
        }

        let campaign = self
            .new_campaign(name, message, clean(request.image_url), None, request.audience)
            .await?;
        self.store(campaign).await
    }

    /// Create a campaign that sends a registered template.
    ///
    /// The stored message defaults to the template name.
    pub async fn create_template_campaign(
        &self,
        request: CreateTemplateCampaignRequest,
    ) -> Result<Campaign, CampaignError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(CampaignError::Validation("name is required".to_string()));
        }
        let template = sanitize_template_name(request.template_name.trim());
        if template.is_empty() {
            return Err(CampaignError::Validation("template name is required".to_string()));
        }
        let message = clean(request.message).unwrap_or_else(|| template.clone());

        let campaign = self
            .new_campaign(
                name,
                message,
                clean(request.header_image_url),
                Some(template),
                request.audience,
            )
            .await?;
        self.store(campaign).await
    }

    async fn new_campaign(
        &self,
        name: String,
        message: String,
        image_url: Option<String>,
        template_name: Option<String>,
        audience: Audience,
    ) -> Result<Campaign, CampaignError> {
        let total_targets = self
            .audience
            .count_targets(audience)
            .await
            .map_err(storage)?;
        let now = Utc::now();
        Ok(Campaign {
            id: CampaignId::new(),
            name,
            message,
            image_url,
            template_name,
            audience,
            status: CampaignStatus::Draft,
            total_targets,
            sent: 0,
            failed: 0,
            created_at: now,
            updated_at: now,
        })
    }

    async fn store(&self, campaign: Campaign) -> Result<Campaign, CampaignError> {
        let created = self.campaigns.create(&campaign).await.map_err(storage)?;
        tracing::info!(
            campaign = %created.id,
            audience = %created.audience,
            targets = created.total_targets,
            "campaign created"
        );
        Ok(created)
    }

    pub async fn get_campaign(&self, id: &CampaignId) -> Result<Campaign, CampaignError> {
        self.campaigns
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(CampaignError::NotFound)
    }

    pub async fn list_campaigns(&self, filter: Option<CampaignFilter>) -> Result<Vec<Campaign>, CampaignError> {
        self.campaigns.list(filter).await.map_err(storage)
    }

    /// Delete a campaign together with its send records.
    pub async fn delete_campaign(&self, id: &CampaignId) -> Result<(), CampaignError> {
        self.campaigns.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => CampaignError::NotFound,
            other => storage(other),
        })?;
        tracing::info!(campaign = %id, "campaign deleted");
        Ok(())
    }

    pub async fn list_sends(&self, id: &CampaignId) -> Result<Vec<CampaignSend>, CampaignError> {
        self.get_campaign(id).await?;
        self.campaigns.list_sends(id).await.map_err(storage)
    }

    /// Check that `id` can be dispatched right now without starting it.
    pub async fn check_dispatchable(&self, id: &CampaignId) -> Result<Campaign, CampaignError> {
        if !self.provider.can_send() {
            return Err(CampaignError::CredentialsMissing);
        }
        let campaign = self.get_campaign(id).await?;
        if campaign.status == CampaignStatus::Processing {
            return Err(CampaignError::AlreadyProcessing);
        }
        Ok(campaign)
    }

    /// Claim `id` for dispatch without sending anything yet.
    ///
    /// Lets callers that run the loop in the background report refusals,
    /// including a concurrent claim, before they answer. Pair with
    /// [`Self::dispatch_claimed`].
    pub async fn start_dispatch(&self, id: &CampaignId) -> Result<Campaign, CampaignError> {
        dispatch::claim(&self.campaigns, &self.provider, id).await
    }

    /// Run the loop for a campaign returned by [`Self::start_dispatch`].
    pub async fn dispatch_claimed(
        &self,
        campaign: &Campaign,
        on_progress: &(dyn Fn(DispatchProgress) + Send + Sync),
    ) -> Result<DispatchSummary, CampaignError> {
        dispatch::execute(
            &self.campaigns,
            &self.audience,
            &self.provider,
            &self.settings,
            campaign,
            on_progress,
        )
        .await
    }

    /// Move a campaign stuck in `processando` to `pausada`.
    ///
    /// For runs that died without finishing (an interrupted CLI, a server
    /// stopped mid-dispatch). Send records already written are kept.
    pub async fn release_campaign(&self, id: &CampaignId) -> Result<Campaign, CampaignError> {
        let campaign = self.get_campaign(id).await?;
        if campaign.status != CampaignStatus::Processing {
            return Err(CampaignError::NotProcessing);
        }
        self.campaigns
            .set_status(id, CampaignStatus::Paused)
            .await
            .map_err(storage)?;
        tracing::warn!(campaign = %id, "campaign released from processing");
        self.get_campaign(id).await
    }

    /// Run the dispatch loop to completion.
    pub async fn dispatch(
        &self,
        id: &CampaignId,
        on_progress: &(dyn Fn(DispatchProgress) + Send + Sync),
    ) -> Result<DispatchSummary, CampaignError> {
        dispatch::run(
            &self.campaigns,
            &self.audience,
            &self.provider,
            &self.settings,
            id,
            on_progress,
        )
        .await
    }
}
