//! Campaign dispatch loop.
//!
//! Sends a campaign to every recipient of its audience, one message at a
//! time, pausing a fixed delay after each provider call. There is no retry,
//! no backoff and no concurrency: a failed recipient is recorded as `erro`
//! and the loop moves on.

use std::time::Duration;

use painel_types::campaign::{
    Campaign, CampaignContent, CampaignId, CampaignSend, CampaignStatus, DispatchSummary,
    DispatchTarget, SendOutcome,
};
use painel_types::config::MessagingConfig;
use painel_types::error::{CampaignError, MessagingError, RepositoryError};
use painel_types::messaging::{OutboundBody, OutboundMessage};
use painel_types::phone::normalize_phone;

use crate::messaging::provider::MessagingProvider;
use crate::repository::audience::AudienceRepository;
use crate::repository::campaign::CampaignRepository;

pub const REASON_NO_PHONE: &str = "no phone number";
pub const REASON_UNKNOWN: &str = "unknown error";
pub const REASON_CONNECTION: &str = "connection failure";
pub const REASON_BAD_RESPONSE: &str = "unexpected provider response";

/// Pacing and addressing knobs for the dispatch loop.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// Pause after every provider call.
    pub delay: Duration,
    pub country_code: String,
    pub template_language: String,
}

impl DispatchSettings {
    pub fn from_config(config: &MessagingConfig) -> Self {
        Self {
            delay: Duration::from_millis(config.send_delay_ms),
            country_code: config.country_code.clone(),
            template_language: config.template_language.clone(),
        }
    }
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self::from_config(&MessagingConfig::default())
    }
}

/// Progress notification emitted after each recipient is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchProgress {
    pub processed: usize,
    pub total: usize,
    pub sent: i64,
    pub failed: i64,
}

/// Build the provider message for one recipient.
pub fn build_message(campaign: &Campaign, to: String, settings: &DispatchSettings) -> OutboundMessage {
    let body = match campaign.content() {
        CampaignContent::Text { body } => OutboundBody::Text {
            body: body.to_string(),
        },
        CampaignContent::Image { link, caption } => OutboundBody::Image {
            link: link.to_string(),
            caption: caption.to_string(),
        },
        CampaignContent::Template { name, header_image } => OutboundBody::Template {
            name: name.to_string(),
            language: settings.template_language.clone(),
            header_image: header_image.map(String::from),
        },
    };
    OutboundMessage { to, body }
}

/// Map a provider failure to the reason stored on the send record.
pub fn failure_reason(err: &MessagingError) -> String {
    match err {
        MessagingError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
        MessagingError::Api { .. } => REASON_UNKNOWN.to_string(),
        MessagingError::Transport(_) => REASON_CONNECTION.to_string(),
        MessagingError::Deserialization(_) => REASON_BAD_RESPONSE.to_string(),
        other => other.to_string(),
    }
}

fn storage(e: RepositoryError) -> CampaignError {
    CampaignError::StorageError(e.to_string())
}

/// Claim `campaign_id` for dispatch.
///
/// Refuses without send credentials, then moves the campaign into
/// `processando` with one conditional write, so two concurrent callers
/// cannot both win. Returns the campaign as it was before the claim.
pub async fn claim<C, M>(
    campaigns: &C,
    provider: &M,
    campaign_id: &CampaignId,
) -> Result<Campaign, CampaignError>
where
    C: CampaignRepository,
    M: MessagingProvider,
{
    if !provider.can_send() {
        return Err(CampaignError::CredentialsMissing);
    }

    let campaign = campaigns
        .get_by_id(campaign_id)
        .await
        .map_err(storage)?
        .ok_or(CampaignError::NotFound)?;

    if !campaigns.begin_dispatch(campaign_id).await.map_err(storage)? {
        return Err(CampaignError::AlreadyProcessing);
    }

    Ok(campaign)
}

/// Run the dispatch loop for `campaign_id`: [`claim`] followed by [`execute`].
pub async fn run<C, A, M>(
    campaigns: &C,
    audience: &A,
    provider: &M,
    settings: &DispatchSettings,
    campaign_id: &CampaignId,
    on_progress: &(dyn Fn(DispatchProgress) + Send + Sync),
) -> Result<DispatchSummary, CampaignError>
where
    C: CampaignRepository,
    A: AudienceRepository,
    M: MessagingProvider,
{
    let campaign = claim(campaigns, provider, campaign_id).await?;
    execute(campaigns, audience, provider, settings, &campaign, on_progress).await
}

/// Send a campaign already claimed with [`claim`].
///
/// Steps: load recipients (none: mark `concluida` and fail with
/// `NoRecipients`); insert one `pendente` record per recipient; send to each
/// in order; finally mark `concluida` with the counters. A storage failure
/// on the way puts the campaign back in the status it had before the claim.
pub async fn execute<C, A, M>(
    campaigns: &C,
    audience: &A,
    provider: &M,
    settings: &DispatchSettings,
    campaign: &Campaign,
    on_progress: &(dyn Fn(DispatchProgress) + Send + Sync),
) -> Result<DispatchSummary, CampaignError>
where
    C: CampaignRepository,
    A: AudienceRepository,
    M: MessagingProvider,
{
    let result = send_all(campaigns, audience, provider, settings, campaign, on_progress).await;

    if let Err(CampaignError::StorageError(reason)) = &result {
        tracing::warn!(
            campaign = %campaign.id,
            restored = %campaign.status,
            reason = %reason,
            "campaign dispatch aborted"
        );
        if let Err(e) = campaigns.set_status(&campaign.id, campaign.status).await {
            tracing::error!(campaign = %campaign.id, "failed to restore campaign status: {e}");
        }
    }

    result
}

async fn send_all<C, A, M>(
    campaigns: &C,
    audience: &A,
    provider: &M,
    settings: &DispatchSettings,
    campaign: &Campaign,
    on_progress: &(dyn Fn(DispatchProgress) + Send + Sync),
) -> Result<DispatchSummary, CampaignError>
where
    C: CampaignRepository,
    A: AudienceRepository,
    M: MessagingProvider,
{
    let targets = audience
        .list_targets(campaign.audience)
        .await
        .map_err(storage)?;

    if targets.is_empty() {
        campaigns
            .set_status(&campaign.id, CampaignStatus::Completed)
            .await
            .map_err(storage)?;
        return Err(CampaignError::NoRecipients);
    }

    let sends: Vec<CampaignSend> = targets
        .iter()
        .map(|t| CampaignSend::pending(campaign.id, t.recipient))
        .collect();
    campaigns.insert_sends(&sends).await.map_err(storage)?;

    tracing::info!(
        campaign = %campaign.id,
        audience = %campaign.audience,
        recipients = targets.len(),
        provider = provider.name(),
        "campaign dispatch started"
    );

    let total = targets.len();
    let mut summary = DispatchSummary::default();

    for (index, target) in targets.iter().enumerate() {
        let outcome = send_one(provider, settings, campaign, target).await;

        match &outcome {
            SendOutcome::Sent { .. } => summary.sent += 1,
            SendOutcome::Failed { reason } => {
                summary.failed += 1;
                tracing::warn!(
                    campaign = %campaign.id,
                    recipient = %target.recipient.uuid(),
                    reason = %reason,
                    "campaign send failed"
                );
            }
        }

        if let Err(e) = campaigns
            .record_outcome(&campaign.id, &target.recipient, &outcome)
            .await
        {
            tracing::warn!(campaign = %campaign.id, "failed to record send outcome: {e}");
        }

        on_progress(DispatchProgress {
            processed: index + 1,
            total,
            sent: summary.sent,
            failed: summary.failed,
        });
    }

    campaigns
        .finish(&campaign.id, &summary)
        .await
        .map_err(storage)?;

    tracing::info!(
        campaign = %campaign.id,
        sent = summary.sent,
        failed = summary.failed,
        "campaign dispatch finished"
    );

    Ok(summary)
}

/// Attempt delivery to one recipient.
///
/// A recipient without a dialable number fails immediately and skips the
/// pause; every provider call, successful or not, is followed by it.
async fn send_one<M: MessagingProvider>(
    provider: &M,
    settings: &DispatchSettings,
    campaign: &Campaign,
    target: &DispatchTarget,
) -> SendOutcome {
    let Some(phone) = target
        .phone
        .as_deref()
        .and_then(|p| normalize_phone(p, &settings.country_code))
    else {
        return SendOutcome::Failed {
            reason: REASON_NO_PHONE.to_string(),
        };
    };

    let message = build_message(campaign, phone, settings);
    let result = provider.send_message(&message).await;

    let outcome = match result {
        Ok(receipt) => {
            tracing::debug!(
                campaign = %campaign.id,
                message_id = receipt.message_id.as_deref().unwrap_or("-"),
                "message accepted"
            );
            SendOutcome::Sent {
                at: chrono::Utc::now(),
            }
        }
        Err(e) => SendOutcome::Failed {
            reason: failure_reason(&e),
        },
    };

    if !settings.delay.is_zero() {
        tokio::time::sleep(settings.delay).await;
    }

    outcome
}
