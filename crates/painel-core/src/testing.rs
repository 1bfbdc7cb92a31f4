//! In-memory repositories and a scripted messaging provider for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use painel_types::campaign::{
    Audience, Campaign, CampaignId, CampaignSend, CampaignStatus, DispatchSummary,
    DispatchTarget, Recipient, SendOutcome, SendStatus,
};
use painel_types::chat::ChatLogEntry;
use painel_types::error::{MessagingError, RepositoryError};
use painel_types::lead::{Lead, LeadId};
use painel_types::messaging::{
    MessageTemplate, OutboundMessage, SendReceipt, TemplateDraft, TemplateStatus,
    TemplateSubmission,
};
use painel_types::product::{Product, ProductId};
use painel_types::stats::DateRange;
use painel_types::vendor::{Vendor, VendorId};

use crate::messaging::provider::MessagingProvider;
use crate::repository::SortOrder;
use crate::repository::audience::AudienceRepository;
use crate::repository::campaign::{CampaignFilter, CampaignRepository};
use crate::repository::chat_log::ChatLogRepository;
use crate::repository::conversation::ConversationStatsRepository;
use crate::repository::lead::{LeadFilter, LeadRepository};
use crate::repository::product::ProductRepository;
use crate::repository::vendor::{VendorFilter, VendorRepository};

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .map(|h| h.to_lowercase().contains(&needle.to_lowercase()))
        .unwrap_or(false)
}

fn paginate<T>(items: Vec<T>, limit: Option<i64>, offset: Option<i64>) -> Vec<T> {
    let offset = offset.unwrap_or(0).max(0) as usize;
    let limit = limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
    items.into_iter().skip(offset).take(limit).collect()
}

// --- Leads ---

#[derive(Default)]
pub struct InMemoryLeads {
    leads: Mutex<Vec<Lead>>,
}

impl InMemoryLeads {
    pub fn with(leads: Vec<Lead>) -> Self {
        Self {
            leads: Mutex::new(leads),
        }
    }
}

impl LeadRepository for InMemoryLeads {
    async fn create(&self, lead: &Lead) -> Result<Lead, RepositoryError> {
        self.leads.lock().unwrap().push(lead.clone());
        Ok(lead.clone())
    }

    async fn get_by_id(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        Ok(self.leads.lock().unwrap().iter().find(|l| l.id == *id).cloned())
    }

    async fn list(&self, filter: Option<LeadFilter>) -> Result<Vec<Lead>, RepositoryError> {
        let filter = filter.unwrap_or_default();
        let mut leads: Vec<Lead> = self
            .leads
            .lock()
            .unwrap()
            .iter()
            .filter(|l| filter.status.as_ref().is_none_or(|s| &l.status == s))
            .filter(|l| {
                filter.search.as_deref().is_none_or(|q| {
                    contains_ci(Some(&l.name), q) || contains_ci(l.contact.as_deref(), q)
                })
            })
            .cloned()
            .collect();
        leads.sort_by_key(|l| l.created_at);
        if filter.sort_order.unwrap_or_default() == SortOrder::Desc {
            leads.reverse();
        }
        Ok(paginate(leads, filter.limit, filter.offset))
    }

    async fn update(&self, lead: &Lead) -> Result<Lead, RepositoryError> {
        let mut leads = self.leads.lock().unwrap();
        let slot = leads
            .iter_mut()
            .find(|l| l.id == lead.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = lead.clone();
        Ok(lead.clone())
    }

    async fn delete(&self, id: &LeadId) -> Result<(), RepositoryError> {
        let mut leads = self.leads.lock().unwrap();
        let before = leads.len();
        leads.retain(|l| l.id != *id);
        if leads.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        Ok(self.leads.lock().unwrap().len() as i64)
    }
}

// --- Vendors ---

#[derive(Default)]
pub struct InMemoryVendors {
    vendors: Mutex<Vec<Vendor>>,
}

impl VendorRepository for InMemoryVendors {
    async fn create(&self, vendor: &Vendor) -> Result<Vendor, RepositoryError> {
        self.vendors.lock().unwrap().push(vendor.clone());
        Ok(vendor.clone())
    }

    async fn get_by_id(&self, id: &VendorId) -> Result<Option<Vendor>, RepositoryError> {
        Ok(self.vendors.lock().unwrap().iter().find(|v| v.id == *id).cloned())
    }

    async fn list(&self, filter: Option<VendorFilter>) -> Result<Vec<Vendor>, RepositoryError> {
        let filter = filter.unwrap_or_default();
        let mut vendors: Vec<Vendor> = self
            .vendors
            .lock()
            .unwrap()
            .iter()
            .filter(|v| {
                filter.search.as_deref().is_none_or(|q| {
                    contains_ci(Some(&v.name), q)
                        || contains_ci(v.region_served.as_deref(), q)
                        || contains_ci(v.cities_served.as_deref(), q)
                })
            })
            .cloned()
            .collect();
        vendors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(paginate(vendors, filter.limit, filter.offset))
    }

    async fn update(&self, vendor: &Vendor) -> Result<Vendor, RepositoryError> {
        let mut vendors = self.vendors.lock().unwrap();
        let slot = vendors
            .iter_mut()
            .find(|v| v.id == vendor.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = vendor.clone();
        Ok(vendor.clone())
    }

    async fn delete(&self, id: &VendorId) -> Result<(), RepositoryError> {
        let mut vendors = self.vendors.lock().unwrap();
        let before = vendors.len();
        vendors.retain(|v| v.id != *id);
        if vendors.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        Ok(self.vendors.lock().unwrap().len() as i64)
    }
}

// --- Products ---

#[derive(Default)]
pub struct InMemoryProducts {
    products: Mutex<Vec<Product>>,
}

impl ProductRepository for InMemoryProducts {
    async fn create(&self, product: &Product) -> Result<Product, RepositoryError> {
        self.products.lock().unwrap().push(product.clone());
        Ok(product.clone())
    }

    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.products.lock().unwrap().iter().find(|p| p.id == *id).cloned())
    }

    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let mut products = self.products.lock().unwrap().clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn update(&self, product: &Product) -> Result<Product, RepositoryError> {
        let mut products = self.products.lock().unwrap();
        let slot = products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = product.clone();
        Ok(product.clone())
    }

    async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != *id);
        if products.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

// --- Audience ---

#[derive(Default)]
pub struct InMemoryAudience {
    leads: Vec<DispatchTarget>,
    vendors: Vec<DispatchTarget>,
    failure: Option<String>,
}

impl InMemoryAudience {
    pub fn with_leads(mut self, leads: Vec<DispatchTarget>) -> Self {
        self.leads = leads;
        self
    }

    pub fn with_vendors(mut self, vendors: Vec<DispatchTarget>) -> Self {
        self.vendors = vendors;
        self
    }

    /// Make `list_targets` fail with a query error.
    pub fn failing(mut self, reason: &str) -> Self {
        self.failure = Some(reason.to_string());
        self
    }

    fn targets(&self, audience: Audience) -> &[DispatchTarget] {
        match audience {
            Audience::Leads => &self.leads,
            Audience::Vendors => &self.vendors,
        }
    }
}

impl AudienceRepository for InMemoryAudience {
    async fn count_targets(&self, audience: Audience) -> Result<i64, RepositoryError> {
        Ok(self.targets(audience).len() as i64)
    }

    async fn list_targets(&self, audience: Audience) -> Result<Vec<DispatchTarget>, RepositoryError> {
        if let Some(reason) = &self.failure {
            return Err(RepositoryError::Query(reason.clone()));
        }
        Ok(self.targets(audience).to_vec())
    }
}

// --- Campaigns ---

#[derive(Default)]
pub struct InMemoryCampaigns {
    campaigns: Mutex<HashMap<CampaignId, Campaign>>,
    sends: Mutex<Vec<CampaignSend>>,
}

impl InMemoryCampaigns {
    pub fn insert(&self, campaign: Campaign) {
        self.campaigns.lock().unwrap().insert(campaign.id, campaign);
    }

    pub fn get(&self, id: &CampaignId) -> Campaign {
        self.campaigns.lock().unwrap()[id].clone()
    }

    pub fn sends(&self, id: &CampaignId) -> Vec<CampaignSend> {
        self.sends
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.campaign_id == *id)
            .cloned()
            .collect()
    }
}

impl CampaignRepository for InMemoryCampaigns {
    async fn create(&self, campaign: &Campaign) -> Result<Campaign, RepositoryError> {
        self.insert(campaign.clone());
        Ok(campaign.clone())
    }

    async fn get_by_id(&self, id: &CampaignId) -> Result<Option<Campaign>, RepositoryError> {
        Ok(self.campaigns.lock().unwrap().get(id).cloned())
    }

    async fn list(&self, filter: Option<CampaignFilter>) -> Result<Vec<Campaign>, RepositoryError> {
        let filter = filter.unwrap_or_default();
        let mut campaigns: Vec<Campaign> = self
            .campaigns
            .lock()
            .unwrap()
            .values()
            .filter(|c| filter.status.is_none_or(|s| c.status == s))
            .filter(|c| {
                filter.search.as_deref().is_none_or(|q| {
                    contains_ci(Some(&c.name), q) || contains_ci(Some(&c.audience.to_string()), q)
                })
            })
            .cloned()
            .collect();
        campaigns.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(campaigns, filter.limit, filter.offset))
    }

    async fn delete(&self, id: &CampaignId) -> Result<(), RepositoryError> {
        if self.campaigns.lock().unwrap().remove(id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        self.sends.lock().unwrap().retain(|s| s.campaign_id != *id);
        Ok(())
    }

    async fn set_status(&self, id: &CampaignId, status: CampaignStatus) -> Result<(), RepositoryError> {
        let mut campaigns = self.campaigns.lock().unwrap();
        let campaign = campaigns.get_mut(id).ok_or(RepositoryError::NotFound)?;
        campaign.status = status;
        campaign.updated_at = Utc::now();
        Ok(())
    }

    async fn begin_dispatch(&self, id: &CampaignId) -> Result<bool, RepositoryError> {
        let mut campaigns = self.campaigns.lock().unwrap();
        match campaigns.get_mut(id) {
            Some(c) if c.status != CampaignStatus::Processing => {
                c.status = CampaignStatus::Processing;
                c.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn finish(&self, id: &CampaignId, summary: &DispatchSummary) -> Result<(), RepositoryError> {
        let mut campaigns = self.campaigns.lock().unwrap();
        let campaign = campaigns.get_mut(id).ok_or(RepositoryError::NotFound)?;
        campaign.status = CampaignStatus::Completed;
        campaign.sent = summary.sent;
        campaign.failed = summary.failed;
        campaign.updated_at = Utc::now();
        Ok(())
    }

    async fn insert_sends(&self, sends: &[CampaignSend]) -> Result<(), RepositoryError> {
        self.sends.lock().unwrap().extend_from_slice(sends);
        Ok(())
    }

    async fn record_outcome(
        &self,
        campaign_id: &CampaignId,
        recipient: &Recipient,
        outcome: &SendOutcome,
    ) -> Result<(), RepositoryError> {
        let mut sends = self.sends.lock().unwrap();
        for send in sends.iter_mut().filter(|s| {
            s.campaign_id == *campaign_id
                && s.recipient == *recipient
                && s.status == SendStatus::Pending
        }) {
            match outcome {
                SendOutcome::Sent { at } => {
                    send.status = SendStatus::Sent;
                    send.sent_at = Some(*at);
                }
                SendOutcome::Failed { reason } => {
                    send.status = SendStatus::Failed;
                    send.error_message = Some(reason.clone());
                }
            }
        }
        Ok(())
    }

    async fn list_sends(&self, campaign_id: &CampaignId) -> Result<Vec<CampaignSend>, RepositoryError> {
        Ok(self.sends(campaign_id))
    }
}

pub fn sample_campaign(audience: Audience) -> Campaign {
    let now = Utc::now();
    Campaign {
        id: CampaignId::new(),
        name: "Promoção de Natal".to_string(),
        message: "Aproveite nossas ofertas!".to_string(),
        image_url: None,
        template_name: None,
        audience,
        status: CampaignStatus::Draft,
        total_targets: 0,
        sent: 0,
        failed: 0,
        created_at: now,
        updated_at: now,
    }
}

// --- Chat log ---

#[derive(Default)]
pub struct InMemoryChatLog {
    entries: Vec<ChatLogEntry>,
}

impl InMemoryChatLog {
    pub fn with(entries: Vec<ChatLogEntry>) -> Self {
        Self { entries }
    }
}

impl ChatLogRepository for InMemoryChatLog {
    async fn list_entries(&self) -> Result<Vec<ChatLogEntry>, RepositoryError> {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|e| e.id);
        Ok(entries)
    }

    async fn list_session_entries(&self, session_id: &str) -> Result<Vec<ChatLogEntry>, RepositoryError> {
        let mut entries: Vec<ChatLogEntry> = self
            .entries
            .iter()
            .filter(|e| e.session_id == session_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.id);
        Ok(entries)
    }
}

// --- Conversation summaries ---

#[derive(Debug, Clone)]
pub struct ConversationRow {
    pub status: String,
    pub duration_seconds: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct InMemoryConversations {
    rows: Vec<ConversationRow>,
}

impl InMemoryConversations {
    pub fn with(rows: Vec<ConversationRow>) -> Self {
        Self { rows }
    }

    fn in_range<'a>(&'a self, range: &'a DateRange) -> impl Iterator<Item = &'a ConversationRow> {
        self.rows.iter().filter(move |r| {
            range.start.is_none_or(|s| r.created_at >= s) && range.end.is_none_or(|e| r.created_at <= e)
        })
    }
}

impl ConversationStatsRepository for InMemoryConversations {
    async fn count(&self, range: &DateRange) -> Result<i64, RepositoryError> {
        Ok(self.in_range(range).count() as i64)
    }

    async fn count_with_status(&self, status: &str, range: &DateRange) -> Result<i64, RepositoryError> {
        Ok(self.in_range(range).filter(|r| r.status == status).count() as i64)
    }

    async fn durations(&self, range: &DateRange, limit: i64) -> Result<Vec<i64>, RepositoryError> {
        Ok(self
            .in_range(range)
            .filter_map(|r| r.duration_seconds)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn created_since(&self, since: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>, RepositoryError> {
        Ok(self
            .rows
            .iter()
            .filter(|r| r.created_at >= since)
            .map(|r| r.created_at)
            .collect())
    }
}

// --- Messaging provider ---

/// Scripted provider: accepts everything unless told otherwise per number.
pub struct MockProvider {
    configured: bool,
    rejections: HashMap<String, String>,
    disconnects: HashSet<String>,
    templates: Vec<MessageTemplate>,
    sent: Mutex<Vec<OutboundMessage>>,
    submitted: Mutex<Vec<TemplateDraft>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            configured: true,
            rejections: HashMap::new(),
            disconnects: HashSet::new(),
            templates: Vec::new(),
            sent: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    /// Answer sends to `to` with an API error carrying `message`.
    pub fn reject(mut self, to: &str, message: &str) -> Self {
        self.rejections.insert(to.to_string(), message.to_string());
        self
    }

    /// Fail sends to `to` with a transport error.
    pub fn disconnect(mut self, to: &str) -> Self {
        self.disconnects.insert(to.to_string());
        self
    }

    pub fn with_templates(mut self, templates: Vec<MessageTemplate>) -> Self {
        self.templates = templates;
        self
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn submitted(&self) -> Vec<TemplateDraft> {
        self.submitted.lock().unwrap().clone()
    }
}

impl MessagingProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn can_send(&self) -> bool {
        self.configured
    }

    fn can_manage_templates(&self) -> bool {
        self.configured
    }

    async fn submit_template(&self, draft: &TemplateDraft) -> Result<TemplateSubmission, MessagingError> {
        if !self.configured {
            return Err(MessagingError::NotConfigured);
        }
        self.submitted.lock().unwrap().push(draft.clone());
        Ok(TemplateSubmission {
            id: "1234567890".to_string(),
            name: draft.name.clone(),
            status: TemplateStatus::Pending,
        })
    }

    async fn list_templates(&self) -> Result<Vec<MessageTemplate>, MessagingError> {
        if !self.configured {
            return Err(MessagingError::NotConfigured);
        }
        Ok(self.templates.clone())
    }

    async fn send_message(&self, message: &OutboundMessage) -> Result<SendReceipt, MessagingError> {
        if !self.configured {
            return Err(MessagingError::NotConfigured);
        }
        self.sent.lock().unwrap().push(message.clone());
        if self.disconnects.contains(&message.to) {
            return Err(MessagingError::Transport("connection reset".to_string()));
        }
        if let Some(reason) = self.rejections.get(&message.to) {
            return Err(MessagingError::Api {
                status: 400,
                message: reason.clone(),
            });
        }
        Ok(SendReceipt {
            message_id: Some(format!("wamid.{}", message.to)),
        })
    }
}
