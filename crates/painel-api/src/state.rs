//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository/provider traits, but AppState pins
//! them to the SQLite repositories and the WhatsApp Cloud client.

use std::path::PathBuf;
use std::sync::Arc;

use painel_core::dispatch::DispatchSettings;
use painel_core::messaging::provider::MessagingProvider;
use painel_core::service::campaign::CampaignService;
use painel_core::service::conversation::ConversationService;
use painel_core::service::dashboard::DashboardService;
use painel_core::service::lead::LeadService;
use painel_core::service::product::ProductService;
use painel_core::service::template::TemplateService;
use painel_core::service::vendor::VendorService;
use painel_infra::config::{load_global_config, resolve_data_dir};
use painel_infra::sqlite::audience::SqliteAudienceRepository;
use painel_infra::sqlite::campaign::SqliteCampaignRepository;
use painel_infra::sqlite::chat_log::SqliteChatLogRepository;
use painel_infra::sqlite::conversation::SqliteConversationRepository;
use painel_infra::sqlite::lead::SqliteLeadRepository;
use painel_infra::sqlite::pool::DatabasePool;
use painel_infra::sqlite::product::SqliteProductRepository;
use painel_infra::sqlite::vendor::SqliteVendorRepository;
use painel_infra::whatsapp::{MetaCloudClient, MetaCredentials};
use painel_types::config::GlobalConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteLeadService = LeadService<SqliteLeadRepository>;

pub type ConcreteVendorService = VendorService<SqliteVendorRepository>;

pub type ConcreteProductService = ProductService<SqliteProductRepository>;

pub type ConcreteCampaignService =
    CampaignService<SqliteCampaignRepository, SqliteAudienceRepository, Arc<MetaCloudClient>>;

pub type ConcreteTemplateService = TemplateService<Arc<MetaCloudClient>>;

pub type ConcreteConversationService =
    ConversationService<SqliteChatLogRepository, SqliteLeadRepository>;

pub type ConcreteDashboardService =
    DashboardService<SqliteConversationRepository, SqliteLeadRepository>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub lead_service: Arc<ConcreteLeadService>,
    pub vendor_service: Arc<ConcreteVendorService>,
    pub product_service: Arc<ConcreteProductService>,
    pub campaign_service: Arc<ConcreteCampaignService>,
    pub template_service: Arc<ConcreteTemplateService>,
    pub conversation_service: Arc<ConcreteConversationService>,
    pub dashboard_service: Arc<ConcreteDashboardService>,
    /// Shared WhatsApp client, kept for capability checks.
    pub messaging: Arc<MetaCloudClient>,
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;

        let db_url = format!("sqlite://{}?mode=rwc", data_dir.join("painel.db").display());
        let db_pool = DatabasePool::new(&db_url).await?;

        Ok(Self::build(db_pool, config, data_dir, MetaCredentials::from_env()))
    }

    /// Wire every service over an open pool.
    pub fn build(
        db_pool: DatabasePool,
        config: GlobalConfig,
        data_dir: PathBuf,
        credentials: MetaCredentials,
    ) -> Self {
        let meta = Arc::new(MetaCloudClient::new(&config.messaging, credentials));
        if !meta.can_send() {
            tracing::debug!("WhatsApp send credentials not set; dispatch is disabled");
        }

        let lead_service = LeadService::new(SqliteLeadRepository::new(db_pool.clone()));
        let vendor_service = VendorService::new(SqliteVendorRepository::new(db_pool.clone()));
        let product_service = ProductService::new(SqliteProductRepository::new(db_pool.clone()));

        let campaign_service = CampaignService::new(
            SqliteCampaignRepository::new(db_pool.clone()),
            SqliteAudienceRepository::new(db_pool.clone()),
            meta.clone(),
            DispatchSettings::from_config(&config.messaging),
        );
        let template_service = TemplateService::new(meta.clone(), config.messaging.template_language.clone());

        let conversation_service = ConversationService::new(
            SqliteChatLogRepository::new(db_pool.clone()),
            SqliteLeadRepository::new(db_pool.clone()),
        );
        let dashboard_service = DashboardService::new(
            SqliteConversationRepository::new(db_pool.clone()),
            SqliteLeadRepository::new(db_pool.clone()),
            config.business.utc_offset_minutes,
        );

        Self {
            lead_service: Arc::new(lead_service),
            vendor_service: Arc::new(vendor_service),
            product_service: Arc::new(product_service),
            campaign_service: Arc::new(campaign_service),
            template_service: Arc::new(template_service),
            conversation_service: Arc::new(conversation_service),
            dashboard_service: Arc::new(dashboard_service),
            messaging: meta,
            config: Arc::new(config),
            data_dir,
            db_pool,
        }
    }
}
