//! Global configuration types for Painel.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! messaging provider endpoint, dispatch pacing and business settings.
//! Credentials are never read from this file.

use serde::{Deserialize, Serialize};

use crate::messaging::DEFAULT_TEMPLATE_LANGUAGE;
use crate::phone::DEFAULT_COUNTRY_CODE;

/// Top-level configuration. All fields have defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub messaging: MessagingConfig,

    #[serde(default)]
    pub business: BusinessConfig,
}

/// Messaging provider and dispatch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// Graph API root, version included.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_template_language")]
    pub template_language: String,

    /// Prefixed to recipient numbers that lack it.
    #[serde(default = "default_country_code")]
    pub country_code: String,

    /// Pause after every send attempt in the dispatch loop.
    #[serde(default = "default_send_delay_ms")]
    pub send_delay_ms: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "https://graph.facebook.com/v21.0".to_string()
}

fn default_template_language() -> String {
    DEFAULT_TEMPLATE_LANGUAGE.to_string()
}

fn default_country_code() -> String {
    DEFAULT_COUNTRY_CODE.to_string()
}

fn default_send_delay_ms() -> u64 {
    1_000
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            template_language: default_template_language(),
            country_code: default_country_code(),
            send_delay_ms: default_send_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Business identity and locale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessConfig {
    #[serde(default = "default_company_name")]
    pub company_name: String,

    /// Offset of local time from UTC, used for "today" on the dashboard.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

fn default_company_name() -> String {
    "Indústria Arcoverde".to_string()
}

/// America/Recife (UTC-3, no DST).
fn default_utc_offset_minutes() -> i32 {
    -180
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            company_name: default_company_name(),
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}
