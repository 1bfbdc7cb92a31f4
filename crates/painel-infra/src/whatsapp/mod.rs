//! Meta WhatsApp Cloud API provider.
//!
//! This module provides [`MetaCloudClient`], which implements the
//! [`MessagingProvider`](painel_core::messaging::provider::MessagingProvider)
//! trait over the Graph API endpoints for template management and
//! message sending.

pub mod client;
pub mod types;

pub use client::{MetaCloudClient, MetaCredentials};
