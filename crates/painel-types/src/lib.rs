//! Shared domain types for Painel.
//!
//! This crate contains the domain types used across the admin backend:
//! leads, vendors, products, campaigns, message templates, chat transcripts,
//! dashboard statistics, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod campaign;
pub mod chat;
pub mod config;
pub mod error;
pub mod id;
pub mod lead;
pub mod messaging;
pub mod phone;
pub mod product;
pub mod stats;
pub mod vendor;
