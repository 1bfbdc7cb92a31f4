//! Infrastructure layer for Painel.
//!
//! Contains implementations of the repository and provider traits defined in
//! `painel-core`: SQLite storage, the WhatsApp Cloud API client, and the
//! configuration loader.

pub mod config;
pub mod sqlite;
pub mod whatsapp;
