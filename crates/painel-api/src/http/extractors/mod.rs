//! Request extractors: API key authentication and list query parameters.

pub mod auth;
pub mod query;
