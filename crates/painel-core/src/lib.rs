//! Business logic and repository trait definitions for Painel.
//!
//! This crate defines the "ports" (repository and messaging-provider traits)
//! that the infrastructure layer implements. It depends only on
//! `painel-types` -- never on `painel-infra` or any database/HTTP crate.

pub mod dispatch;
pub mod messaging;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
