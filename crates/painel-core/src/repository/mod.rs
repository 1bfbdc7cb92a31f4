//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (painel-infra) implements. The core crate never depends on any
//! specific storage technology.

pub mod audience;
pub mod campaign;
pub mod chat_log;
pub mod conversation;
pub mod lead;
pub mod product;
pub mod vendor;

/// Sort order for list queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Desc
    }
}
