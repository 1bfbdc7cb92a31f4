//! Messaging provider abstraction.
//!
//! The dispatch loop and template service talk to the provider through
//! [`provider::MessagingProvider`]; the Meta WhatsApp Cloud implementation
//! lives in painel-infra.

pub mod provider;
pub mod template;
