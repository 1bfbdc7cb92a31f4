//! CLI command definitions and dispatch for the `painel` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a
//! noun-verb pattern (e.g., `painel lead list`, `painel campaign dispatch`).

pub mod campaign;
pub mod conversation;
pub mod lead;
pub mod product;
pub mod status;
pub mod template;
pub mod vendor;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use console::style;
use dialoguer::Confirm;

/// Admin console for the WhatsApp sales assistant.
#[derive(Parser)]
#[command(name = "painel", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Mirror tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage leads (clientes).
    Lead {
        #[command(subcommand)]
        action: lead::LeadCommand,
    },

    /// Manage vendors (vendedores).
    Vendor {
        #[command(subcommand)]
        action: vendor::VendorCommand,
    },

    /// Manage the product catalog.
    Product {
        #[command(subcommand)]
        action: product::ProductCommand,
    },

    /// Create and dispatch WhatsApp campaigns.
    Campaign {
        #[command(subcommand)]
        action: campaign::CampaignCommand,
    },

    /// Submit and list WhatsApp message templates.
    Template {
        #[command(subcommand)]
        action: template::TemplateCommand,
    },

    /// Browse the assistant's conversation history.
    #[command(alias = "conv")]
    Conversation {
        #[command(subcommand)]
        action: conversation::ConversationCommand,
    },

    /// Dashboard overview: counts, conversation stats and messaging setup.
    Status,

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Ask before a destructive action unless `force` is set.
///
/// Returns `false` when the operator declines.
pub(crate) fn confirm_delete(what: &str, force: bool) -> anyhow::Result<bool> {
    if force {
        return Ok(true);
    }
    let confirmed = Confirm::new()
        .with_prompt(format!("Delete {what}? This cannot be undone"))
        .default(false)
        .interact()?;
    if !confirmed {
        println!("  {}", style("Cancelled.").dim());
    }
    Ok(confirmed)
}

/// Render an optional field for tables and detail views.
pub(crate) fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

/// Shorten `text` to at most `max` characters, appending "..." when cut.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Print a labelled line in detail views.
pub(crate) fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<14} {}", style(format!("{label}:")).bold(), value);
}
