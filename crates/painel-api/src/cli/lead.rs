//! Lead CLI subcommands: create, list, show, update, delete.

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Input;

use painel_core::repository::SortOrder;
use painel_core::repository::lead::LeadFilter;
use painel_types::lead::{CreateLeadRequest, Lead, LeadId, LeadStatus, UpdateLeadRequest};

use super::{confirm_delete, or_dash, print_field, truncate};
use crate::state::AppState;

/// Optional lead fields shared by create and update.
#[derive(Args, Default)]
pub struct LeadFields {
    /// CPF or CNPJ.
    #[arg(long)]
    pub document: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// Pipeline status (novo, contatado, cotacao_enviada, venda_fechada, perdido, ativo).
    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub street: Option<String>,

    #[arg(long)]
    pub number: Option<String>,

    #[arg(long)]
    pub district: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    /// State abbreviation (UF).
    #[arg(long)]
    pub state: Option<String>,

    /// CEP.
    #[arg(long)]
    pub postal_code: Option<String>,
}

impl LeadFields {
    fn status(&self) -> Result<Option<LeadStatus>> {
        self.status
            .as_deref()
            .map(|s| s.parse::<LeadStatus>().map_err(|e| anyhow::anyhow!(e)))
            .transpose()
    }
}

/// Lead subcommands.
#[derive(Subcommand)]
pub enum LeadCommand {
    /// Register a lead (prompts for missing name/contact).
    Create {
        #[arg(long)]
        name: Option<String>,

        /// WhatsApp number.
        #[arg(long)]
        contact: Option<String>,

        #[command(flatten)]
        fields: LeadFields,
    },

    /// List leads, newest first.
    #[command(alias = "ls")]
    List {
        /// Filter by status.
        #[arg(long)]
        status: Option<String>,

        /// Substring over name and contact.
        #[arg(long, short)]
        search: Option<String>,

        /// Sort field (created_at, name, status).
        #[arg(long, default_value = "created_at")]
        sort: String,

        /// Sort ascending instead of descending.
        #[arg(long)]
        asc: bool,

        #[arg(long)]
        limit: Option<i64>,
    },

    /// Show a lead.
    Show {
        id: String,
    },

    /// Edit a lead. Omitted fields keep their value.
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        contact: Option<String>,

        #[command(flatten)]
        fields: LeadFields,
    },

    /// Delete a lead.
    #[command(alias = "rm")]
    Delete {
        id: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

/// Handle a lead subcommand.
pub async fn handle_lead_command(cmd: LeadCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        LeadCommand::Create {
            name,
            contact,
            fields,
        } => create_lead(state, name, contact, fields, json).await,
        LeadCommand::List {
            status,
            search,
            sort,
            asc,
            limit,
        } => {
            let filter = LeadFilter {
                status: status.map(LeadStatus::from),
                search,
                sort_by: Some(sort),
                sort_order: Some(if asc { SortOrder::Asc } else { SortOrder::Desc }),
                limit,
                offset: None,
            };
            list_leads(state, filter, json).await
        }
        LeadCommand::Show { id } => show_lead(state, &id, json).await,
        LeadCommand::Update {
            id,
            name,
            contact,
            fields,
        } => update_lead(state, &id, name, contact, fields, json).await,
        LeadCommand::Delete { id, force } => delete_lead(state, &id, force, json).await,
    }
}

fn parse_lead_id(id: &str) -> Result<LeadId> {
    id.parse::<LeadId>()
        .map_err(|e| anyhow::anyhow!("invalid lead id '{id}': {e}"))
}

async fn create_lead(
    state: &AppState,
    name: Option<String>,
    contact: Option<String>,
    fields: LeadFields,
    json: bool,
) -> Result<()> {
    let name = match name {
        Some(n) => n,
        None => Input::<String>::new().with_prompt("Name").interact_text()?,
    };
    let contact = match contact {
        Some(c) => c,
        None => Input::<String>::new()
            .with_prompt("WhatsApp contact")
            .interact_text()?,
    };

    let request = CreateLeadRequest {
        name,
        contact,
        status: fields.status()?,
        document: fields.document,
        email: fields.email,
        street: fields.street,
        number: fields.number,
        district: fields.district,
        city: fields.city,
        state: fields.state,
        postal_code: fields.postal_code,
    };
    let lead = state.lead_service.create_lead(request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&lead)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Lead '{}' created",
        style("✓").green().bold(),
        style(&lead.name).cyan()
    );
    println!("  {}", style(lead.id.to_string()).dim());
    println!();
    Ok(())
}

async fn list_leads(state: &AppState, filter: LeadFilter, json: bool) -> Result<()> {
    let leads = state.lead_service.list_leads(Some(filter)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&leads)?);
        return Ok(());
    }

    if leads.is_empty() {
        println!();
        println!(
            "  {} No leads found. Create one with: {}",
            style("i").blue().bold(),
            style("painel lead create").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Contact").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("City").fg(Color::White),
        Cell::new("Created").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);

    for lead in &leads {
        table.add_row(vec![
            Cell::new(truncate(&lead.name, 32)).fg(Color::Cyan),
            Cell::new(or_dash(lead.contact.as_deref())),
            status_cell(&lead.status),
            Cell::new(or_dash(lead.city.as_deref())),
            Cell::new(lead.created_at.format("%Y-%m-%d").to_string()).fg(Color::DarkGrey),
            Cell::new(lead.id.to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} lead{}",
        style(leads.len()).bold(),
        if leads.len() == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}

fn status_cell(status: &LeadStatus) -> Cell {
    let color = match status {
        LeadStatus::New => Color::Blue,
        LeadStatus::Contacted | LeadStatus::QuoteSent => Color::Yellow,
        LeadStatus::Won | LeadStatus::Active => Color::Green,
        LeadStatus::Lost => Color::DarkGrey,
        LeadStatus::Other(_) => Color::White,
    };
    Cell::new(status.as_str()).fg(color)
}

async fn show_lead(state: &AppState, id: &str, json: bool) -> Result<()> {
    let lead = state.lead_service.get_lead(&parse_lead_id(id)?).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&lead)?);
        return Ok(());
    }

    print_lead(&lead);
    Ok(())
}

fn print_lead(lead: &Lead) {
    println!();
    println!("  {}", style(&lead.name).cyan().bold());
    println!();
    print_field("Contact", or_dash(lead.contact.as_deref()));
    print_field("Status", &lead.status);
    print_field("Document", or_dash(lead.document.as_deref()));
    print_field("Email", or_dash(lead.email.as_deref()));

    let address: Vec<&str> = [
        lead.street.as_deref(),
        lead.number.as_deref(),
        lead.district.as_deref(),
        lead.city.as_deref(),
        lead.state.as_deref(),
        lead.postal_code.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|s| !s.trim().is_empty())
    .collect();
    print_field(
        "Address",
        if address.is_empty() {
            "-".to_string()
        } else {
            address.join(", ")
        },
    );
    print_field("Created", lead.created_at.format("%Y-%m-%d %H:%M"));
    print_field("ID", style(lead.id.to_string()).dim());
    println!();
}

async fn update_lead(
    state: &AppState,
    id: &str,
    name: Option<String>,
    contact: Option<String>,
    fields: LeadFields,
    json: bool,
) -> Result<()> {
    let id = parse_lead_id(id)?;
    let current = state.lead_service.get_lead(&id).await?;

    let request = UpdateLeadRequest {
        name: name.unwrap_or(current.name),
        contact: contact.or(current.contact).unwrap_or_default(),
        status: fields.status()?,
        document: fields.document,
        email: fields.email,
        street: fields.street,
        number: fields.number,
        district: fields.district,
        city: fields.city,
        state: fields.state,
        postal_code: fields.postal_code,
    };
    let lead = state.lead_service.update_lead(&id, request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&lead)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Lead '{}' updated",
        style("✓").green().bold(),
        style(&lead.name).cyan()
    );
    println!();
    Ok(())
}

async fn delete_lead(state: &AppState, id: &str, force: bool, json: bool) -> Result<()> {
    let id = parse_lead_id(id)?;
    let lead = state.lead_service.get_lead(&id).await?;

    if !confirm_delete(&format!("lead '{}'", lead.name), force || json)? {
        return Ok(());
    }
    state.lead_service.delete_lead(&id).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({"deleted": true, "id": id}))?
        );
    } else {
        println!();
        println!(
            "  {} Lead '{}' deleted",
            style("✓").green().bold(),
            style(&lead.name).cyan()
        );
        println!();
    }
    Ok(())
}
