//! Vendor CLI subcommands: create, list, show, update, delete.

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Input;

use painel_core::repository::vendor::VendorFilter;
use painel_types::vendor::{CreateVendorRequest, UpdateVendorRequest, VendorId};

use super::{confirm_delete, or_dash, print_field, truncate};
use crate::state::AppState;

/// Optional vendor fields shared by create and update.
#[derive(Args, Default)]
pub struct VendorFields {
    /// WhatsApp number.
    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    /// Region the vendor covers.
    #[arg(long)]
    pub region: Option<String>,

    /// Comma-separated list of cities served.
    #[arg(long)]
    pub cities: Option<String>,
}

/// Vendor subcommands.
#[derive(Subcommand)]
pub enum VendorCommand {
    /// Register a vendor (prompts for a missing name).
    Create {
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        fields: VendorFields,
    },

    /// List vendors by name.
    #[command(alias = "ls")]
    List {
        /// Substring over name, region and cities.
        #[arg(long, short)]
        search: Option<String>,

        #[arg(long)]
        limit: Option<i64>,
    },

    /// Show a vendor.
    Show {
        id: String,
    },

    /// Edit a vendor. Omitted fields keep their value.
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        fields: VendorFields,
    },

    /// Delete a vendor.
    #[command(alias = "rm")]
    Delete {
        id: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

/// Handle a vendor subcommand.
pub async fn handle_vendor_command(cmd: VendorCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        VendorCommand::Create { name, fields } => create_vendor(state, name, fields, json).await,
        VendorCommand::List { search, limit } => {
            let filter = VendorFilter {
                search,
                limit,
                offset: None,
            };
            list_vendors(state, filter, json).await
        }
        VendorCommand::Show { id } => show_vendor(state, &id, json).await,
        VendorCommand::Update { id, name, fields } => {
            update_vendor(state, &id, name, fields, json).await
        }
        VendorCommand::Delete { id, force } => delete_vendor(state, &id, force, json).await,
    }
}

fn parse_vendor_id(id: &str) -> Result<VendorId> {
    id.parse::<VendorId>()
        .map_err(|e| anyhow::anyhow!("invalid vendor id '{id}': {e}"))
}

async fn create_vendor(
    state: &AppState,
    name: Option<String>,
    fields: VendorFields,
    json: bool,
) -> Result<()> {
    let name = match name {
        Some(n) => n,
        None => Input::<String>::new().with_prompt("Name").interact_text()?,
    };

    let request = CreateVendorRequest {
        name,
        phone: fields.phone,
        email: fields.email,
        address: fields.address,
        region_served: fields.region,
        cities_served: fields.cities,
    };
    let vendor = state.vendor_service.create_vendor(request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&vendor)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Vendor '{}' created",
        style("✓").green().bold(),
        style(&vendor.name).cyan()
    );
    println!("  {}", style(vendor.id.to_string()).dim());
    println!();
    Ok(())
}

async fn list_vendors(state: &AppState, filter: VendorFilter, json: bool) -> Result<()> {
    let vendors = state.vendor_service.list_vendors(Some(filter)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&vendors)?);
        return Ok(());
    }

    if vendors.is_empty() {
        println!();
        println!(
            "  {} No vendors found. Create one with: {}",
            style("i").blue().bold(),
            style("painel vendor create").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Phone").fg(Color::White),
        Cell::new("Region").fg(Color::White),
        Cell::new("Cities").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);

    for vendor in &vendors {
        table.add_row(vec![
            Cell::new(&vendor.name).fg(Color::Cyan),
            Cell::new(or_dash(vendor.phone.as_deref())),
            Cell::new(or_dash(vendor.region_served.as_deref())),
            Cell::new(truncate(&or_dash(vendor.cities_served.as_deref()), 40)),
            Cell::new(vendor.id.to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} vendor{}",
        style(vendors.len()).bold(),
        if vendors.len() == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}

async fn show_vendor(state: &AppState, id: &str, json: bool) -> Result<()> {
    let vendor = state.vendor_service.get_vendor(&parse_vendor_id(id)?).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&vendor)?);
        return Ok(());
    }

    println!();
    println!("  {}", style(&vendor.name).cyan().bold());
    println!();
    print_field("Phone", or_dash(vendor.phone.as_deref()));
    print_field("Email", or_dash(vendor.email.as_deref()));
    print_field("Address", or_dash(vendor.address.as_deref()));
    print_field("Region", or_dash(vendor.region_served.as_deref()));
    print_field("Cities", or_dash(vendor.cities_served.as_deref()));
    print_field("Created", vendor.created_at.format("%Y-%m-%d %H:%M"));
    print_field("ID", style(vendor.id.to_string()).dim());
    println!();
    Ok(())
}

async fn update_vendor(
    state: &AppState,
    id: &str,
    name: Option<String>,
    fields: VendorFields,
    json: bool,
) -> Result<()> {
    let id = parse_vendor_id(id)?;
    let request = UpdateVendorRequest {
        name,
        phone: fields.phone,
        email: fields.email,
        address: fields.address,
        region_served: fields.region,
        cities_served: fields.cities,
    };
    let vendor = state.vendor_service.update_vendor(&id, request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&vendor)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Vendor '{}' updated",
        style("✓").green().bold(),
        style(&vendor.name).cyan()
    );
    println!();
    Ok(())
}

async fn delete_vendor(state: &AppState, id: &str, force: bool, json: bool) -> Result<()> {
    let id = parse_vendor_id(id)?;
    let vendor = state.vendor_service.get_vendor(&id).await?;

    if !confirm_delete(&format!("vendor '{}'", vendor.name), force || json)? {
        return Ok(());
    }
    state.vendor_service.delete_vendor(&id).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({"deleted": true, "id": id}))?
        );
    } else {
        println!();
        println!(
            "  {} Vendor '{}' deleted",
            style("✓").green().bold(),
            style(&vendor.name).cyan()
        );
        println!();
    }
    Ok(())
}
