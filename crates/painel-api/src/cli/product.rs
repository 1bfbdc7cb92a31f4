//! Product catalog CLI subcommands.

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Input;

use painel_core::service::product::ProductFilter;
use painel_types::product::{CreateProductRequest, ProductId, UpdateProductRequest};

use super::{confirm_delete, or_dash, print_field, truncate};
use crate::state::AppState;

/// Optional product fields shared by create and update.
#[derive(Args, Default)]
pub struct ProductFields {
    /// Internal product code.
    #[arg(long)]
    pub code: Option<String>,

    /// Product line.
    #[arg(long)]
    pub line: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// Presentation (e.g. "Barra 200g").
    #[arg(long)]
    pub presentation: Option<String>,

    /// Packaging (e.g. "Caixa com 50").
    #[arg(long)]
    pub packaging: Option<String>,
}

/// Product subcommands.
#[derive(Subcommand)]
pub enum ProductCommand {
    /// Add a product to the catalog.
    Create {
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        fields: ProductFields,

        /// Register the product as inactive.
        #[arg(long)]
        inactive: bool,
    },

    /// List the catalog by name.
    #[command(alias = "ls")]
    List {
        /// Substring over name, category and line.
        #[arg(long, short)]
        search: Option<String>,

        /// Exact category.
        #[arg(long)]
        category: Option<String>,
    },

    /// List distinct categories.
    Categories,

    /// Show a product.
    Show {
        id: String,
    },

    /// Edit a product. Omitted fields keep their value.
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        fields: ProductFields,

        /// Set the active flag.
        #[arg(long)]
        active: Option<bool>,
    },

    /// Delete a product.
    #[command(alias = "rm")]
    Delete {
        id: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

/// Handle a product subcommand.
pub async fn handle_product_command(cmd: ProductCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        ProductCommand::Create {
            name,
            fields,
            inactive,
        } => create_product(state, name, fields, !inactive, json).await,
        ProductCommand::List { search, category } => {
            list_products(state, ProductFilter { search, category }, json).await
        }
        ProductCommand::Categories => list_categories(state, json).await,
        ProductCommand::Show { id } => show_product(state, &id, json).await,
        ProductCommand::Update {
            id,
            name,
            fields,
            active,
        } => update_product(state, &id, name, fields, active, json).await,
        ProductCommand::Delete { id, force } => delete_product(state, &id, force, json).await,
    }
}

fn parse_product_id(id: &str) -> Result<ProductId> {
    id.parse::<ProductId>()
        .map_err(|e| anyhow::anyhow!("invalid product id '{id}': {e}"))
}

async fn create_product(
    state: &AppState,
    name: Option<String>,
    fields: ProductFields,
    active: bool,
    json: bool,
) -> Result<()> {
    let name = match name {
        Some(n) => n,
        None => Input::<String>::new().with_prompt("Product name").interact_text()?,
    };

    let request = CreateProductRequest {
        name,
        code: fields.code,
        line: fields.line,
        category: fields.category,
        presentation: fields.presentation,
        packaging: fields.packaging,
        active: Some(active),
    };
    let product = state.product_service.create_product(request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&product)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Product '{}' created",
        style("✓").green().bold(),
        style(&product.name).cyan()
    );
    println!("  {}", style(product.id.to_string()).dim());
    println!();
    Ok(())
}

async fn list_products(state: &AppState, filter: ProductFilter, json: bool) -> Result<()> {
    let products = state.product_service.list_products(filter).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&products)?);
        return Ok(());
    }

    if products.is_empty() {
        println!();
        println!("  {} No products found.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Code").fg(Color::White),
        Cell::new("Category").fg(Color::White),
        Cell::new("Presentation").fg(Color::White),
        Cell::new("Active").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);

    for product in &products {
        let active = if product.active {
            Cell::new("● yes").fg(Color::Green)
        } else {
            Cell::new("○ no").fg(Color::DarkGrey)
        };
        table.add_row(vec![
            Cell::new(truncate(&product.name, 36)).fg(Color::Cyan),
            Cell::new(or_dash(product.code.as_deref())),
            Cell::new(or_dash(product.category.as_deref())),
            Cell::new(or_dash(product.presentation.as_deref())),
            active,
            Cell::new(product.id.to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} product{}",
        style(products.len()).bold(),
        if products.len() == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}

async fn list_categories(state: &AppState, json: bool) -> Result<()> {
    let categories = state.product_service.list_categories().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
        return Ok(());
    }

    println!();
    if categories.is_empty() {
        println!("  {} No categories yet.", style("i").blue().bold());
    }
    for category in &categories {
        println!("  {} {}", style("•").dim(), category);
    }
    println!();
    Ok(())
}

async fn show_product(state: &AppState, id: &str, json: bool) -> Result<()> {
    let product = state.product_service.get_product(&parse_product_id(id)?).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&product)?);
        return Ok(());
    }

    println!();
    println!("  {}", style(&product.name).cyan().bold());
    println!();
    print_field("Code", or_dash(product.code.as_deref()));
    print_field("Line", or_dash(product.line.as_deref()));
    print_field("Category", or_dash(product.category.as_deref()));
    print_field("Presentation", or_dash(product.presentation.as_deref()));
    print_field("Packaging", or_dash(product.packaging.as_deref()));
    print_field(
        "Active",
        if product.active {
            style("yes").green()
        } else {
            style("no").dim()
        },
    );
    print_field("ID", style(product.id.to_string()).dim());
    println!();
    Ok(())
}

async fn update_product(
    state: &AppState,
    id: &str,
    name: Option<String>,
    fields: ProductFields,
    active: Option<bool>,
    json: bool,
) -> Result<()> {
    let id = parse_product_id(id)?;
    let request = UpdateProductRequest {
        name,
        code: fields.code,
        line: fields.line,
        category: fields.category,
        presentation: fields.presentation,
        packaging: fields.packaging,
        active,
    };
    let product = state.product_service.update_product(&id, request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&product)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Product '{}' updated",
        style("✓").green().bold(),
        style(&product.name).cyan()
    );
    println!();
    Ok(())
}

async fn delete_product(state: &AppState, id: &str, force: bool, json: bool) -> Result<()> {
    let id = parse_product_id(id)?;
    let product = state.product_service.get_product(&id).await?;

    if !confirm_delete(&format!("product '{}'", product.name), force || json)? {
        return Ok(());
    }
    state.product_service.delete_product(&id).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({"deleted": true, "id": id}))?
        );
    } else {
        println!();
        println!(
            "  {} Product '{}' deleted",
            style("✓").green().bold(),
            style(&product.name).cyan()
        );
        println!();
    }
    Ok(())
}
