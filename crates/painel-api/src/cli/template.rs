//! Message template CLI subcommands.

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use painel_types::messaging::{HeaderFormat, MessageTemplate, SubmitTemplateRequest, TemplateStatus};

use crate::state::AppState;

/// Template subcommands.
#[derive(Subcommand)]
pub enum TemplateCommand {
    /// Submit a MARKETING template for review.
    Submit {
        /// Template name (lowercased, non-alphanumerics become '_').
        #[arg(long)]
        name: String,

        /// Body text.
        #[arg(long)]
        body: String,

        /// Optional media header (image or document).
        #[arg(long)]
        header: Option<String>,
    },

    /// List registered templates split by approval.
    #[command(alias = "ls")]
    List,
}

/// Handle a template subcommand.
pub async fn handle_template_command(
    cmd: TemplateCommand,
    state: &AppState,
    json: bool,
) -> Result<()> {
    match cmd {
        TemplateCommand::Submit { name, body, header } => {
            let header = header
                .as_deref()
                .map(|h| h.parse::<HeaderFormat>().map_err(|e| anyhow::anyhow!(e)))
                .transpose()?;
            submit_template(state, SubmitTemplateRequest { name, body, header }, json).await
        }
        TemplateCommand::List => list_templates(state, json).await,
    }
}

fn spinner(message: &'static str, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    Ok(spinner)
}

async fn submit_template(state: &AppState, request: SubmitTemplateRequest, json: bool) -> Result<()> {
    let spinner = spinner("Submitting template...", json)?;
    let result = state.template_service.submit_template(request).await;
    spinner.finish_and_clear();
    let submission = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&submission)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Template '{}' submitted ({})",
        style("✓").green().bold(),
        style(&submission.name).cyan(),
        submission.status
    );
    println!("  {}", style(format!("id {}", submission.id)).dim());
    println!();
    Ok(())
}

fn template_table(templates: &[MessageTemplate]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Category").fg(Color::White),
        Cell::new("Language").fg(Color::White),
    ]);
    for template in templates {
        let color = match template.status {
            TemplateStatus::Approved => Color::Green,
            TemplateStatus::Pending => Color::Yellow,
            TemplateStatus::Rejected | TemplateStatus::Disabled => Color::Red,
            TemplateStatus::Paused => Color::DarkGrey,
        };
        table.add_row(vec![
            Cell::new(&template.name).fg(Color::Cyan),
            Cell::new(template.status.to_string()).fg(color),
            Cell::new(&template.category),
            Cell::new(&template.language).fg(Color::DarkGrey),
        ]);
    }
    table
}

async fn list_templates(state: &AppState, json: bool) -> Result<()> {
    let spinner = spinner("Loading templates...", json)?;
    let result = state.template_service.catalog().await;
    spinner.finish_and_clear();
    let catalog = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    println!();
    println!("  {}", style("── Approved ──").dim());
    if catalog.approved.is_empty() {
        println!("  {} No approved templates yet.", style("i").blue().bold());
    } else {
        println!("{}", template_table(&catalog.approved));
    }
    println!();

    if !catalog.pending.is_empty() {
        println!("  {}", style("── Awaiting review / unusable ──").dim());
        println!("{}", template_table(&catalog.pending));
        println!();
    }
    Ok(())
}
