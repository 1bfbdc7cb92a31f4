//! Campaign CLI subcommands: create, list, show, sends, dispatch, release,
//! delete.
//!
//! `dispatch` runs the send loop in the foreground with a progress bar; the
//! REST endpoint runs the same loop in the background. Ctrl-C during a
//! foreground run leaves the campaign `pausada`.

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};

use painel_core::dispatch::DispatchProgress;
use painel_core::repository::campaign::CampaignFilter;
use painel_types::campaign::{
    Audience, Campaign, CampaignId, CampaignStatus, CreateCampaignRequest,
    CreateTemplateCampaignRequest, Recipient, SendStatus,
};

use super::{confirm_delete, or_dash, print_field, truncate};
use crate::state::AppState;

/// Campaign subcommands.
#[derive(Subcommand)]
pub enum CampaignCommand {
    /// Create a text or image campaign.
    Create {
        #[arg(long)]
        name: String,

        /// Message text (caption when --image-url is set).
        #[arg(long)]
        message: String,

        /// Recipients: leads or vendedores.
        #[arg(long, default_value = "leads")]
        audience: String,

        /// Public URL of an image to send with the message.
        #[arg(long)]
        image_url: Option<String>,
    },

    /// Create a campaign that sends an approved template.
    #[command(name = "create-template")]
    CreateTemplate {
        #[arg(long)]
        name: String,

        /// Registered template name.
        #[arg(long)]
        template: String,

        /// Recipients: leads or vendedores.
        #[arg(long, default_value = "leads")]
        audience: String,

        /// Public URL of the header image, for templates with an IMAGE header.
        #[arg(long)]
        header_image_url: Option<String>,

        /// Description stored with the campaign (defaults to the template name).
        #[arg(long)]
        message: Option<String>,
    },

    /// List campaigns, newest first.
    #[command(alias = "ls")]
    List {
        /// Filter by status (rascunho, processando, concluida, pausada).
        #[arg(long)]
        status: Option<String>,

        /// Substring over name and audience.
        #[arg(long, short)]
        search: Option<String>,

        #[arg(long)]
        limit: Option<i64>,
    },

    /// Show a campaign and its counters.
    Show {
        id: String,
    },

    /// List the per-recipient send records of a campaign.
    Sends {
        id: String,

        /// Only show failed sends.
        #[arg(long)]
        failed: bool,
    },

    /// Send a campaign to its audience now.
    Dispatch {
        id: String,

        /// Skip confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Move a campaign stuck in processando to pausada.
    Release {
        id: String,
    },

    /// Delete a campaign and its send records.
    #[command(alias = "rm")]
    Delete {
        id: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

/// Handle a campaign subcommand.
pub async fn handle_campaign_command(
    cmd: CampaignCommand,
    state: &AppState,
    json: bool,
) -> Result<()> {
    match cmd {
        CampaignCommand::Create {
            name,
            message,
            audience,
            image_url,
        } => {
            let request = CreateCampaignRequest {
                name,
                message,
                audience: parse_audience(&audience)?,
                image_url,
            };
            let campaign = state.campaign_service.create_campaign(request).await?;
            print_created(&campaign, json)
        }
        CampaignCommand::CreateTemplate {
            name,
            template,
            audience,
            header_image_url,
            message,
        } => {
            let request = CreateTemplateCampaignRequest {
                name,
                template_name: template,
                audience: parse_audience(&audience)?,
                header_image_url,
                message,
            };
            let campaign = state
                .campaign_service
                .create_template_campaign(request)
                .await?;
            print_created(&campaign, json)
        }
        CampaignCommand::List {
            status,
            search,
            limit,
        } => {
            let status = status
                .as_deref()
                .map(|s| s.parse::<CampaignStatus>().map_err(|e| anyhow::anyhow!(e)))
                .transpose()?;
            let filter = CampaignFilter {
                search,
                status,
                limit,
                offset: None,
            };
            list_campaigns(state, filter, json).await
        }
        CampaignCommand::Show { id } => show_campaign(state, &id, json).await,
        CampaignCommand::Sends { id, failed } => list_sends(state, &id, failed, json).await,
        CampaignCommand::Dispatch { id, yes } => dispatch_campaign(state, &id, yes, json).await,
        CampaignCommand::Release { id } => release_campaign(state, &id, json).await,
        CampaignCommand::Delete { id, force } => delete_campaign(state, &id, force, json).await,
    }
}

fn parse_audience(raw: &str) -> Result<Audience> {
    raw.parse::<Audience>().map_err(|e| anyhow::anyhow!(e))
}

fn parse_campaign_id(id: &str) -> Result<CampaignId> {
    id.parse::<CampaignId>()
        .map_err(|e| anyhow::anyhow!("invalid campaign id '{id}': {e}"))
}

fn status_cell(status: CampaignStatus) -> Cell {
    let color = match status {
        CampaignStatus::Draft => Color::Blue,
        CampaignStatus::Processing => Color::Yellow,
        CampaignStatus::Completed => Color::Green,
        CampaignStatus::Paused => Color::DarkGrey,
    };
    Cell::new(status.to_string()).fg(color)
}

fn kind_label(campaign: &Campaign) -> &'static str {
    match (&campaign.template_name, &campaign.image_url) {
        (Some(_), _) => "template",
        (None, Some(_)) => "image",
        (None, None) => "text",
    }
}

fn print_created(campaign: &Campaign, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(campaign)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Campaign '{}' created for {} {}",
        style("✓").green().bold(),
        style(&campaign.name).cyan(),
        style(campaign.total_targets).bold(),
        campaign.audience
    );
    println!(
        "  Send it with: {}",
        style(format!("painel campaign dispatch {}", campaign.id)).yellow()
    );
    println!();
    Ok(())
}

async fn list_campaigns(state: &AppState, filter: CampaignFilter, json: bool) -> Result<()> {
    let campaigns = state.campaign_service.list_campaigns(Some(filter)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&campaigns)?);
        return Ok(());
    }

    if campaigns.is_empty() {
        println!();
        println!(
            "  {} No campaigns found. Create one with: {}",
            style("i").blue().bold(),
            style("painel campaign create").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Kind").fg(Color::White),
        Cell::new("Audience").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Sent").fg(Color::White),
        Cell::new("Failed").fg(Color::White),
        Cell::new("Targets").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);

    for campaign in &campaigns {
        table.add_row(vec![
            Cell::new(truncate(&campaign.name, 32)).fg(Color::Cyan),
            Cell::new(kind_label(campaign)),
            Cell::new(campaign.audience.to_string()),
            status_cell(campaign.status),
            Cell::new(campaign.sent).fg(Color::Green),
            Cell::new(campaign.failed).fg(if campaign.failed > 0 {
                Color::Red
            } else {
                Color::DarkGrey
            }),
            Cell::new(campaign.total_targets),
            Cell::new(campaign.id.to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

async fn show_campaign(state: &AppState, id: &str, json: bool) -> Result<()> {
    let campaign = state
        .campaign_service
        .get_campaign(&parse_campaign_id(id)?)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&campaign)?);
        return Ok(());
    }

    println!();
    println!("  {}", style(&campaign.name).cyan().bold());
    println!();
    print_field("Kind", kind_label(&campaign));
    print_field("Audience", campaign.audience);
    print_field("Status", campaign.status);
    if let Some(template) = &campaign.template_name {
        print_field("Template", template);
    }
    print_field("Message", &campaign.message);
    print_field("Image", or_dash(campaign.image_url.as_deref()));
    print_field(
        "Progress",
        format!(
            "{} sent, {} failed of {}",
            style(campaign.sent).green(),
            style(campaign.failed).red(),
            campaign.total_targets
        ),
    );
    print_field("Created", campaign.created_at.format("%Y-%m-%d %H:%M"));
    print_field("Updated", campaign.updated_at.format("%Y-%m-%d %H:%M"));
    print_field("ID", style(campaign.id.to_string()).dim());
    println!();
    Ok(())
}

fn recipient_label(recipient: &Recipient) -> String {
    match recipient {
        Recipient::Lead(id) => format!("lead {id}"),
        Recipient::Vendor(id) => format!("vendor {id}"),
    }
}

async fn list_sends(state: &AppState, id: &str, only_failed: bool, json: bool) -> Result<()> {
    let mut sends = state
        .campaign_service
        .list_sends(&parse_campaign_id(id)?)
        .await?;
    if only_failed {
        sends.retain(|s| s.status == SendStatus::Failed);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&sends)?);
        return Ok(());
    }

    if sends.is_empty() {
        println!();
        println!("  {} No send records.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Recipient").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Sent At").fg(Color::White),
        Cell::new("Error").fg(Color::White),
    ]);

    for send in &sends {
        let status = match send.status {
            SendStatus::Pending => Cell::new("pendente").fg(Color::Yellow),
            SendStatus::Sent => Cell::new("enviado").fg(Color::Green),
            SendStatus::Failed => Cell::new("erro").fg(Color::Red),
        };
        let sent_at = send
            .sent_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(recipient_label(&send.recipient)),
            status,
            Cell::new(sent_at).fg(Color::DarkGrey),
            Cell::new(truncate(&or_dash(send.error_message.as_deref()), 48)),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

async fn dispatch_campaign(state: &AppState, id: &str, yes: bool, json: bool) -> Result<()> {
    let id = parse_campaign_id(id)?;
    let campaign = state.campaign_service.check_dispatchable(&id).await?;

    if !yes && !json {
        let delay = state.campaign_service.settings().delay;
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Send '{}' to every {} ({} waiting {}ms between messages)?",
                campaign.name,
                campaign.audience,
                campaign.total_targets,
                delay.as_millis()
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("  {}", style("Cancelled.").dim());
            return Ok(());
        }
    }

    let bar = if json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(campaign.total_targets.max(0) as u64)
    };
    bar.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );

    let on_progress = |progress: DispatchProgress| {
        bar.set_length(progress.total as u64);
        bar.set_position(progress.processed as u64);
        bar.set_message(format!("{} sent, {} failed", progress.sent, progress.failed));
    };
    let claimed = state.campaign_service.start_dispatch(&id).await?;
    let outcome = tokio::select! {
        result = state.campaign_service.dispatch_claimed(&claimed, &on_progress) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };
    bar.finish_and_clear();

    let Some(result) = outcome else {
        let released = state.campaign_service.release_campaign(&id).await?;
        anyhow::bail!(
            "dispatch interrupted; campaign '{}' is now {} (sends so far are recorded)",
            released.name,
            released.status
        );
    };
    let summary = result?;

    if json {
        let result = serde_json::json!({
            "id": id,
            "sent": summary.sent,
            "failed": summary.failed,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Campaign '{}' finished: {} sent, {} failed",
        style("✓").green().bold(),
        style(&campaign.name).cyan(),
        style(summary.sent).green().bold(),
        if summary.failed > 0 {
            style(summary.failed).red().bold()
        } else {
            style(summary.failed).dim()
        }
    );
    if summary.failed > 0 {
        println!(
            "  Inspect failures with: {}",
            style(format!("painel campaign sends {id} --failed")).yellow()
        );
    }
    println!();
    Ok(())
}

async fn release_campaign(state: &AppState, id: &str, json: bool) -> Result<()> {
    let campaign = state
        .campaign_service
        .release_campaign(&parse_campaign_id(id)?)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&campaign)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Campaign '{}' is now {}",
        style("✓").green().bold(),
        style(&campaign.name).cyan(),
        style(campaign.status).yellow()
    );
    println!(
        "  Resume with: {}",
        style(format!("painel campaign dispatch {}", campaign.id)).yellow()
    );
    println!();
    Ok(())
}

async fn delete_campaign(state: &AppState, id: &str, force: bool, json: bool) -> Result<()> {
    let id = parse_campaign_id(id)?;
    let campaign = state.campaign_service.get_campaign(&id).await?;

    if !confirm_delete(&format!("campaign '{}'", campaign.name), force || json)? {
        return Ok(());
    }
    state.campaign_service.delete_campaign(&id).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({"deleted": true, "id": id}))?
        );
    } else {
        println!();
        println!(
            "  {} Campaign '{}' deleted",
            style("✓").green().bold(),
            style(&campaign.name).cyan()
        );
        println!();
    }
    Ok(())
}
