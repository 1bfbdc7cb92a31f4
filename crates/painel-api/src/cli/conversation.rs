//! Conversation-history CLI subcommands.

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use painel_types::chat::{MessageKind, SessionStatus, SessionSummary};

use super::{or_dash, print_field, truncate};
use crate::state::AppState;

/// Conversation subcommands.
#[derive(Subcommand)]
pub enum ConversationCommand {
    /// List chat sessions, most recent first.
    #[command(alias = "ls")]
    List {
        /// Show at most this many sessions.
        #[arg(long, default_value = "50")]
        limit: usize,

        /// Only sessions with this status (active, transferred, resolved).
        #[arg(long)]
        status: Option<String>,
    },

    /// Show the transcript of a session.
    Show {
        /// Session id (the customer's WhatsApp JID).
        session_id: String,
    },
}

/// Handle a conversation subcommand.
pub async fn handle_conversation_command(
    cmd: ConversationCommand,
    state: &AppState,
    json: bool,
) -> Result<()> {
    match cmd {
        ConversationCommand::List { limit, status } => {
            list_sessions(state, limit, status.as_deref(), json).await
        }
        ConversationCommand::Show { session_id } => show_session(state, &session_id, json).await,
    }
}

fn status_cell(status: SessionStatus) -> Cell {
    let color = match status {
        SessionStatus::Active => Color::Blue,
        SessionStatus::Transferred => Color::Yellow,
        SessionStatus::Resolved => Color::Green,
    };
    Cell::new(status.to_string()).fg(color)
}

fn who(session: &SessionSummary) -> String {
    match &session.lead_name {
        Some(name) => format!("{name} ({})", session.phone),
        None => session.phone.clone(),
    }
}

async fn list_sessions(
    state: &AppState,
    limit: usize,
    status: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut sessions = state.conversation_service.list_sessions().await?;
    if let Some(wanted) = status {
        sessions.retain(|s| s.status.to_string().eq_ignore_ascii_case(wanted));
    }
    sessions.truncate(limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!();
        println!("  {} No conversations recorded.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Contact").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
        Cell::new("Last Message").fg(Color::White),
        Cell::new("Last Customer Message").fg(Color::White),
        Cell::new("Session").fg(Color::White),
    ]);

    for session in &sessions {
        table.add_row(vec![
            Cell::new(who(session)).fg(Color::Cyan),
            status_cell(session.status),
            Cell::new(session.message_count),
            Cell::new(session.last_message_at.format("%Y-%m-%d %H:%M").to_string())
                .fg(Color::DarkGrey),
            Cell::new(truncate(&session.last_human_message, 40)),
            Cell::new(&session.session_id).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} session{}",
        style(sessions.len()).bold(),
        if sessions.len() == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}

async fn show_session(state: &AppState, session_id: &str, json: bool) -> Result<()> {
    let detail = state.conversation_service.get_session(session_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    let summary = &detail.summary;
    println!();
    println!("  {}", style(who(summary)).cyan().bold());
    println!();
    print_field("Lead", or_dash(summary.lead_name.as_deref()));
    print_field("Status", summary.status);
    print_field("Messages", summary.message_count);
    print_field(
        "Span",
        format!(
            "{} → {}",
            summary.first_message_at.format("%Y-%m-%d %H:%M"),
            summary.last_message_at.format("%Y-%m-%d %H:%M")
        ),
    );
    println!();

    for message in &detail.messages {
        let time = message.created_at.format("%H:%M");
        match message.kind {
            MessageKind::Human => println!(
                "  {} {} {}",
                style(time).dim(),
                style("cliente ›").green().bold(),
                message.content
            ),
            MessageKind::Ai => println!(
                "  {} {} {}",
                style(time).dim(),
                style("bot     ›").cyan().bold(),
                message.content
            ),
            MessageKind::Other => println!(
                "  {} {} {}",
                style(time).dim(),
                style("sistema ›").dim(),
                style(&message.content).dim()
            ),
        }
    }
    println!();
    Ok(())
}
