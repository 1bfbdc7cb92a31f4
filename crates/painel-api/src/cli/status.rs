//! Dashboard overview command.

use anyhow::Result;
use console::style;

use painel_core::messaging::provider::MessagingProvider;
use painel_infra::whatsapp::client::{PHONE_ID_ENV, TOKEN_ENV, WABA_ID_ENV};
use painel_types::stats::{DashboardStats, DateRange};

use crate::state::AppState;

/// Display the dashboard overview.
///
/// Shows record counts, conversation statistics, today's hourly activity and
/// whether WhatsApp credentials are configured.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let stats = state.dashboard_service.stats(&DateRange::default()).await?;
    let vendors = state.vendor_service.count_vendors().await?;
    let products = state.product_service.list_products(Default::default()).await?.len();
    let campaigns = state.campaign_service.list_campaigns(None).await?.len();
    let can_send = state.messaging.can_send();
    let can_manage_templates = state.messaging.can_manage_templates();

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "leads": stats.total_leads,
            "vendors": vendors,
            "products": products,
            "campaigns": campaigns,
            "stats": stats,
            "messaging": {
                "provider": state.messaging.name(),
                "can_send": can_send,
                "can_manage_templates": can_manage_templates,
            },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Painel v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Records ──").dim());
    println!("  Leads:     {}", style(stats.total_leads).bold());
    println!("  Vendors:   {}", style(vendors).bold());
    println!("  Products:  {}", style(products).bold());
    println!("  Campaigns: {}", style(campaigns).bold());
    println!();

    println!("  {}", style("── Conversations ──").dim());
    println!("  Total:          {}", style(stats.total_conversations).bold());
    println!(
        "  Bot resolution: {}",
        style(format!("{:.1}%", stats.bot_resolution_rate)).green()
    );
    println!("  Avg duration:   {}", stats.average_duration);
    println!();

    println!("  {}", style("── Today ──").dim());
    print_histogram(&stats);
    println!();

    println!("  {}", style("── WhatsApp ──").dim());
    println!("  Send messages:    {}", check_mark(can_send));
    println!("  Manage templates: {}", check_mark(can_manage_templates));
    if !can_send || !can_manage_templates {
        println!(
            "  {}",
            style(format!("Set {TOKEN_ENV}, {PHONE_ID_ENV} and {WABA_ID_ENV}")).yellow()
        );
    }
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!("  Database: {}", style("SQLite (WAL mode)").dim());
    println!();

    Ok(())
}

fn check_mark(ok: bool) -> console::StyledObject<&'static str> {
    if ok {
        style("✓ configured").green()
    } else {
        style("✗ missing").red()
    }
}

/// One line per hour that saw conversations, with a proportional bar.
fn print_histogram(stats: &DashboardStats) {
    let peak = stats
        .conversations_by_hour
        .iter()
        .map(|b| b.count)
        .max()
        .unwrap_or(0);
    if peak == 0 {
        println!("  {}", style("No conversations yet today").dim());
        return;
    }
    for bucket in stats.conversations_by_hour.iter().filter(|b| b.count > 0) {
        let width = (bucket.count * 30 / peak).max(1) as usize;
        println!(
            "  {:>5} {} {}",
            bucket.hour,
            style("█".repeat(width)).cyan(),
            bucket.count
        );
    }
}
