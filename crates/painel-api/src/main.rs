//! Painel CLI and REST API entry point.
//!
//! Binary name: `painel`
//!
//! Parses CLI arguments, initializes database and services, then dispatches
//! to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity; RUST_LOG overrides.
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,painel=debug",
        _ => "trace",
    };
    painel_observe::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "painel", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    let result = run(cli.command, state, cli.json).await;
    painel_observe::shutdown_tracing();
    result
}

async fn run(command: Commands, state: AppState, json: bool) -> anyhow::Result<()> {
    match command {
        Commands::Lead { action } => cli::lead::handle_lead_command(action, &state, json).await?,
        Commands::Vendor { action } => {
            cli::vendor::handle_vendor_command(action, &state, json).await?
        }
        Commands::Product { action } => {
            cli::product::handle_product_command(action, &state, json).await?
        }
        Commands::Campaign { action } => {
            cli::campaign::handle_campaign_command(action, &state, json).await?
        }
        Commands::Template { action } => {
            cli::template::handle_template_command(action, &state, json).await?
        }
        Commands::Conversation { action } => {
            cli::conversation::handle_conversation_command(action, &state, json).await?
        }

        Commands::Status => {
            cli::status::status(&state, json).await?;
        }

        Commands::Serve { port, host } => {
            // Ensure an API key exists, print it if new
            if let Some(api_key) = http::extractors::auth::ensure_api_key(&state).await? {
                println!();
                println!(
                    "  {} API key generated (save this -- it won't be shown again):",
                    console::style("🔑").bold()
                );
                println!();
                println!("  {}", console::style(&api_key).yellow().bold());
                println!();
            }

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Painel API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());
            tracing::info!(%addr, "api server started");

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
