pub mod api;
pub mod app;
pub mod cache;
pub mod card;
pub mod cli;
pub mod config;
pub mod delete;
pub mod event;
pub mod session;
pub mod toast;
pub mod ui;

use app::App;
use clap::Parser;
use cli::{Cli, CliCommand};
use config::load_config;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Initialize tracing (logs to stderr if RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        // No subcommand or explicit `tui` → launch the interactive TUI.
        None | Some(CliCommand::Tui) => run_tui().await,
        // All other subcommands → non-interactive JSONL output.
        Some(cmd) => cli::run_command(cmd).await,
    }
}

/// Launch the interactive TUI.
async fn run_tui() -> color_eyre::Result<()> {
    let config = load_config();

    // A missing session is fine: the feed is still readable anonymously.
    let viewer = match session::load_session() {
        Ok(viewer) => viewer,
        Err(e) => {
            tracing::warn!("session setup failed: {e}");
            None
        }
    };
    match viewer {
        Some(ref v) => tracing::info!(user_id = %v.user_id, "viewer session loaded"),
        None => tracing::info!("no viewer session; browsing anonymously"),
    }

    let client = match cli::build_client(&config, viewer.as_ref()) {
        Ok(client) => {
            tracing::info!(base_url = %client.base_url(), "feed client initialized");
            Some(client)
        }
        Err(e) => {
            tracing::warn!("feed client setup failed: {e}");
            eprintln!("Warning: {e}. Running without API access.");
            None
        }
    };

    let terminal = ratatui::init();
    let result = App::new(config, client, viewer).run(terminal).await;
    ratatui::restore();
    result
}
