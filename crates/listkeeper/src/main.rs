//! listkeeper: Telegram list-keeping bot
//!
//! Main entry point.
//!
//! Usage:
//!   listkeeper           - Start the bot
//!   listkeeper --help    - Show help

use std::sync::Arc;

use listkeeper_core::{Config, ListStore};
use listkeeper_telegram::ListBot;
use tracing_subscriber::EnvFilter;

/// Run mode
enum RunMode {
    /// Start the bot
    Run,
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match parse_args() {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("listkeeper {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Run => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    // Startup failures are fatal: a bot that cannot authenticate or
    // persist state has no recovery path.
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting listkeeper...");
    tracing::info!("Database: {}", config.db_path);

    let store = ListStore::new(&config.db_path)
        .map_err(|e| anyhow::anyhow!("Failed to open list store: {}", e))?;

    let bot = ListBot::new(&config.telegram_token, Arc::new(store));
    bot.start()
        .await
        .map_err(|e| anyhow::anyhow!("Telegram bot error: {}", e))?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    let args: Vec<String> = std::env::args().collect();

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Run
}

/// Print help message
fn print_help() {
    println!("listkeeper - Telegram list-keeping bot");
    println!();
    println!("Usage:");
    println!("  listkeeper           Start the bot");
    println!("  listkeeper --help    Show this help message");
    println!("  listkeeper --version Show version");
    println!();
    println!("Environment Variables:");
    println!("  TELEGRAM_BOT_TOKEN   Telegram bot token (required)");
    println!("  DATABASE_PATH        SQLite database path (default: listkeeper.db)");
    println!("  RUST_LOG             Log filter (default: info)");
}
