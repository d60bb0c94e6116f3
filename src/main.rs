//! todo-tree
//!
//! HTTP backend for hierarchical to-do lists, plus a few maintenance commands.

use anyhow::{Result, bail};
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Arc;
use todo_tree::api;
use todo_tree::cli::{Cli, Command};
use todo_tree::config::{Config, ConfigLoader};
use todo_tree::db::Database;
use todo_tree::format::{OutputFormat, format_board};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// `RUST_LOG` when set, otherwise the level chosen by `--verbose`.
fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(level))
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(level))
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(level))
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    // SAFETY: still single-threaded here; the tokio runtime is built below.
    if let Some(config_path) = &cli.config {
        unsafe {
            std::env::set_var("TODO_TREE_CONFIG_PATH", config_path);
        }
    }
    let mut loader = ConfigLoader::load()?;
    if let Some(path) = loader.config_path() {
        info!(path = %path.display(), "Using config file");
    }

    // Override from CLI arguments
    let config = loader.config_mut();
    if let Some(db_path) = &cli.database {
        config.server.db_path = db_path.into();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    let config = loader.into_config();

    match cli.command {
        Some(Command::Tree { user, format }) => run_tree(&config, user, format),
        Some(Command::Reset { yes }) => run_reset(&config, yes),
        Some(Command::Serve) | None => tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?
            .block_on(run_server(config)),
    }
}

async fn run_server(config: Config) -> Result<()> {
    let db = Arc::new(Database::open(&config.server.db_path)?);
    let purged = db.purge_expired_sessions()?;
    info!(purged, "Startup session cleanup");

    let handle = api::start_server(db, &config.server, config.session.clone()).await?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    handle.shutdown().await;
    Ok(())
}

fn run_tree(config: &Config, user_id: i64, format: OutputFormat) -> Result<()> {
    let db = Database::open(&config.server.db_path)?;
    let board = db.get_board(user_id)?;
    print!("{}", format_board(&board, format)?);
    Ok(())
}

fn run_reset(config: &Config, yes: bool) -> Result<()> {
    if !yes {
        bail!(
            "refusing to clear {} without --yes",
            config.server.db_path.display()
        );
    }
    let db = Database::open(&config.server.db_path)?;
    db.reset()?;
    println!("Database content cleared successfully");
    Ok(())
}
