//! TodoAgent - natural-language todo manager
//!
//! CLI entry point for the HTTP server.

use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{info, warn};

use todoagent::agent::TodoAgent;
use todoagent::cli::{Cli, Command};
use todoagent::config::Config;
use todoagent::llm::create_client;
use todoagent::server::{AppState, build_router};
use todostore::TodoStore;

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "TodoAgent loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command {
        Some(Command::Serve { host, port }) => cmd_serve(&config, host, port).await,
        Some(Command::InitDb) => cmd_init_db(&config),
        None => cmd_serve(&config, None, None).await,
    }
}

/// Open the store and ensure the tables exist
fn open_store(config: &Config) -> Result<TodoStore> {
    if let Some(parent) = config.storage.db_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }

    let store = TodoStore::open(&config.storage.db_path).context("Failed to open store")?;
    store.create_tables().context("Failed to create tables")?;
    Ok(store)
}

/// Create the database tables and exit
fn cmd_init_db(config: &Config) -> Result<()> {
    open_store(config)?;
    println!("Initialized database: {}", config.storage.db_path.display());
    Ok(())
}

/// Run the HTTP server
async fn cmd_serve(config: &Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let store = open_store(config)?;
    info!("Store ready at {}", config.storage.db_path.display());

    // Missing credential degrades to canned responses instead of refusing
    // to start; the store-backed endpoints keep working.
    let agent = match create_client(&config.llm) {
        Ok(llm) => {
            info!("LLM client initialized (model: {})", config.llm.model);
            TodoAgent::new(llm, store, config.llm.clone())
        }
        Err(e) => {
            warn!(error = %e, "LLM client unavailable; serving degraded responses");
            TodoAgent::degraded(store, config.llm.clone())
        }
    };

    let state = Arc::new(AppState { agent });
    let app = build_router(state);

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {addr}"))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
