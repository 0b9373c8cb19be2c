//! lineup-api - Livestock Lineup server
//!
//! Stores exhibitor submissions, serves reference data and organizer lineups,
//! and pushes breed calls to connected exhibitors.

use anyhow::{Context, Result};
use clap::Parser;
use lineup_api::{build_router, AppState};
use lineup_common::config::{RootFolderInitializer, RootFolderResolver, TomlConfig};
use lineup_common::db::{init_database, init_database_url};
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info, warn};

/// Command-line arguments for lineup-api
#[derive(Parser, Debug)]
#[command(name = "lineup-api")]
#[command(about = "Livestock Lineup submission and lineup server")]
#[command(version)]
struct Args {
    /// HTTP server port
    #[arg(short, long, default_value = "3000", env = "LINEUP_PORT")]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", env = "LINEUP_BIND")]
    bind: String,

    /// Root folder holding lineup.db
    #[arg(short, long, env = "LINEUP_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// SQLite URL; overrides the root folder
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Config file (default: ~/.config/lineup/config.toml)
    #[arg(short, long, env = "LINEUP_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification before any database work
    info!(
        "Starting Livestock Lineup server (lineup-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let pool = match args.database_url.as_deref() {
        Some(url) => {
            info!("Database URL: {}", url);
            init_database_url(url)
                .await
                .with_context(|| format!("Failed to open database {}", url))?
        }
        None => {
            let toml = TomlConfig::load_or_default(args.config.as_deref());
            let root_folder = RootFolderResolver::new("lineup-api")
                .with_cli_arg(args.root_folder.clone())
                .with_toml(toml)
                .resolve();

            let initializer = RootFolderInitializer::new(root_folder);
            initializer
                .ensure_directory_exists()
                .context("Failed to create root folder")?;

            let db_path = initializer.database_path();
            info!("Database path: {}", db_path.display());
            init_database(&db_path)
                .await
                .with_context(|| format!("Failed to open database {}", db_path.display()))?
        }
    };
    info!("✓ Database ready");

    let app = build_router(AppState::new(pool));

    let addr = format!("{}:{}", args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("lineup-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
