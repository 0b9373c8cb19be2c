//! lineup-notify - tells an exhibitor when their breed is called
//!
//! Polls the lineup server for matching submissions and listens on its push
//! channel; both report through one dispatcher so each call alerts once.

use anyhow::{Context, Result};
use clap::Parser;
use lineup_common::config::TomlConfig;
use lineup_common::notify::NotificationDispatcher;
use lineup_notify::{CliOverrides, LineupClient, NotifyConfig, Poller, PushListener, TerminalAlert};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Command-line arguments for lineup-notify
#[derive(Parser, Debug)]
#[command(name = "lineup-notify")]
#[command(about = "Breed call notifier for Livestock Lineup exhibitors")]
#[command(version)]
struct Args {
    /// Base URL of the lineup server
    #[arg(short, long, env = "LINEUP_SERVER_URL")]
    server_url: Option<String>,

    /// Seconds between polls
    #[arg(short, long, env = "LINEUP_POLL_INTERVAL")]
    interval: Option<u64>,

    /// Only alert for this exhibitor's submissions
    #[arg(short, long, env = "LINEUP_EXHIBITOR_ID")]
    exhibitor: Option<String>,

    /// Config file (default: ~/.config/lineup/config.toml)
    #[arg(short, long, env = "LINEUP_CONFIG")]
    config: Option<PathBuf>,

    /// Disable the push channel and rely on polling alone
    #[arg(long)]
    no_push: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Livestock Lineup notifier (lineup-notify) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let toml = TomlConfig::load_or_default(args.config.as_deref());
    let config = NotifyConfig::resolve(
        CliOverrides {
            server_url: args.server_url,
            poll_interval_secs: args.interval,
            exhibitor_id: args.exhibitor,
        },
        toml,
    );

    info!("Server: {}", config.server_url);
    match &config.matcher.exhibitor_filter {
        Some(id) => info!("Watching exhibitor {}", id),
        None => info!("Watching all exhibitors"),
    }
    for rule in &config.matcher.rules {
        info!("Rule: {} / {} / {}", rule.breed, rule.category, rule.show);
    }

    let client = LineupClient::new(config.server_url.clone()).context("Failed to build HTTP client")?;
    let dispatcher = Arc::new(NotificationDispatcher::new(Arc::new(TerminalAlert::stdout())));

    let poller = Arc::new(Poller::new(
        Arc::new(client.clone()),
        Arc::clone(&dispatcher),
        config.matcher.clone(),
        config.poll_interval,
    ));
    let poll_task = poller.spawn();

    let push_task = if args.no_push {
        info!("Push channel disabled");
        None
    } else {
        let listener = Arc::new(PushListener::new(
            client,
            Arc::clone(&dispatcher),
            config.matcher.exhibitor_filter.clone(),
            config.poll_interval,
        ));
        Some(listener.spawn())
    };

    tokio::signal::ctrl_c()
        .await
        .context("Failed to install Ctrl+C handler")?;
    info!("Received Ctrl+C, shutting down");

    poll_task.abort();
    if let Some(task) = push_task {
        task.abort();
    }

    Ok(())
}
