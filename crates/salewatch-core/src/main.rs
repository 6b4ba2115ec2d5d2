//! Salewatch server
//!
//! Binary entry point: loads configuration from the environment, starts
//! the revenue poller when credentials allow it, and serves the HTTP API.

use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};

use salewatch::api::{create_router, AppState};
use salewatch::monitor::{MonitorState, Poller, RevenueSource};
use salewatch::notify::WebhookNotifier;
use salewatch::Config;

/// Salewatch - group sales and revenue monitor
#[derive(Parser)]
#[command(name = "salewatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let mut config = Config::from_env();
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let notifier = Arc::new(WebhookNotifier::new(config.notify.webhook_url.clone()));
    let monitor = Arc::new(RwLock::new(MonitorState::new()));

    // Start polling only when the group is configured, polling is enabled,
    // and a usable credential selects a source.
    if config.upstream.group_id.is_some() && config.poll.enabled {
        if let Some(source) = RevenueSource::from_config(&config.upstream) {
            info!("Method: {}", source.describe());
            let poller = Poller::new(
                source,
                monitor.clone(),
                notifier.clone(),
                Duration::from_secs(config.poll.interval_secs),
            );
            tokio::spawn(poller.run());
        }
    }

    if !notifier.is_configured() {
        warn!("Discord webhook not configured - notifications will be dropped");
    }

    let state = AppState {
        notifier,
        monitor,
        started_at: chrono::Utc::now(),
        group_id: config.upstream.group_id.clone(),
    };

    let app = create_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Roblox Group Sales Monitor");
    info!("Server: http://{addr}");
    info!(
        "Group ID: {}",
        config.upstream.group_id.as_deref().unwrap_or("Not configured")
    );
    info!(
        webhook = config.notify.webhook_url.is_some(),
        session_cookie = config.upstream.cookie.is_some(),
        api_key = config.upstream.api_key.is_some(),
        "Credential status"
    );

    axum::serve(listener, app).await?;

    Ok(())
}
