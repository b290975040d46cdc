//! af-search - Album search proxy
//!
//! Accepts `GET /api/album?q=<text>`, authenticates to the Spotify catalog
//! with client credentials, and returns the top album match with its
//! artist, year, cover and track list.
//!
//! Configuration priority: CLI flag → environment → TOML file → default.

use std::path::PathBuf;

use af_common::config::{ConfigOverrides, ConfigSource, ServiceConfig};
use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};

use af_search::{build_router, AppState};

/// Command-line arguments for af-search
#[derive(Parser)]
#[command(name = "af-search")]
#[command(about = "Album search proxy for the Spotify catalog")]
#[command(version)]
struct Args {
    /// TOML config file (default: <config dir>/album-finder/config.toml)
    #[arg(short, long, env = "AF_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long, env = "AF_BIND")]
    bind: Option<String>,

    /// Spotify client ID
    #[arg(long, env = "SPOTIFY_CLIENT_ID", hide_env_values = true)]
    client_id: Option<String>,

    /// Spotify client secret
    #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// Identity endpoint for the token exchange
    #[arg(long, env = "AF_TOKEN_URL")]
    token_url: Option<String>,

    /// Catalog API base URL
    #[arg(long, env = "AF_API_BASE_URL")]
    api_base_url: Option<String>,

    /// Outbound HTTP timeout in seconds
    #[arg(long, env = "AF_HTTP_TIMEOUT_SECS")]
    http_timeout_secs: Option<u64>,

    /// Log level when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind: self.bind.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            token_url: self.token_url.clone(),
            api_base_url: self.api_base_url.clone(),
            http_timeout_secs: self.http_timeout_secs,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ServiceConfig::load(args.overrides(), args.config.as_deref())
        .context("Failed to load configuration")?;

    af_common::logging::init(&config.log_level).context("Failed to initialize logging")?;

    // Build identification first, before anything that can stall
    info!(
        "Starting Album Finder search proxy (af-search) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    log_config_source(&config.source);

    if !config.credentials.is_complete() {
        warn!(
            "SPOTIFY_CLIENT_ID / SPOTIFY_CLIENT_SECRET not set; searches will fail with a token error"
        );
    }
    info!("Identity endpoint: {}", config.endpoints.token_url);
    info!("Catalog API: {}", config.endpoints.api_base_url);

    let state = AppState::from_config(&config).context("Failed to initialize search service")?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;
    info!("af-search listening on http://{}", config.bind);
    info!("Health check: http://{}/health", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
/// Report where the TOML tier came from, once the subscriber is installed
fn log_config_source(source: &ConfigSource) {
    match source {
        ConfigSource::File(path) => info!("Loaded config file {}", path.display()),
        ConfigSource::NotFound(path) => warn!(
            "No config file at {}; using command line, environment and defaults",
            path.display()
        ),
        ConfigSource::NoConfigDir => {
            warn!("No platform config directory; using command line, environment and defaults")
        }
        ConfigSource::Inline => {}
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
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
