//! moodring-web - playlist mood description service
//!
//! Serves the input form, asks Spotify for the genres of a playlist's
//! artists, and answers with a few mood words for the dominant genre
//! families.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use moodring_common::config::{
    load_toml_config, locate_config_file, CliOverrides, MoodringConfig, TomlConfig,
};
use moodring_common::Taxonomy;
use moodring_web::spotify::SpotifyClient;
use moodring_web::{build_router, AppState};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for moodring-web
///
/// Every option can also be set through its environment variable or the
/// TOML config file; the command line wins.
#[derive(Parser, Debug)]
#[command(name = "moodring-web")]
#[command(about = "Describe the mood of a Spotify playlist")]
#[command(version)]
struct Args {
    /// TOML config file (default: <config dir>/moodring/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(short, long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Descriptors per mood description
    #[arg(long)]
    max_results: Option<usize>,

    /// Timeout for each Spotify request, in seconds
    #[arg(long)]
    request_timeout_secs: Option<u64>,

    /// Taxonomy TOML file replacing the built-in table
    #[arg(long)]
    taxonomy: Option<PathBuf>,

    /// Spotify client id
    #[arg(long)]
    client_id: Option<String>,

    /// Spotify client secret
    #[arg(long)]
    client_secret: Option<String>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            bind_address: self.bind.clone(),
            port: self.port,
            max_results: self.max_results,
            request_timeout_secs: self.request_timeout_secs,
            taxonomy_path: self.taxonomy.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // The config file chooses the default log level, so read it before tracing starts
    let config_path = locate_config_file(args.config.as_deref())?;
    let toml_config = match &config_path {
        Some(path) => load_toml_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TomlConfig::default(),
    };

    let default_level = toml_config.log_level();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{default_level},tower_http=info").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting moodring-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("MOODRING_GIT_HASH"),
        env!("MOODRING_BUILD_TIMESTAMP"),
        env!("MOODRING_BUILD_PROFILE")
    );

    match &config_path {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config file found, using environment and compiled defaults"),
    }

    let config = MoodringConfig::resolve(&args.overrides(), &toml_config)
        .context("Failed to resolve configuration")?;

    // Fail fast on a broken taxonomy rather than on the first request
    let taxonomy = Taxonomy::load(config.taxonomy_path.as_deref())
        .context("Failed to load genre taxonomy")?;
    info!(
        "Taxonomy ready: {} meta-genres ({})",
        taxonomy.len(),
        config
            .taxonomy_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".to_string())
    );

    let spotify = SpotifyClient::new(config.spotify.clone(), config.request_timeout)
        .context("Failed to build Spotify client")?;

    let state = AppState::new(taxonomy, Arc::new(spotify), config.max_results);
    let app = build_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("moodring-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
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
