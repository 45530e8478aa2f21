//! Configuration loading and resolution
//!
//! Every setting is resolved in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Spotify credentials have no compiled default; if no tier supplies them
//! resolution fails so the service never starts half-configured.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub const ENV_CONFIG: &str = "MOODRING_CONFIG";
pub const ENV_BIND: &str = "MOODRING_BIND";
pub const ENV_PORT: &str = "MOODRING_PORT";
pub const ENV_MAX_RESULTS: &str = "MOODRING_MAX_RESULTS";
pub const ENV_REQUEST_TIMEOUT: &str = "MOODRING_REQUEST_TIMEOUT_SECS";
pub const ENV_TAXONOMY: &str = "MOODRING_TAXONOMY";
pub const ENV_CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Compiled defaults used when no other tier provides a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub bind_address: String,
    pub port: u16,
    pub max_results: usize,
    pub request_timeout_secs: u64,
    pub spotify_api_base: String,
    pub spotify_accounts_base: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 5780,
            max_results: crate::selector::DEFAULT_MAX_RESULTS,
            request_timeout_secs: 10,
            spotify_api_base: "https://api.spotify.com/v1".to_string(),
            spotify_accounts_base: "https://accounts.spotify.com".to_string(),
        }
    }
}

/// TOML config file contents; every field optional
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TomlConfig {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub max_results: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub taxonomy_path: Option<PathBuf>,
    pub spotify: SpotifyToml,
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Default tracing filter level, used when RUST_LOG is unset
    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SpotifyToml {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub api_base: Option<String>,
    pub accounts_base: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub max_results: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub taxonomy_path: Option<PathBuf>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

/// Spotify Web API settings
#[derive(Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub api_base: String,
    pub accounts_base: String,
}

impl fmt::Debug for SpotifyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("accounts_base", &self.accounts_base)
            .finish()
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct MoodringConfig {
    pub bind_address: String,
    pub port: u16,
    pub max_results: usize,
    pub request_timeout: Duration,
    /// `None` selects the built-in taxonomy
    pub taxonomy_path: Option<PathBuf>,
    pub log_level: String,
    pub spotify: SpotifyConfig,
}

impl MoodringConfig {
    /// Resolve every setting from CLI, environment, TOML and compiled defaults
    pub fn resolve(cli: &CliOverrides, toml: &TomlConfig) -> Result<Self> {
        let defaults = CompiledDefaults::default();

        let bind_address = cli
            .bind_address
            .clone()
            .or_else(|| env_string(ENV_BIND))
            .or_else(|| toml.bind_address.clone())
            .unwrap_or(defaults.bind_address);

        let port = match cli.port {
            Some(port) => port,
            None => env_parsed(ENV_PORT)?
                .or(toml.port)
                .unwrap_or(defaults.port),
        };

        let max_results = match cli.max_results {
            Some(max) => max,
            None => env_parsed(ENV_MAX_RESULTS)?
                .or(toml.max_results)
                .unwrap_or(defaults.max_results),
        };

        let timeout_secs = match cli.request_timeout_secs {
            Some(secs) => secs,
            None => env_parsed(ENV_REQUEST_TIMEOUT)?
                .or(toml.request_timeout_secs)
                .unwrap_or(defaults.request_timeout_secs),
        };
        if timeout_secs == 0 {
            return Err(Error::Config(
                "request timeout must be at least 1 second".to_string(),
            ));
        }

        let taxonomy_path = cli
            .taxonomy_path
            .clone()
            .or_else(|| env_string(ENV_TAXONOMY).map(PathBuf::from))
            .or_else(|| toml.taxonomy_path.clone());

        let log_level = toml.log_level().to_string();

        let client_id = resolve_credential(
            "client id",
            cli.client_id.as_deref(),
            ENV_CLIENT_ID,
            toml.spotify.client_id.as_deref(),
        )?;
        let client_secret = resolve_credential(
            "client secret",
            cli.client_secret.as_deref(),
            ENV_CLIENT_SECRET,
            toml.spotify.client_secret.as_deref(),
        )?;

        Ok(Self {
            bind_address,
            port,
            max_results,
            request_timeout: Duration::from_secs(timeout_secs),
            taxonomy_path,
            log_level,
            spotify: SpotifyConfig {
                client_id,
                client_secret,
                api_base: toml
                    .spotify
                    .api_base
                    .clone()
                    .unwrap_or(defaults.spotify_api_base),
                accounts_base: toml
                    .spotify
                    .accounts_base
                    .clone()
                    .unwrap_or(defaults.spotify_accounts_base),
            },
        })
    }

    /// Socket address string for the HTTP listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Validate a credential value (non-empty, non-whitespace)
pub fn is_valid_credential(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Resolve one Spotify credential: CLI → ENV → TOML
fn resolve_credential(
    label: &str,
    cli: Option<&str>,
    env_name: &str,
    toml: Option<&str>,
) -> Result<String> {
    let env_value = std::env::var(env_name).ok();

    let candidates = [
        ("command line", cli),
        ("environment", env_value.as_deref()),
        ("TOML", toml),
    ];
    let valid: Vec<(&str, &str)> = candidates
        .iter()
        .filter_map(|(source, value)| value.filter(|v| is_valid_credential(v)).map(|v| (*source, v)))
        .collect();

    if valid.len() > 1 {
        let sources: Vec<&str> = valid.iter().map(|(source, _)| *source).collect();
        warn!(
            "Spotify {} found in multiple sources: {}. Using {} (highest priority).",
            label,
            sources.join(", "),
            sources[0]
        );
    }

    match valid.first() {
        Some((source, value)) => {
            info!("Spotify {} loaded from {}", label, source);
            Ok(value.trim().to_string())
        }
        None => Err(Error::Config(format!(
            "Spotify {label} not configured. Please configure using one of:\n\
             1. Command line: --client-id / --client-secret\n\
             2. Environment: {ENV_CLIENT_ID} / {ENV_CLIENT_SECRET}\n\
             3. TOML config: [spotify] client_id / client_secret\n\
             \n\
             Create credentials at: https://developer.spotify.com/dashboard"
        ))),
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env_string(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} has invalid value '{}'", name, raw))),
        None => Ok(None),
    }
}

/// Locate the TOML config file
///
/// An explicit path (CLI or `MOODRING_CONFIG`) must exist. Otherwise the
/// per-user `<config_dir>/moodring/config.toml` is used when present.
pub fn locate_config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    let explicit = explicit
        .map(Path::to_path_buf)
        .or_else(|| env_string(ENV_CONFIG).map(PathBuf::from));

    if let Some(path) = explicit {
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    Ok(dirs::config_dir()
        .map(|d| d.join("moodring").join("config.toml"))
        .filter(|p| p.exists()))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
