//! Server configuration loading from file and environment variables.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// SQLite busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "pizzeria_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    5555
}

fn default_db_path() -> String {
    "app.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_pool_max_size() -> u32 {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl DatabaseConfig {
    /// Pool tunables derived from this section.
    pub fn runtime_settings(&self) -> pizzeria_db::DbRuntimeSettings {
        pizzeria_db::DbRuntimeSettings {
            busy_timeout_ms: self.busy_timeout_ms,
            pool_max_size: self.pool_max_size,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// `DB_URI` names a backend other than SQLite.
    #[error("unsupported database URI '{0}': only sqlite is supported")]
    UnsupportedDbUri(String),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `PIZZERIA_HOST` overrides `server.host`
/// - `PIZZERIA_PORT` overrides `server.port`
/// - `PIZZERIA_DB_PATH` overrides `database.path`
/// - `DB_URI` (`sqlite:///<path>` or a bare path) overrides `database.path`
///   and wins over `PIZZERIA_DB_PATH`
/// - `PIZZERIA_LOG_LEVEL` overrides `logging.level`
/// - `PIZZERIA_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed, or
/// if `DB_URI` is not a SQLite location.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(config, |key| std::env::var(key).ok())
}

fn apply_env_overrides(
    mut config: Config,
    var: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    if let Some(host) = var("PIZZERIA_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Some(port) = var("PIZZERIA_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Some(db_path) = var("PIZZERIA_DB_PATH") {
        config.database.path = db_path;
    }
    if let Some(uri) = var("DB_URI") {
        config.database.path = sqlite_path_from_uri(&uri)?;
    }
    if let Some(level) = var("PIZZERIA_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = var("PIZZERIA_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    Ok(config)
}

/// Resolves a database URI to a SQLite path.
///
/// `sqlite:///relative.db` and `sqlite:////abs/path.db` follow the usual
/// three-slash convention, `sqlite://` alone means an in-memory database, and
/// a value without a scheme is taken as a path.
pub fn sqlite_path_from_uri(uri: &str) -> Result<String, ConfigError> {
    let uri = uri.trim();
    match uri.split_once("://") {
        None => Ok(uri.to_string()),
        Some(("sqlite", "")) => Ok(":memory:".to_string()),
        Some(("sqlite", rest)) => match rest.strip_prefix('/') {
            Some(path) if !path.is_empty() => Ok(path.to_string()),
            _ => Err(ConfigError::UnsupportedDbUri(uri.to_string())),
        },
        Some(_) => Err(ConfigError::UnsupportedDbUri(uri.to_string())),
    }
}
