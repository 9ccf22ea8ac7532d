//! Process bootstrap shared by the `pizzeria-server` and `pizzeria-seed`
//! binaries.

use std::net::SocketAddr;

use pizzeria_db::{DbPool, PoolError};
use pizzeria_models::ModelError;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::{load_config, Config, ConfigError, LoggingConfig};

/// Config file read when neither the command line nor the environment name one.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Environment variable naming the config file.
pub const CONFIG_PATH_VAR: &str = "PIZZERIA_CONFIG_PATH";

/// Failures that stop a binary before or while it runs.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Database(#[from] PoolError),

    #[error("failed to get database connection: {0}")]
    Checkout(#[from] r2d2::Error),

    #[error("failed to seed database: {0}")]
    Seed(#[from] ModelError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Picks the config file: first CLI argument, then `PIZZERIA_CONFIG_PATH`,
/// then [`DEFAULT_CONFIG_PATH`]. Blank values are skipped.
pub fn resolve_config_path(cli_arg: Option<String>, env_value: Option<String>) -> String {
    [cli_arg, env_value]
        .into_iter()
        .flatten()
        .find(|path| !path.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

/// Resolves the config path from the process arguments and environment and
/// loads it.
pub fn load_process_config() -> Result<Config, StartupError> {
    let path = resolve_config_path(std::env::args().nth(1), std::env::var(CONFIG_PATH_VAR).ok());
    let config = load_config(Some(&path))?;
    Ok(config)
}

/// Installs the global `tracing` subscriber.
///
/// An unparseable `level` falls back to `info`.
pub fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Opens the configured database with its schema migrated.
pub fn open_database(config: &Config) -> Result<DbPool, StartupError> {
    let pool = pizzeria_db::open_database(
        &config.database.path,
        config.database.runtime_settings(),
    )?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_argument_wins() {
        assert_eq!(
            resolve_config_path(Some("cli.toml".into()), Some("env.toml".into())),
            "cli.toml"
        );
    }

    #[test]
    fn env_used_when_argument_missing_or_blank() {
        assert_eq!(
            resolve_config_path(None, Some("env.toml".into())),
            "env.toml"
        );
        assert_eq!(
            resolve_config_path(Some("  ".into()), Some("env.toml".into())),
            "env.toml"
        );
    }

    #[test]
    fn falls_back_to_default_path() {
        assert_eq!(resolve_config_path(None, None), DEFAULT_CONFIG_PATH);
        assert_eq!(resolve_config_path(None, Some(String::new())), DEFAULT_CONFIG_PATH);
    }

    #[test]
    fn in_memory_database_from_config() {
        let mut config = Config::default();
        config.database.path = ":memory:".to_string();

        let pool = open_database(&config).expect("should open in-memory database");
        let conn = pool.get().expect("should get a connection");
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM restaurants", [], |row| row.get(0))
            .expect("restaurants table should exist");
        assert_eq!(count, 0);
    }
}
