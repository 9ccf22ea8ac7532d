//! Connection pool for the pizzeria database.
//!
//! A database is either a file on disk or a private in-memory database. File
//! databases run in WAL mode and are shared by every pooled connection. An
//! in-memory database exists only inside the connection that opened it, so
//! its pool is pinned to a single connection that is never recycled.

use std::path::PathBuf;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

use crate::migrations::{run_migrations, MigrationError};

/// Runtime tunables for SQLite connection behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbRuntimeSettings {
    /// Busy timeout for SQLite connections, in milliseconds.
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled connections for a file database.
    pub pool_max_size: u32,
}

impl Default for DbRuntimeSettings {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
            pool_max_size: 8,
        }
    }
}

pub type DbPool = Pool<SqliteConnectionManager>;

/// Errors raised while opening the database.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to create database connection pool: {0}")]
    PoolInit(#[from] r2d2::Error),

    #[error("failed to check out a connection for migrations: {0}")]
    Checkout(#[source] r2d2::Error),

    #[error(transparent)]
    Migration(#[from] MigrationError),
}

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    /// A private database held in memory by its one connection.
    Memory,
    /// A database file, created on first open.
    File(PathBuf),
}

impl DbLocation {
    /// `:memory:` and the empty string select an in-memory database; anything
    /// else is a file path.
    pub fn from_path(path: &str) -> Self {
        match path.trim() {
            "" | ":memory:" => DbLocation::Memory,
            other => DbLocation::File(PathBuf::from(other)),
        }
    }

    fn manager(&self) -> SqliteConnectionManager {
        match self {
            DbLocation::Memory => SqliteConnectionManager::memory(),
            DbLocation::File(path) => SqliteConnectionManager::file(path).with_flags(
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
            ),
        }
    }

    fn expected_journal_mode(&self) -> &'static str {
        match self {
            DbLocation::Memory => "memory",
            DbLocation::File(_) => "wal",
        }
    }
}

fn configure_connection(
    conn: &mut Connection,
    location: &DbLocation,
    busy_timeout_ms: u64,
) -> rusqlite::Result<()> {
    let journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
    if journal_mode != location.expected_journal_mode() {
        return Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
            Some(format!(
                "unexpected journal mode '{journal_mode}' for {location:?}"
            )),
        ));
    }
    // Restaurant deletion relies on ON DELETE CASCADE.
    conn.execute_batch(&format!(
        "PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = {busy_timeout_ms};"
    ))
}

/// Builds a connection pool for `db_path`.
///
/// For an in-memory location `settings.pool_max_size` is ignored: the pool
/// holds exactly one connection, kept open for the life of the pool.
///
/// # Errors
///
/// Returns [`PoolError::PoolInit`] if the first connection cannot be opened
/// and configured.
pub fn create_pool(db_path: &str, settings: DbRuntimeSettings) -> Result<DbPool, PoolError> {
    let location = DbLocation::from_path(db_path);

    let init_location = location.clone();
    let manager = location.manager().with_init(move |conn| {
        configure_connection(conn, &init_location, settings.busy_timeout_ms)
    });

    let builder = Pool::builder();
    let builder = match location {
        DbLocation::Memory => {
            if settings.pool_max_size > 1 {
                tracing::debug!(
                    requested = settings.pool_max_size,
                    "in-memory database uses a single connection"
                );
            }
            builder.max_size(1).idle_timeout(None).max_lifetime(None)
        }
        DbLocation::File(_) => builder.max_size(settings.pool_max_size),
    };
    let pool = builder.build(manager)?;

    tracing::debug!(
        path = db_path,
        max_size = pool.max_size(),
        "created sqlite connection pool"
    );
    Ok(pool)
}

/// Builds the pool and brings the schema up to date.
///
/// # Errors
///
/// Returns [`PoolError`] if the pool cannot be built, no connection can be
/// checked out, or a migration fails.
pub fn open_database(db_path: &str, settings: DbRuntimeSettings) -> Result<DbPool, PoolError> {
    let pool = create_pool(db_path, settings)?;
    {
        let conn = pool.get().map_err(PoolError::Checkout)?;
        let applied = run_migrations(&conn)?;
        if applied > 0 {
            tracing::info!(path = db_path, applied, "database schema migrated");
        }
    }
    Ok(pool)
}
