//! Database layer for the pizzeria API.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization
//! and embedded SQL migrations. Every table the API reads or writes is
//! created through the versioned migrations in this crate.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: the default store is a single local file, no
//!   external database process required. WAL mode allows concurrent readers
//!   with a single writer.
//! - **`r2d2` connection pool**: bounded connection reuse, one connection per
//!   request handler. An in-memory database gets a single pinned connection,
//!   since each SQLite `:memory:` connection is a separate database.
//! - **Embedded migrations**: SQL files are compiled into the binary via
//!   `include_str!`, so the schema ships with the server.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, open_database, DbLocation, DbPool, DbRuntimeSettings, PoolError};
