//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure the single SQLite connection used by the core.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Repositories must not read/write records before migrations succeed.
//! - Exactly one [`StorageHandle`] is opened by the composition root; every
//!   repository borrows it instead of opening its own connection.

mod handle;
pub mod migrations;
mod open;

pub use handle::{StorageHandle, StorageLocation};
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage-level failure. Fatal when raised while opening the store.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error(
        "database schema version {db_version} is newer than supported {latest_supported}"
    )]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    #[error("table `{table}` does not match the records schema; missing columns: {missing}")]
    SchemaMismatch { table: &'static str, missing: String },
}
