//! Process-wide storage handle.
//!
//! # Responsibility
//! - Own the one live connection to the backing store.
//! - Lend it to repositories for the lifetime of the composition root.
//!
//! # Invariants
//! - The connection is opened and migrated before the handle exists.
//! - No API closes the connection; it is released when the handle drops.

use super::{open_db, open_db_in_memory, DbResult};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Where the backing store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    File(PathBuf),
    Memory,
}

/// Owner of the single SQLite connection shared by every repository.
///
/// Built once by the composition root and passed by reference; repositories
/// hold `&StorageHandle` and therefore cannot outlive or close it.
#[derive(Debug)]
pub struct StorageHandle {
    conn: Connection,
    location: StorageLocation,
}

impl StorageHandle {
    /// Opens (or creates) the store at `path` and ensures the schema exists.
    ///
    /// # Errors
    /// Any failure here is a start-up failure; callers must not continue with
    /// a partially initialized store.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        let conn = open_db(path)?;
        Ok(Self {
            conn,
            location: StorageLocation::File(path.to_path_buf()),
        })
    }

    /// Opens a private in-memory store. Used by tests and dry runs.
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self {
            conn,
            location: StorageLocation::Memory,
        })
    }

    /// Borrows the live connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn location(&self) -> &StorageLocation {
        &self.location
    }
}
