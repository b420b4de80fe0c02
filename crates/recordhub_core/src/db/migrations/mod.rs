//! Versioned schema setup for the records store.
//!
//! # Responsibility
//! - Bring a fresh or older store up to [`latest_version`] in one transaction.
//! - Confirm every table the repositories query has the columns they name.
//!
//! # Invariants
//! - Registry versions are strictly increasing.
//! - `PRAGMA user_version` is only advanced together with a passing column
//!   check; a store with a foreign layout is refused, never half-opened.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// Tables and the columns the repositories read and write.
const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("Employees", &["id", "name", "age", "salary", "jobTitle"]),
    (
        "Customers",
        &["id", "name", "age", "membershipLevel", "lastPurchaseDate"],
    ),
    ("Users", &["username", "hashed_password", "role"]),
];

/// Highest schema version this binary can write.
pub fn latest_version() -> u32 {
    MIGRATIONS
        .iter()
        .map(|migration| migration.version)
        .max()
        .unwrap_or(0)
}

/// Runs pending migrations and validates the resulting layout.
///
/// # Errors
/// - [`DbError::UnsupportedSchemaVersion`] for a store written by a newer binary.
/// - [`DbError::SchemaMismatch`] when an existing table lacks required columns;
///   the version stamp is rolled back in that case.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = latest_version();
    if found > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > found)
        .collect();
    if pending.is_empty() {
        return verify_columns(conn);
    }

    let tx = conn.transaction()?;
    for migration in &pending {
        tx.execute_batch(migration.sql)?;
    }
    verify_columns(&tx)?;
    tx.pragma_update(None, "user_version", latest)?;
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from={found} to={latest}");
    Ok(())
}

fn verify_columns(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    for &(table, required) in REQUIRED_COLUMNS {
        let present = stmt
            .query_map([table], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|column| !present.iter().any(|name| name.eq_ignore_ascii_case(column)))
            .collect();
        if !missing.is_empty() {
            return Err(DbError::SchemaMismatch {
                table,
                missing: missing.join(", "),
            });
        }
    }
    Ok(())
}
