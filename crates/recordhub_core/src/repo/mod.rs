//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define one CRUD contract shared by every record kind.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repositories borrow the shared connection and never close it.
//! - Storage faults are logged here, at the repository boundary, and returned
//!   as [`RepoError::Storage`] so callers can tell "no data" from "store failed".
//! - Statements and cursors live only for the duration of one call.

pub mod customer_repo;
pub mod employee_repo;
pub mod user_repo;

use crate::db::DbError;
use log::{debug, error, warn};
use rusqlite::ErrorCode;

pub use customer_repo::SqliteCustomerRepository;
pub use employee_repo::SqliteEmployeeRepository;
pub use user_repo::SqliteUserRepository;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },
    #[error("{entity} with key `{key}` already exists")]
    Conflict { entity: &'static str, key: String },
    #[error("{0}")]
    Storage(#[from] DbError),
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(DbError::Sqlite(value))
    }
}

impl RepoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result of [`RecordRepository::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted,
    /// The key already existed and the row was left untouched.
    Ignored,
}

/// Result of [`RecordRepository::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// No row carries the key; nothing changed. Not an error by itself.
    NoMatch,
}

/// Uniform CRUD contract implemented once per record kind.
pub trait RecordRepository<T> {
    /// Loads one record by primary key.
    ///
    /// # Errors
    /// [`RepoError::NotFound`] when no row matches.
    fn find_by_id(&self, id: &str) -> RepoResult<T>;

    /// Loads every record ordered by primary key. Empty tables yield `[]`.
    fn find_all(&self) -> RepoResult<Vec<T>>;

    fn save(&self, entity: &T) -> RepoResult<SaveOutcome>;

    /// Rewrites all mutable columns of the row keyed by the entity.
    fn update(&self, entity: &T) -> RepoResult<UpdateOutcome>;

    /// Returns `true` when exactly one row was removed.
    fn delete(&self, id: &str) -> RepoResult<bool>;
}

/// Converts an insert failure into `Conflict` when the primary key collided.
pub(crate) fn map_insert_error(
    err: rusqlite::Error,
    entity: &'static str,
    key: &str,
) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            RepoError::Conflict {
                entity,
                key: key.to_string(),
            }
        }
        _ => err.into(),
    }
}

/// Emits the boundary diagnostic for a failed repository call.
pub(crate) fn log_repo_error(operation: &'static str, entity: &'static str, err: &RepoError) {
    match err {
        RepoError::NotFound { .. } => {
            debug!("event=repo_{operation} module=repo entity={entity} status=not_found");
        }
        RepoError::Conflict { .. } => {
            warn!("event=repo_{operation} module=repo entity={entity} status=conflict");
        }
        RepoError::Storage(_) | RepoError::InvalidData(_) => {
            error!(
                "event=repo_{operation} module=repo entity={entity} status=error error={err}"
            );
        }
    }
}

/// Logs the zero-row update warning and maps the affected-row count.
pub(crate) fn update_outcome(changed: usize, entity: &'static str, key: &str) -> UpdateOutcome {
    if changed == 0 {
        warn!("event=repo_update module=repo entity={entity} status=warn reason=no_match key={key}");
        return UpdateOutcome::NoMatch;
    }
    UpdateOutcome::Updated
}

pub(crate) fn age_from_db(value: i64, table: &str) -> RepoResult<u32> {
    u32::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid age value `{value}` in {table}.age")))
}
