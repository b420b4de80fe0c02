//! Core persistence and access-control layer for RecordHub.
//! This crate is the single source of truth for record and account invariants.

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::{
    access_level, can, AccessLevel, Action, AuthError, AuthResult, CredentialHasher, Resource,
    SessionManager, SessionState, Sha256CredentialHasher,
};
pub use config::{AdminSeed, ConfigError, CoreConfig};
pub use db::{DbError, StorageHandle};
pub use logging::{
    default_log_level, init_from_config, init_logging, init_stderr_logging, logging_status,
    LogSink, LoggingError,
};
pub use model::{
    new_record_id, Customer, Employee, MembershipLevel, PersonRecord, Role, User, UserSummary,
    ValidationError,
};
pub use repo::{
    RecordRepository, RepoError, RepoResult, SaveOutcome, SqliteCustomerRepository,
    SqliteEmployeeRepository, SqliteUserRepository, UpdateOutcome,
};
pub use service::export::ExportTable;
pub use service::records_service::{RecordsService, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
