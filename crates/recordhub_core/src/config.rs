//! Runtime configuration for the records core.
//!
//! Values come from `RECORDHUB_*` environment variables with defaults that
//! match a fresh single-user install.

use crate::logging::{default_log_level, normalize_level};
use crate::model::{Role, ValidationError};
use std::fmt::{Debug, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "RECORDHUB_DB_PATH";
pub const ENV_LOG_DIR: &str = "RECORDHUB_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "RECORDHUB_LOG_LEVEL";
pub const ENV_ADMIN_USER: &str = "RECORDHUB_ADMIN_USER";
pub const ENV_ADMIN_PASSWORD: &str = "RECORDHUB_ADMIN_PASSWORD";
pub const ENV_ADMIN_ROLE: &str = "RECORDHUB_ADMIN_ROLE";

const DEFAULT_DB_FILE: &str = "recordhub.sqlite3";
const DEFAULT_ADMIN_USER: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "password123";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

/// Account created on first start when the users table has no such name.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl Default for AdminSeed {
    fn default() -> Self {
        Self {
            username: DEFAULT_ADMIN_USER.to_string(),
            password: DEFAULT_ADMIN_PASSWORD.to_string(),
            role: Role::Admin,
        }
    }
}

impl Debug for AdminSeed {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
    pub log_level: &'static str,
    pub initial_admin: AdminSeed,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            log_dir: None,
            log_level: default_log_level(),
            initial_admin: AdminSeed::default(),
        }
    }
}

impl CoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path.trim());
        }
        if let Some(dir) = get(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir.trim()));
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            config.set_log_level(&level)?;
        }
        if let Some(username) = get(ENV_ADMIN_USER) {
            config.initial_admin.username = username.trim().to_string();
        }
        if let Some(password) = get(ENV_ADMIN_PASSWORD) {
            config.initial_admin.password = password;
        }
        if let Some(role) = get(ENV_ADMIN_ROLE) {
            config.initial_admin.role = role.parse().map_err(|err: ValidationError| {
                ConfigError::InvalidValue {
                    key: ENV_ADMIN_ROLE,
                    message: err.to_string(),
                }
            })?;
        }

        Ok(config)
    }

    /// Replaces the log level, accepting the same names as the environment.
    pub fn set_log_level(&mut self, level: &str) -> Result<(), ConfigError> {
        self.log_level = normalize_level(level).map_err(|message| ConfigError::InvalidValue {
            key: ENV_LOG_LEVEL,
            message,
        })?;
        Ok(())
    }
}
