//! Authentication, session and role authorization.
//!
//! # Responsibility
//! - Turn plaintext passwords into comparable digests ([`hasher`]).
//! - Own the single active identity slot ([`session`]).
//! - Answer role capability questions from one static table ([`access`]).
//!
//! # Invariants
//! - Unknown usernames and wrong passwords are reported identically.
//! - Plaintext passwords and digests never reach the log.

pub mod access;
pub mod hasher;
pub mod session;

use crate::model::ValidationError;
use crate::repo::RepoError;

pub use access::{access_level, can, permissions, AccessLevel, Action, Resource};
pub use hasher::{CredentialHasher, Sha256CredentialHasher};
pub use session::{SessionManager, SessionState};

pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication and account-management failure.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Covers both unknown usernames and wrong passwords.
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("username `{0}` is already taken")]
    DuplicateUsername(String),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Repo(#[from] RepoError),
}
