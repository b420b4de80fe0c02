//! Session manager: login state and account administration.
//!
//! # Responsibility
//! - Validate credentials and bind the single active identity.
//! - Register, list, modify and delete user accounts.
//!
//! # Invariants
//! - At most one identity is bound; a second `login` rebinds (last wins).
//! - `login` reports unknown users and wrong passwords with the same error.
//! - Registration never overwrites an existing username.
//! - Every username argument is trimmed before it reaches the store.

use super::hasher::{CredentialHasher, Sha256CredentialHasher};
use super::{AuthError, AuthResult};
use crate::db::StorageHandle;
use crate::model::person::require_non_blank;
use crate::model::{Role, User, UserSummary, ValidationError};
use crate::repo::{RecordRepository, RepoError, SaveOutcome, SqliteUserRepository, UpdateOutcome};
use log::{info, warn};

/// Observable login state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState<'a> {
    Anonymous,
    Authenticated(&'a User),
}

/// Owner of the active-session slot and the account store.
pub struct SessionManager<'h, H: CredentialHasher = Sha256CredentialHasher> {
    users: SqliteUserRepository<'h>,
    hasher: H,
    active: Option<User>,
}

impl<'h> SessionManager<'h> {
    /// Creates an anonymous session manager using SHA-256 digests.
    pub fn new(handle: &'h StorageHandle) -> Self {
        Self::with_hasher(handle, Sha256CredentialHasher)
    }
}

impl<'h, H: CredentialHasher> SessionManager<'h, H> {
    pub fn with_hasher(handle: &'h StorageHandle, hasher: H) -> Self {
        Self {
            users: SqliteUserRepository::new(handle),
            hasher,
            active: None,
        }
    }

    /// Checks credentials and binds the session to the matching account.
    ///
    /// # Errors
    /// - [`AuthError::InvalidCredentials`] for an unknown username or a wrong
    ///   password; the two cases are indistinguishable to the caller.
    /// - [`AuthError::Repo`] when the store itself fails.
    pub fn login(&mut self, username: &str, password: &str) -> AuthResult<&User> {
        let user = match self.users.find_by_username(username.trim()) {
            Ok(user) => user,
            Err(RepoError::NotFound { .. }) => {
                warn!("event=auth_login module=auth status=denied reason=unknown_user");
                return Err(AuthError::InvalidCredentials);
            }
            Err(err) => return Err(err.into()),
        };

        if !self.hasher.verify(password, user.hashed_password()) {
            warn!("event=auth_login module=auth status=denied reason=password_mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        info!(
            "event=auth_login module=auth status=ok role={}",
            user.role.as_str()
        );
        let bound: &User = self.active.insert(user);
        Ok(bound)
    }

    /// Clears the session. Safe to call when already anonymous.
    pub fn logout(&mut self) {
        if self.active.take().is_some() {
            info!("event=auth_logout module=auth status=ok");
        }
    }

    pub fn active_user(&self) -> Option<&User> {
        self.active.as_ref()
    }

    pub fn active_role(&self) -> Option<Role> {
        self.active.as_ref().map(|user| user.role)
    }

    pub fn state(&self) -> SessionState<'_> {
        match &self.active {
            Some(user) => SessionState::Authenticated(user),
            None => SessionState::Anonymous,
        }
    }

    /// Creates a new account. Does not require an active session.
    ///
    /// # Errors
    /// - [`AuthError::Validation`] for a blank username or empty password.
    /// - [`AuthError::DuplicateUsername`] when the username is taken.
    pub fn register_new_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> AuthResult<UserSummary> {
        let username = username.trim();
        require_non_blank(username, "username")?;
        if password.is_empty() {
            return Err(ValidationError::EmptyField("password").into());
        }

        if self.users.username_exists(username)? {
            return Err(AuthError::DuplicateUsername(username.to_string()));
        }

        let user = User::new(username, self.hasher.hash(password), role);
        match self.users.save(&user)? {
            SaveOutcome::Inserted => {
                info!(
                    "event=auth_register module=auth status=ok role={}",
                    role.as_str()
                );
                Ok(user.summary())
            }
            SaveOutcome::Ignored => Err(AuthError::DuplicateUsername(username.to_string())),
        }
    }

    /// Creates the bootstrap account when it does not exist yet.
    ///
    /// Returns `true` when the account was created. Safe on every start.
    pub fn setup_initial_admin(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> AuthResult<bool> {
        match self.users.find_by_username(username.trim()) {
            Ok(_) => {
                info!("event=auth_seed_admin module=auth status=ok outcome=exists");
                Ok(false)
            }
            Err(RepoError::NotFound { .. }) => {
                self.register_new_user(username, password, role)?;
                info!("event=auth_seed_admin module=auth status=ok outcome=created");
                Ok(true)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Lists accounts without their digests.
    pub fn get_all_users(&self) -> AuthResult<Vec<UserSummary>> {
        let users = self.users.find_all()?;
        Ok(users.iter().map(User::summary).collect())
    }

    /// Deletes an account. Deleting the bound account also ends the session.
    pub fn delete_user(&mut self, username: &str) -> AuthResult<bool> {
        let username = username.trim();
        let deleted = self.users.delete(username)?;
        if deleted && self.is_active(username) {
            self.logout();
        }
        Ok(deleted)
    }

    /// Replaces an account password.
    pub fn change_password(
        &mut self,
        username: &str,
        new_password: &str,
    ) -> AuthResult<UpdateOutcome> {
        if new_password.is_empty() {
            return Err(ValidationError::EmptyField("password").into());
        }
        let digest = self.hasher.hash(new_password);
        self.modify_user(username, |user| user.set_hashed_password(digest))
    }

    /// Assigns a new role to an account.
    pub fn change_role(&mut self, username: &str, role: Role) -> AuthResult<UpdateOutcome> {
        self.modify_user(username, |user| user.role = role)
    }

    fn modify_user(
        &mut self,
        username: &str,
        apply: impl FnOnce(&mut User),
    ) -> AuthResult<UpdateOutcome> {
        let username = username.trim();
        let mut user = match self.users.find_by_username(username) {
            Ok(user) => user,
            Err(RepoError::NotFound { .. }) => return Ok(UpdateOutcome::NoMatch),
            Err(err) => return Err(err.into()),
        };
        apply(&mut user);

        let outcome = self.users.update(&user)?;
        if outcome == UpdateOutcome::Updated && self.is_active(username) {
            self.active = Some(user);
        }
        Ok(outcome)
    }

    fn is_active(&self, username: &str) -> bool {
        self.active
            .as_ref()
            .is_some_and(|user| user.username == username.trim())
    }
}
