//! User account repository backed by the `users` table.
//!
//! # Invariants
//! - `save` is insert-or-ignore: registering an existing username never
//!   overwrites the stored digest or role.
//! - Digests are read and written here but never logged.

use super::{
    log_repo_error, update_outcome, RecordRepository, RepoError, RepoResult, SaveOutcome,
    UpdateOutcome,
};
use crate::db::StorageHandle;
use crate::model::{Role, User};
use rusqlite::{params, Connection, Row};

const ENTITY: &str = "user";

const USER_SELECT_SQL: &str = "SELECT
    username,
    hashed_password,
    role
FROM users";

/// SQLite-backed user account repository.
pub struct SqliteUserRepository<'h> {
    conn: &'h Connection,
}

impl<'h> SqliteUserRepository<'h> {
    pub fn new(handle: &'h StorageHandle) -> Self {
        Self { conn: handle.conn() }
    }

    /// Looks up an account by username. Alias of [`RecordRepository::find_by_id`].
    pub fn find_by_username(&self, username: &str) -> RepoResult<User> {
        self.find_by_id(username)
    }

    /// Returns whether a row exists for `username`.
    pub fn username_exists(&self, username: &str) -> RepoResult<bool> {
        self.conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1);",
                [username],
                |row| row.get::<_, i64>(0),
            )
            .map(|exists| exists == 1)
            .map_err(RepoError::from)
            .inspect_err(|err| log_repo_error("username_exists", ENTITY, err))
    }

    fn find_by_id_inner(&self, username: &str) -> RepoResult<User> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE username = ?1;"))?;
        let mut rows = stmt.query([username])?;
        match rows.next()? {
            Some(row) => parse_user_row(row),
            None => Err(RepoError::NotFound {
                entity: ENTITY,
                key: username.to_string(),
            }),
        }
    }

    fn find_all_inner(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY username ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }

    fn save_inner(&self, user: &User) -> RepoResult<SaveOutcome> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO users (username, hashed_password, role)
             VALUES (?1, ?2, ?3);",
            params![
                user.username.as_str(),
                user.hashed_password(),
                user.role.as_str(),
            ],
        )?;
        if changed == 0 {
            return Ok(SaveOutcome::Ignored);
        }
        Ok(SaveOutcome::Inserted)
    }

    fn update_inner(&self, user: &User) -> RepoResult<UpdateOutcome> {
        let changed = self.conn.execute(
            "UPDATE users
             SET
                hashed_password = ?1,
                role = ?2
             WHERE username = ?3;",
            params![
                user.hashed_password(),
                user.role.as_str(),
                user.username.as_str(),
            ],
        )?;
        Ok(update_outcome(changed, ENTITY, &user.username))
    }

    fn delete_inner(&self, username: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE username = ?1;", [username])?;
        Ok(changed == 1)
    }
}

impl RecordRepository<User> for SqliteUserRepository<'_> {
    fn find_by_id(&self, id: &str) -> RepoResult<User> {
        self.find_by_id_inner(id)
            .inspect_err(|err| log_repo_error("find_by_id", ENTITY, err))
    }

    fn find_all(&self) -> RepoResult<Vec<User>> {
        self.find_all_inner()
            .inspect_err(|err| log_repo_error("find_all", ENTITY, err))
    }

    fn save(&self, entity: &User) -> RepoResult<SaveOutcome> {
        self.save_inner(entity)
            .inspect_err(|err| log_repo_error("save", ENTITY, err))
    }

    fn update(&self, entity: &User) -> RepoResult<UpdateOutcome> {
        self.update_inner(entity)
            .inspect_err(|err| log_repo_error("update", ENTITY, err))
    }

    fn delete(&self, id: &str) -> RepoResult<bool> {
        self.delete_inner(id)
            .inspect_err(|err| log_repo_error("delete", ENTITY, err))
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let role_text: String = row.get("role")?;
    let role = role_text.parse::<Role>().map_err(|_| {
        RepoError::InvalidData(format!("invalid role `{role_text}` in users.role"))
    })?;

    let username: String = row.get("username")?;
    let hashed_password: String = row.get("hashed_password")?;
    Ok(User::new(username, hashed_password, role))
}
