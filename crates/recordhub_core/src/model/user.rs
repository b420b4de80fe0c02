//! User account and role model.

use super::person::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Closed set of account roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Manager,
    #[serde(rename = "HR Specialist")]
    HrSpecialist,
    #[serde(rename = "Customer Service Agent")]
    CustomerServiceAgent,
    #[serde(rename = "Data Analyst")]
    DataAnalyst,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Manager,
        Role::HrSpecialist,
        Role::CustomerServiceAgent,
        Role::DataAnalyst,
    ];

    /// Display name, also used as the persisted column value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::HrSpecialist => "HR Specialist",
            Self::CustomerServiceAgent => "Customer Service Agent",
            Self::DataAnalyst => "Data Analyst",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    /// Parses a display name; case and `_`/`-`/space separators are ignored,
    /// so `"hr_specialist"` and `"HR Specialist"` are equivalent.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyField("role"));
        }
        let wanted = fold_role_name(trimmed);
        Self::ALL
            .into_iter()
            .find(|role| fold_role_name(role.as_str()) == wanted)
            .ok_or_else(|| ValidationError::UnknownRole(trimmed.to_string()))
    }
}

fn fold_role_name(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !matches!(ch, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Stored account. The password digest stays inside the crate.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    hashed_password: String,
    pub role: Role,
}

impl User {
    /// Builds an account from an already hashed password.
    pub fn new(username: impl Into<String>, hashed_password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            hashed_password: hashed_password.into(),
            role,
        }
    }

    pub(crate) fn hashed_password(&self) -> &str {
        &self.hashed_password
    }

    pub(crate) fn set_hashed_password(&mut self, hashed_password: String) {
        self.hashed_password = hashed_password;
    }

    /// Outward view without the digest.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            username: self.username.clone(),
            role: self.role,
        }
    }
}

impl Debug for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("hashed_password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Account read model exposed to collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: String,
    pub role: Role,
}
