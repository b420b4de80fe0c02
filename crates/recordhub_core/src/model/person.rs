//! Shared person capability and validation errors.

use chrono::NaiveDate;
use std::fmt::Debug;
use uuid::Uuid;

/// Minimum age accepted for employees and customers.
pub const MIN_AGE: u32 = 18;

/// Capability shared by employee and customer records.
pub trait PersonRecord: Debug {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn age(&self) -> u32;

    /// One-line human readable summary of the record.
    fn describe(&self) -> String;
}

/// Business-rule violation on a record or account input.
///
/// Always caller-correctable; messages are safe to show to end users.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("age must be at least 18, got {age}")]
    Underage { age: u32 },
    #[error("salary must be a non-negative amount, got {0}")]
    InvalidSalary(f64),
    #[error("last purchase date {date} is in the future (today is {today})")]
    FuturePurchaseDate { date: NaiveDate, today: NaiveDate },
    #[error("unknown membership level `{0}`; expected Bronze|Silver|Gold|Platinum")]
    UnknownMembershipLevel(String),
    #[error("unknown role `{0}`")]
    UnknownRole(String),
}

/// Builds a short prefixed record id such as `EMP-1F3A9C0B`.
///
/// Used by collaborators that do not supply their own ids.
pub fn new_record_id(prefix: &str) -> String {
    let simple = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, simple[..8].to_ascii_uppercase())
}

pub(crate) fn require_non_blank(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

pub(crate) fn require_adult(age: u32) -> Result<(), ValidationError> {
    if age < MIN_AGE {
        return Err(ValidationError::Underage { age });
    }
    Ok(())
}
