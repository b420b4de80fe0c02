//! Customer record and membership tiers.

use super::person::{require_adult, require_non_blank, PersonRecord, ValidationError};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Loyalty tier of a customer, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MembershipLevel {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl MembershipLevel {
    pub const ALL: [MembershipLevel; 4] = [
        MembershipLevel::Bronze,
        MembershipLevel::Silver,
        MembershipLevel::Gold,
        MembershipLevel::Platinum,
    ];

    /// Canonical name, also used as the persisted column value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
        }
    }
}

impl Display for MembershipLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipLevel {
    type Err = ValidationError;

    /// Parses a level name, ignoring case and surrounding whitespace.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyField("membership level"));
        }
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownMembershipLevel(trimmed.to_string()))
    }
}

/// Customer stored in the `customers` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub membership_level: MembershipLevel,
    /// Serialized as ISO-8601 `YYYY-MM-DD`.
    pub last_purchase_date: NaiveDate,
}

impl Customer {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        age: u32,
        membership_level: MembershipLevel,
        last_purchase_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age,
            membership_level,
            last_purchase_date,
        }
    }

    /// Checks business rules against the local calendar date.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_on(Local::now().date_naive())
    }

    /// Checks business rules against an explicit `today`.
    ///
    /// # Errors
    /// - Empty id or name.
    /// - Age below [`super::MIN_AGE`].
    /// - `last_purchase_date` after `today`.
    pub fn validate_on(&self, today: NaiveDate) -> Result<(), ValidationError> {
        require_non_blank(&self.id, "id")?;
        require_non_blank(&self.name, "name")?;
        require_adult(self.age)?;
        if self.last_purchase_date > today {
            return Err(ValidationError::FuturePurchaseDate {
                date: self.last_purchase_date,
                today,
            });
        }
        Ok(())
    }
}

impl PersonRecord for Customer {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn age(&self) -> u32 {
        self.age
    }

    fn describe(&self) -> String {
        format!(
            "Customer [ID: {}, Name: {}, Age: {}], Membership: {}, Last Purchase: {}",
            self.id, self.name, self.age, self.membership_level, self.last_purchase_date
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Customer, MembershipLevel};
    use crate::model::ValidationError;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn membership_level_parses_case_insensitively() {
        assert_eq!("gold".parse::<MembershipLevel>(), Ok(MembershipLevel::Gold));
        assert_eq!(
            " PLATINUM ".parse::<MembershipLevel>(),
            Ok(MembershipLevel::Platinum)
        );
        assert_eq!(
            "diamond".parse::<MembershipLevel>(),
            Err(ValidationError::UnknownMembershipLevel("diamond".to_string()))
        );
        assert_eq!(
            "".parse::<MembershipLevel>(),
            Err(ValidationError::EmptyField("membership level"))
        );
    }

    #[test]
    fn purchase_date_may_be_today_but_not_tomorrow() {
        let today = date(2024, 5, 10);
        let mut customer = Customer::new("c1", "Jane", 30, MembershipLevel::Gold, today);
        assert!(customer.validate_on(today).is_ok());

        customer.last_purchase_date = date(2024, 5, 11);
        assert!(matches!(
            customer.validate_on(today),
            Err(ValidationError::FuturePurchaseDate { .. })
        ));
    }

    #[test]
    fn underage_customer_is_rejected() {
        let today = date(2024, 5, 10);
        let customer = Customer::new("c2", "Tim", 17, MembershipLevel::Bronze, today);
        assert_eq!(
            customer.validate_on(today),
            Err(ValidationError::Underage { age: 17 })
        );
    }

    #[test]
    fn serializes_date_as_iso_text() {
        let customer = Customer::new("c3", "Lee", 40, MembershipLevel::Silver, date(2023, 1, 2));
        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(json["last_purchase_date"], "2023-01-02");
        assert_eq!(json["membership_level"], "Silver");
    }
}
