//! Employee record.

use super::person::{require_adult, require_non_blank, PersonRecord, ValidationError};
use serde::{Deserialize, Serialize};

/// Staff member stored in the `employees` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub salary: f64,
    pub job_title: String,
}

impl Employee {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        age: u32,
        salary: f64,
        job_title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age,
            salary,
            job_title: job_title.into(),
        }
    }

    /// Checks business rules before the record is persisted.
    ///
    /// # Errors
    /// - Empty id, name or job title.
    /// - Age below [`super::MIN_AGE`].
    /// - Negative or non-finite salary.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank(&self.id, "id")?;
        require_non_blank(&self.name, "name")?;
        require_non_blank(&self.job_title, "job title")?;
        require_adult(self.age)?;
        if !self.salary.is_finite() || self.salary < 0.0 {
            return Err(ValidationError::InvalidSalary(self.salary));
        }
        Ok(())
    }
}

impl PersonRecord for Employee {
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
            "Employee [ID: {}, Name: {}, Age: {}], Title: {}, Salary: {:.2}",
            self.id, self.name, self.age, self.job_title, self.salary
        )
    }
}
