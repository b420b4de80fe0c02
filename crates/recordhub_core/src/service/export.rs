//! Export row shaping.
//!
//! Produces header + string rows for collaborators that write CSV, JSON or
//! any other format. No file I/O happens here.

use crate::model::{Customer, Employee};
use serde::Serialize;

pub const EMPLOYEE_EXPORT_HEADER: [&str; 5] = ["ID", "Name", "Age", "Salary", "JobTitle"];
pub const CUSTOMER_EXPORT_HEADER: [&str; 5] =
    ["ID", "Name", "Age", "MembershipLevel", "LastPurchaseDate"];

/// Tabular export payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn employee_table(employees: &[Employee]) -> ExportTable {
    ExportTable {
        header: EMPLOYEE_EXPORT_HEADER.map(String::from).to_vec(),
        rows: employees
            .iter()
            .map(|employee| {
                vec![
                    employee.id.clone(),
                    employee.name.clone(),
                    employee.age.to_string(),
                    format!("{:.2}", employee.salary),
                    employee.job_title.clone(),
                ]
            })
            .collect(),
    }
}

pub fn customer_table(customers: &[Customer]) -> ExportTable {
    ExportTable {
        header: CUSTOMER_EXPORT_HEADER.map(String::from).to_vec(),
        rows: customers
            .iter()
            .map(|customer| {
                vec![
                    customer.id.clone(),
                    customer.name.clone(),
                    customer.age.to_string(),
                    customer.membership_level.to_string(),
                    customer.last_purchase_date.format("%Y-%m-%d").to_string(),
                ]
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{customer_table, employee_table};
    use crate::model::{Customer, Employee, MembershipLevel};
    use chrono::NaiveDate;

    #[test]
    fn employee_rows_format_salary_with_two_decimals() {
        let table = employee_table(&[Employee::new("e1", "Ada", 36, 1234.5, "Engineer")]);
        assert_eq!(table.header[3], "Salary");
        assert_eq!(table.rows, vec![vec!["e1", "Ada", "36", "1234.50", "Engineer"]]);
    }

    #[test]
    fn customer_rows_use_iso_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let table = customer_table(&[Customer::new("c1", "Jane", 30, MembershipLevel::Gold, date)]);
        assert_eq!(table.rows[0][3], "Gold");
        assert_eq!(table.rows[0][4], "2024-02-29");
    }

    #[test]
    fn empty_input_keeps_header() {
        let table = employee_table(&[]);
        assert!(table.is_empty());
        assert_eq!(table.header.len(), 5);
    }
}
