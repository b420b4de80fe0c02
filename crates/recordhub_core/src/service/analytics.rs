//! Aggregate statistics over already-fetched records.
//!
//! # Invariants
//! - Functions are pure and never touch storage.
//! - Empty inputs yield `0.0`/`0`/empty maps, never errors.
//! - Group keys with no members are omitted from grouped results.

use crate::model::{Customer, Employee, MembershipLevel, PersonRecord};
use std::collections::BTreeMap;

/// Mean age across employees and customers together.
pub fn average_age(employees: &[Employee], customers: &[Customer]) -> f64 {
    let people = employees.len() + customers.len();
    if people == 0 {
        return 0.0;
    }
    let total: u64 = employees
        .iter()
        .map(|employee| u64::from(employee.age()))
        .chain(customers.iter().map(|customer| u64::from(customer.age())))
        .sum();
    total as f64 / people as f64
}

pub fn average_salary(employees: &[Employee]) -> f64 {
    if employees.is_empty() {
        return 0.0;
    }
    let total: f64 = employees.iter().map(|employee| employee.salary).sum();
    total / employees.len() as f64
}

/// Counts customers whose level matches `level`, ignoring case.
///
/// Unrecognized level names match nobody.
pub fn count_membership_level(customers: &[Customer], level: &str) -> usize {
    let Ok(level) = level.parse::<MembershipLevel>() else {
        return 0;
    };
    customers
        .iter()
        .filter(|customer| customer.membership_level == level)
        .count()
}

pub fn average_salary_by_job_title(employees: &[Employee]) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for employee in employees {
        let entry = sums.entry(employee.job_title.as_str()).or_insert((0.0, 0));
        entry.0 += employee.salary;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(title, (total, count))| (title.to_string(), total / count as f64))
        .collect()
}

pub fn employees_per_job_title(employees: &[Employee]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for employee in employees {
        *counts.entry(employee.job_title.clone()).or_insert(0) += 1;
    }
    counts
}

pub fn customers_per_membership_level(customers: &[Customer]) -> BTreeMap<MembershipLevel, usize> {
    let mut counts = BTreeMap::new();
    for customer in customers {
        *counts.entry(customer.membership_level).or_insert(0) += 1;
    }
    counts
}
