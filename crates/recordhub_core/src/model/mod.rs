//! Domain model for managed records and user accounts.
//!
//! # Responsibility
//! - Define the employee, customer and account records shared by all layers.
//! - Own field-level business rules (`validate`) used at the service boundary.
//!
//! # Invariants
//! - Record ids and usernames are immutable once assigned.
//! - Employees and customers share behavior through [`PersonRecord`], not a
//!   common base struct.

pub mod customer;
pub mod employee;
pub mod person;
pub mod user;

pub use customer::{Customer, MembershipLevel};
pub use employee::Employee;
pub use person::{new_record_id, PersonRecord, ValidationError, MIN_AGE};
pub use user::{Role, User, UserSummary};
