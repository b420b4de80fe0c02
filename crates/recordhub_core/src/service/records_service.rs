//! Records use-case service: the composition root's single entry point.
//!
//! # Responsibility
//! - Validate employee/customer input before it reaches the repositories.
//! - Expose the session manager and the aggregation functions.
//! - Answer authorization checks for the active session.
//! - Shape export rows for format-specific collaborators.
//!
//! # Invariants
//! - Every write path runs model validation first.
//! - All repositories share the one borrowed [`StorageHandle`].

use super::analytics;
use super::export::{customer_table, employee_table, ExportTable};
use crate::auth::{can, Action, AuthError, Resource, SessionManager};
use crate::config::AdminSeed;
use crate::db::StorageHandle;
use crate::model::{Customer, Employee, MembershipLevel, Role, UserSummary, ValidationError};
use crate::repo::{
    RecordRepository, RepoError, SqliteCustomerRepository, SqliteEmployeeRepository,
    UpdateOutcome,
};
use log::{info, warn};
use std::collections::BTreeMap;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error surfaced to presentation collaborators.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },
    #[error("no user is logged in")]
    NotAuthenticated,
    #[error("role `{role}` may not {action} {resource}")]
    AccessDenied {
        role: Role,
        action: Action,
        resource: Resource,
    },
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("{0}")]
    Repo(#[source] RepoError),
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, key } => Self::NotFound { entity, key },
            other => Self::Repo(other),
        }
    }
}

/// Facade over record repositories, session and analytics.
pub struct RecordsService<'h> {
    employees: SqliteEmployeeRepository<'h>,
    customers: SqliteCustomerRepository<'h>,
    session: SessionManager<'h>,
}

impl<'h> RecordsService<'h> {
    /// Creates a service with an anonymous session.
    pub fn new(handle: &'h StorageHandle) -> Self {
        Self {
            employees: SqliteEmployeeRepository::new(handle),
            customers: SqliteCustomerRepository::new(handle),
            session: SessionManager::new(handle),
        }
    }

    /// Creates a service and makes sure the bootstrap account exists.
    pub fn bootstrap(handle: &'h StorageHandle, seed: &AdminSeed) -> ServiceResult<Self> {
        let service = Self::new(handle);
        service
            .session
            .setup_initial_admin(&seed.username, &seed.password, seed.role)?;
        Ok(service)
    }

    // ---- employees -------------------------------------------------------

    pub fn save_employee(&self, employee: &Employee) -> ServiceResult<()> {
        employee.validate()?;
        self.employees.save(employee)?;
        info!("event=record_save module=service entity=employee status=ok");
        Ok(())
    }

    pub fn get_employee_by_id(&self, id: &str) -> ServiceResult<Employee> {
        Ok(self.employees.find_by_id(id)?)
    }

    pub fn get_all_employees(&self) -> ServiceResult<Vec<Employee>> {
        Ok(self.employees.find_all()?)
    }

    /// Validates and rewrites an employee. `NoMatch` is returned, not raised.
    pub fn update_employee(&self, employee: &Employee) -> ServiceResult<UpdateOutcome> {
        employee.validate()?;
        Ok(self.employees.update(employee)?)
    }

    pub fn delete_employee(&self, id: &str) -> ServiceResult<bool> {
        let deleted = self.employees.delete(id)?;
        log_delete("employee", deleted);
        Ok(deleted)
    }

    // ---- customers -------------------------------------------------------

    pub fn save_customer(&self, customer: &Customer) -> ServiceResult<()> {
        customer.validate()?;
        self.customers.save(customer)?;
        info!("event=record_save module=service entity=customer status=ok");
        Ok(())
    }

    pub fn get_customer_by_id(&self, id: &str) -> ServiceResult<Customer> {
        Ok(self.customers.find_by_id(id)?)
    }

    pub fn get_all_customers(&self) -> ServiceResult<Vec<Customer>> {
        Ok(self.customers.find_all()?)
    }

    pub fn update_customer(&self, customer: &Customer) -> ServiceResult<UpdateOutcome> {
        customer.validate()?;
        Ok(self.customers.update(customer)?)
    }

    pub fn delete_customer(&self, id: &str) -> ServiceResult<bool> {
        let deleted = self.customers.delete(id)?;
        log_delete("customer", deleted);
        Ok(deleted)
    }

    // ---- analytics -------------------------------------------------------

    pub fn average_age(&self) -> ServiceResult<f64> {
        Ok(analytics::average_age(
            &self.get_all_employees()?,
            &self.get_all_customers()?,
        ))
    }

    pub fn average_salary(&self) -> ServiceResult<f64> {
        Ok(analytics::average_salary(&self.get_all_employees()?))
    }

    pub fn membership_count(&self, level: &str) -> ServiceResult<usize> {
        Ok(analytics::count_membership_level(
            &self.get_all_customers()?,
            level,
        ))
    }

    pub fn average_salary_by_job_title(&self) -> ServiceResult<BTreeMap<String, f64>> {
        Ok(analytics::average_salary_by_job_title(
            &self.get_all_employees()?,
        ))
    }

    pub fn employees_per_job_title(&self) -> ServiceResult<BTreeMap<String, usize>> {
        Ok(analytics::employees_per_job_title(&self.get_all_employees()?))
    }

    pub fn customers_per_membership_level(
        &self,
    ) -> ServiceResult<BTreeMap<MembershipLevel, usize>> {
        Ok(analytics::customers_per_membership_level(
            &self.get_all_customers()?,
        ))
    }

    // ---- export ----------------------------------------------------------

    pub fn employee_export_table(&self) -> ServiceResult<ExportTable> {
        Ok(employee_table(&self.get_all_employees()?))
    }

    pub fn customer_export_table(&self) -> ServiceResult<ExportTable> {
        Ok(customer_table(&self.get_all_customers()?))
    }

    // ---- session ---------------------------------------------------------

    pub fn session(&self) -> &SessionManager<'h> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionManager<'h> {
        &mut self.session
    }

    /// Logs in and returns the bound account's public view.
    pub fn login(&mut self, username: &str, password: &str) -> ServiceResult<UserSummary> {
        Ok(self.session.login(username, password)?.summary())
    }

    pub fn logout(&mut self) {
        self.session.logout();
    }

    pub fn active_user(&self) -> Option<UserSummary> {
        self.session.active_user().map(|user| user.summary())
    }

    pub fn register_new_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> ServiceResult<UserSummary> {
        Ok(self.session.register_new_user(username, password, role)?)
    }

    pub fn get_all_users(&self) -> ServiceResult<Vec<UserSummary>> {
        Ok(self.session.get_all_users()?)
    }

    pub fn delete_user(&mut self, username: &str) -> ServiceResult<bool> {
        Ok(self.session.delete_user(username)?)
    }

    /// Checks the active session against the role capability table.
    ///
    /// Returns the active role on success.
    ///
    /// # Errors
    /// - [`ServiceError::NotAuthenticated`] when nobody is logged in.
    /// - [`ServiceError::AccessDenied`] when the role lacks the capability.
    pub fn authorize(&self, action: Action, resource: Resource) -> ServiceResult<Role> {
        let role = self
            .session
            .active_role()
            .ok_or(ServiceError::NotAuthenticated)?;
        if !can(role, action, resource) {
            warn!(
                "event=authorize module=service status=denied role={} action={} resource={}",
                role, action, resource
            );
            return Err(ServiceError::AccessDenied {
                role,
                action,
                resource,
            });
        }
        Ok(role)
    }
}

fn log_delete(entity: &'static str, deleted: bool) {
    if deleted {
        info!("event=record_delete module=service entity={entity} status=ok");
    } else {
        info!("event=record_delete module=service entity={entity} status=ok outcome=no_match");
    }
}
