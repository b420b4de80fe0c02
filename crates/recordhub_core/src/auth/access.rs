//! Static role → capability table.
//!
//! Every authorization decision goes through [`can`]; callers never compare
//! role names themselves.

use crate::model::Role;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Operation a caller wants to perform on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Action {
    View,
    Create,
    Update,
    Delete,
    Export,
}

/// Protected resource class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Resource {
    Employees,
    Customers,
    Users,
    Analytics,
}

/// Coarse access summary shown on dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccessLevel {
    Full,
    ReadOnly,
    Restricted,
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Export => "export",
        };
        f.write_str(text)
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Employees => "employees",
            Self::Customers => "customers",
            Self::Users => "users",
            Self::Analytics => "analytics",
        };
        f.write_str(text)
    }
}

const VIEW: &[Action] = &[Action::View];
const VIEW_EXPORT: &[Action] = &[Action::View, Action::Export];
const CRUD: &[Action] = &[Action::View, Action::Create, Action::Update, Action::Delete];
const CRUD_EXPORT: &[Action] = &[
    Action::View,
    Action::Create,
    Action::Update,
    Action::Delete,
    Action::Export,
];

/// Grants per (role, resource). Pairs not listed grant nothing.
const ACCESS_TABLE: &[(Role, Resource, &[Action])] = &[
    (Role::Admin, Resource::Employees, CRUD_EXPORT),
    (Role::Admin, Resource::Customers, CRUD_EXPORT),
    (Role::Admin, Resource::Users, CRUD),
    (Role::Admin, Resource::Analytics, VIEW),
    (Role::Manager, Resource::Employees, CRUD_EXPORT),
    (Role::Manager, Resource::Customers, CRUD_EXPORT),
    (Role::Manager, Resource::Analytics, VIEW),
    (Role::HrSpecialist, Resource::Employees, CRUD),
    (Role::HrSpecialist, Resource::Customers, VIEW),
    (Role::CustomerServiceAgent, Resource::Employees, VIEW),
    (Role::CustomerServiceAgent, Resource::Customers, CRUD),
    (Role::DataAnalyst, Resource::Employees, VIEW_EXPORT),
    (Role::DataAnalyst, Resource::Customers, VIEW_EXPORT),
    (Role::DataAnalyst, Resource::Analytics, VIEW),
];

/// Actions `role` may perform on `resource`.
pub fn permissions(role: Role, resource: Resource) -> &'static [Action] {
    ACCESS_TABLE
        .iter()
        .find(|(granted_role, granted_resource, _)| {
            *granted_role == role && *granted_resource == resource
        })
        .map(|(_, _, actions)| *actions)
        .unwrap_or(&[])
}

/// Returns whether `role` may perform `action` on `resource`.
pub fn can(role: Role, action: Action, resource: Resource) -> bool {
    permissions(role, resource).contains(&action)
}

/// Summarizes a role's access to one resource.
///
/// `Full` means every write action is granted; any view-only grant is
/// `ReadOnly`.
pub fn access_level(role: Role, resource: Resource) -> AccessLevel {
    let granted = permissions(role, resource);
    if granted.is_empty() {
        return AccessLevel::Restricted;
    }
    let writes = [Action::Create, Action::Update, Action::Delete];
    if writes.iter().all(|action| granted.contains(action)) {
        AccessLevel::Full
    } else {
        AccessLevel::ReadOnly
    }
}
