//! Role to capability table.
//!
//! Route guards and the permission report both read [`GRANTS`], so there is
//! exactly one place that decides what a role may do.

use serde::{Deserialize, Serialize};

use super::Role;

/// An action or area a role may be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    AccessAdminPanel,
    AccessManagerPanel,
    AccessEmployeePanel,
    ManageUsers,
    ManageEmployees,
    ManageTeam,
    ViewEmployees,
    ViewDepartments,
    ManageDepartments,
}

/// Roles granted each capability. Admin appears on every row.
const GRANTS: &[(Capability, &[Role])] = &[
    (Capability::AccessAdminPanel, &[Role::Admin]),
    (Capability::AccessManagerPanel, &[Role::Admin, Role::Manager]),
    (
        Capability::AccessEmployeePanel,
        &[Role::Admin, Role::Manager, Role::Employee],
    ),
    (Capability::ManageUsers, &[Role::Admin]),
    (Capability::ManageEmployees, &[Role::Admin, Role::Manager]),
    (Capability::ManageTeam, &[Role::Admin, Role::Manager]),
    (
        Capability::ViewEmployees,
        &[Role::Admin, Role::Manager, Role::Employee],
    ),
    (Capability::ViewDepartments, &[Role::Admin, Role::Manager]),
    (Capability::ManageDepartments, &[Role::Admin]),
];

impl Capability {
    pub const ALL: [Capability; 9] = [
        Capability::AccessAdminPanel,
        Capability::AccessManagerPanel,
        Capability::AccessEmployeePanel,
        Capability::ManageUsers,
        Capability::ManageEmployees,
        Capability::ManageTeam,
        Capability::ViewEmployees,
        Capability::ViewDepartments,
        Capability::ManageDepartments,
    ];

    /// Roles holding this capability.
    pub fn granted_to(self) -> &'static [Role] {
        GRANTS
            .iter()
            .find(|(capability, _)| *capability == self)
            .map(|(_, roles)| *roles)
            .unwrap_or(&[])
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::AccessAdminPanel => "ACCESS_ADMIN_PANEL",
            Capability::AccessManagerPanel => "ACCESS_MANAGER_PANEL",
            Capability::AccessEmployeePanel => "ACCESS_EMPLOYEE_PANEL",
            Capability::ManageUsers => "MANAGE_USERS",
            Capability::ManageEmployees => "MANAGE_EMPLOYEES",
            Capability::ManageTeam => "MANAGE_TEAM",
            Capability::ViewEmployees => "VIEW_EMPLOYEES",
            Capability::ViewDepartments => "VIEW_DEPARTMENTS",
            Capability::ManageDepartments => "MANAGE_DEPARTMENTS",
        }
    }
}

impl Role {
    /// Whether this role holds `capability`.
    pub fn can(&self, capability: Capability) -> bool {
        capability.granted_to().contains(self)
    }

    /// Every capability of this role, in table order.
    pub fn capabilities(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|capability| self.can(*capability))
            .collect()
    }
}
