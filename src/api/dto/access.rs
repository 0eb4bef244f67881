//! Role dashboard, permission report and user-info DTOs.

use jiff::civil::DateTime;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Capability, Role, User};

/// Greeting returned by the role dashboards.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    #[schema(example = "Welcome to the Admin Dashboard!")]
    pub message: String,
    /// Email of the caller
    pub user: String,
    pub role: Role,
    /// Capabilities held by the caller's role
    pub permissions: Vec<Capability>,
}

impl DashboardResponse {
    pub fn new(message: &str, email: String, role: Role) -> Self {
        Self {
            message: message.to_string(),
            user: email,
            role,
            permissions: role.capabilities(),
        }
    }
}

/// What the caller may do, read from the same table the route guards use.
#[derive(Debug, Serialize, ToSchema)]
pub struct PermissionReport {
    /// Email of the caller
    pub user: String,
    pub role: Role,
    pub permissions: PermissionFlags,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionFlags {
    pub can_access_admin: bool,
    pub can_access_employee: bool,
    pub can_access_manager: bool,
    pub can_manage_users: bool,
    pub can_manage_employees: bool,
    pub can_manage_team: bool,
    pub can_view_departments: bool,
    pub can_manage_departments: bool,
}

impl From<Role> for PermissionFlags {
    fn from(role: Role) -> Self {
        Self {
            can_access_admin: role.can(Capability::AccessAdminPanel),
            can_access_employee: role.can(Capability::AccessEmployeePanel),
            can_access_manager: role.can(Capability::AccessManagerPanel),
            can_manage_users: role.can(Capability::ManageUsers),
            can_manage_employees: role.can(Capability::ManageEmployees),
            can_manage_team: role.can(Capability::ManageTeam),
            can_view_departments: role.can(Capability::ViewDepartments),
            can_manage_departments: role.can(Capability::ManageDepartments),
        }
    }
}

impl PermissionReport {
    pub fn new(email: String, role: Role) -> Self {
        Self {
            user: email,
            role,
            permissions: PermissionFlags::from(role),
        }
    }
}

/// The authenticated user, without the password hash.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoResponse {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_active: bool,
    pub position: Option<String>,
    pub department_id: Option<i32>,
    pub phone_number: Option<String>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub hire_date: Option<DateTime>,
    pub avatar_url: Option<String>,
    pub profile: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime,
}

impl From<User> for UserInfoResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            is_active: user.is_active,
            position: user.position,
            department_id: user.department_id,
            phone_number: user.phone_number,
            hire_date: user.hire_date.map(|d| d.to_jiff()),
            avatar_url: user.avatar_url,
            profile: user.profile,
            created_at: user.created_at.to_jiff(),
            updated_at: user.updated_at.to_jiff(),
        }
    }
}
