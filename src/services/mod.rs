//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod auth_service;
mod department_service;
mod employee_service;

pub use auth_service::{AuthService, AuthSession, Registration};
pub use department_service::{DepartmentInput, DepartmentService, DepartmentView};
pub use employee_service::{
    EmployeePatch, EmployeeService, EmployeeView, FALLBACK_DEPARTMENTS, NewEmployee,
};

use crate::config::JwtConfig;
use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Cloning is cheap since the stores behind it are reference counted.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub employees: EmployeeService,
    pub departments: DepartmentService,
}

impl Services {
    /// Creates a new Services instance from Repositories.
    pub fn new(repos: Repositories, jwt: JwtConfig) -> Self {
        Self {
            auth: AuthService::new(repos.users.clone(), jwt),
            employees: EmployeeService::new(repos.users.clone(), repos.departments.clone()),
            departments: DepartmentService::new(repos.departments, repos.users),
        }
    }
}
