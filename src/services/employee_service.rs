//! Employee service.
//!
//! Employees are users with role `EMPLOYEE`; every lookup here is scoped to
//! that role, so admins and managers are invisible to the employee API.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, Role, UpdateUser, User};
use crate::repositories::{DepartmentStore, EmployeeSort, Page, PageQuery, UserStore};
use crate::utils::password::hash_password;
use crate::utils::time::{now, parse_optional_date};
use crate::utils::validate::require_text;

/// Department names offered when the department table cannot be read.
pub const FALLBACK_DEPARTMENTS: [&str; 5] = [
    "Engineering & Technology",
    "Human Resources",
    "Marketing & Sales",
    "Finance",
    "Operations",
];

const MIN_PASSWORD_LENGTH: usize = 6;

/// An employee with its department resolved to a name.
#[derive(Debug, Clone)]
pub struct EmployeeView {
    pub user: User,
    pub department: Option<String>,
}

/// Input for [`EmployeeService::create_employee`].
#[derive(Debug, Clone, Default)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub position: Option<String>,
    pub email: String,
    pub department: String,
    pub is_active: Option<bool>,
    pub avatar_url: Option<String>,
    pub phone_number: Option<String>,
    /// `YYYY-MM-DD` or ISO date-time; defaults to now
    pub hire_date: Option<String>,
    pub profile: Option<String>,
    pub password: Option<String>,
}

/// Partial update; `None` leaves the stored value alone.
///
/// A blank `department` unassigns the employee.
#[derive(Debug, Clone, Default)]
pub struct EmployeePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub is_active: Option<bool>,
    pub avatar_url: Option<String>,
    pub phone_number: Option<String>,
    pub hire_date: Option<String>,
    pub profile: Option<String>,
}

#[derive(Clone)]
pub struct EmployeeService {
    users: Arc<dyn UserStore>,
    departments: Arc<dyn DepartmentStore>,
}

impl EmployeeService {
    pub fn new(users: Arc<dyn UserStore>, departments: Arc<dyn DepartmentStore>) -> Self {
        Self { users, departments }
    }

    pub async fn list_employees(&self) -> AppResult<Vec<EmployeeView>> {
        let users = self.users.list_by_role(Role::Employee).await?;
        self.with_departments(users).await
    }

    pub async fn get_employee(&self, employee_id: i32) -> AppResult<EmployeeView> {
        let user = self.find_employee(employee_id).await?;
        self.with_department(user).await
    }

    pub async fn get_employee_by_email(&self, email: &str) -> AppResult<EmployeeView> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .filter(User::is_employee)
            .ok_or_else(|| AppError::not_found("employee", "email", email))?;
        self.with_department(user).await
    }

    /// Case-insensitive substring search over name, email, position and
    /// department name.
    pub async fn search(&self, term: &str) -> AppResult<Vec<EmployeeView>> {
        let department_ids = self.departments.ids_with_name_like(term).await?;
        let users = self
            .users
            .search_by_role(Role::Employee, term, &department_ids)
            .await?;
        self.with_departments(users).await
    }

    /// Employees of the named department; an unknown name yields none.
    pub async fn by_department(&self, department: &str) -> AppResult<Vec<EmployeeView>> {
        let Some(found) = self.departments.find_by_name(department).await? else {
            return Ok(Vec::new());
        };
        let users = self
            .users
            .list_by_role_and_department(Role::Employee, found.id)
            .await?;
        Ok(users
            .into_iter()
            .map(|user| EmployeeView {
                user,
                department: Some(found.name.clone()),
            })
            .collect())
    }

    pub async fn by_status(&self, is_active: bool) -> AppResult<Vec<EmployeeView>> {
        let users = self
            .users
            .list_by_role_and_status(Role::Employee, is_active)
            .await?;
        self.with_departments(users).await
    }

    pub async fn paginated(&self, query: PageQuery<EmployeeSort>) -> AppResult<Page<EmployeeView>> {
        let page = self.users.page_by_role(Role::Employee, query).await?;
        Ok(Page {
            items: self.with_departments(page.items).await?,
            total: page.total,
        })
    }

    pub async fn create_employee(&self, input: NewEmployee) -> AppResult<EmployeeView> {
        let first_name = require_text("firstName", &input.first_name)?;
        let last_name = require_text("lastName", &input.last_name)?;
        let position = input
            .position
            .as_deref()
            .map(|p| require_text("position", p))
            .transpose()?;

        let email = input.email.trim().to_string();
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::duplicate("user", "email", email));
        }

        let password = input.password.as_deref().unwrap_or_default();
        if password.trim().is_empty() {
            return Err(AppError::validation(
                "password",
                "Password is required for creating new employees",
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::validation(
                "password",
                "Password must be at least 6 characters",
            ));
        }

        let department_id = self.resolve_department(&input.department).await?;
        let hire_date = parse_optional_date("hireDate", input.hire_date.as_deref())?
            .unwrap_or_else(now);

        let user = self
            .users
            .create(NewUser {
                email,
                password: hash_password(password)?,
                first_name,
                last_name,
                role: Role::Employee,
                is_active: input.is_active.unwrap_or(true),
                position,
                department_id,
                phone_number: input.phone_number,
                hire_date: Some(hire_date),
                avatar_url: input.avatar_url,
                profile: input.profile,
            })
            .await?;

        tracing::info!(employee_id = user.id, email = %user.email, "Employee created");
        self.with_department(user).await
    }

    pub async fn update_employee(
        &self,
        employee_id: i32,
        patch: EmployeePatch,
    ) -> AppResult<EmployeeView> {
        let existing = self.find_employee(employee_id).await?;

        let email = patch.email.map(|e| e.trim().to_string());
        if let Some(new_email) = &email
            && *new_email != existing.email
            && let Some(other) = self.users.find_by_email(new_email).await?
            && other.id != existing.id
        {
            return Err(AppError::duplicate("user", "email", new_email));
        }

        let department_id = match patch.department.as_deref().map(str::trim) {
            None => None,
            Some("") => Some(None),
            Some(name) => self.resolve_department(name).await?.map(Some),
        };

        let mut changes = UpdateUser::touch(now());
        changes.email = email;
        changes.first_name = patch
            .first_name
            .as_deref()
            .map(|s| require_text("firstName", s))
            .transpose()?;
        changes.last_name = patch
            .last_name
            .as_deref()
            .map(|s| require_text("lastName", s))
            .transpose()?;
        changes.position = patch.position;
        changes.department_id = department_id;
        changes.is_active = patch.is_active;
        changes.avatar_url = patch.avatar_url;
        changes.phone_number = patch.phone_number;
        changes.hire_date = parse_optional_date("hireDate", patch.hire_date.as_deref())?;
        changes.profile = patch.profile;

        let user = self.users.update(employee_id, changes).await?;
        tracing::info!(employee_id = user.id, "Employee updated");
        self.with_department(user).await
    }

    pub async fn delete_employee(&self, employee_id: i32) -> AppResult<()> {
        self.find_employee(employee_id).await?;
        self.users.delete(employee_id).await?;
        tracing::info!(employee_id, "Employee deleted");
        Ok(())
    }

    /// Sorted names of the active departments.
    ///
    /// Falls back to [`FALLBACK_DEPARTMENTS`] when the lookup fails.
    pub async fn department_names(&self) -> Vec<String> {
        match self.departments.list_active().await {
            Ok(departments) => {
                let mut names: Vec<String> = departments.into_iter().map(|d| d.name).collect();
                names.sort();
                names
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not load departments, using defaults");
                FALLBACK_DEPARTMENTS.iter().map(|s| s.to_string()).collect()
            }
        }
    }

    /// Number of employees in the named department; unknown names count 0.
    pub async fn count_by_department(&self, department: &str) -> AppResult<i64> {
        let Some(found) = self.departments.find_by_name(department).await? else {
            return Ok(0);
        };
        let counts = self
            .users
            .count_by_department(Role::Employee, &[found.id])
            .await?;
        Ok(counts.into_iter().map(|(_, count)| count).sum())
    }

    async fn find_employee(&self, employee_id: i32) -> AppResult<User> {
        self.users
            .find_by_id(employee_id)
            .await?
            .filter(User::is_employee)
            .ok_or_else(|| AppError::not_found("employee", "id", employee_id))
    }

    /// Maps a department name to the id of an active department.
    ///
    /// When the department store itself fails the employee is saved without
    /// a department instead of failing the request.
    async fn resolve_department(&self, name: &str) -> AppResult<Option<i32>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation(
                "department",
                "Department name cannot be empty",
            ));
        }

        match self.departments.find_by_name(name).await {
            Ok(Some(department)) if department.is_active => Ok(Some(department.id)),
            Ok(_) => {
                let valid = self.department_names().await;
                Err(AppError::validation(
                    "department",
                    format!(
                        "Department '{}' does not exist. Valid departments are: {}",
                        name,
                        valid.join(", ")
                    ),
                ))
            }
            Err(e) if e.is_infrastructure() => {
                tracing::warn!(
                    department = %name,
                    error = %e,
                    "Could not validate department, saving employee without one"
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn with_department(&self, user: User) -> AppResult<EmployeeView> {
        let department = match user.department_id {
            Some(id) => self.departments.find_by_id(id).await?.map(|d| d.name),
            None => None,
        };
        Ok(EmployeeView { user, department })
    }

    /// Resolves department names for a list with one batched lookup.
    async fn with_departments(&self, users: Vec<User>) -> AppResult<Vec<EmployeeView>> {
        let mut ids: Vec<i32> = users.iter().filter_map(|u| u.department_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let names: HashMap<i32, String> = self
            .departments
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|d| (d.id, d.name))
            .collect();

        Ok(users
            .into_iter()
            .map(|user| {
                let department = user.department_id.and_then(|id| names.get(&id).cloned());
                EmployeeView { user, department }
            })
            .collect())
    }
}
