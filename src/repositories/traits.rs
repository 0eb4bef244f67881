//! Store abstractions the services are written against.
//!
//! Two backends implement them: the diesel-async repositories over
//! PostgreSQL and the in-memory store used for demos and tests.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{
    Department, DepartmentChanges, NewDepartment, NewUser, Role, UpdateUser, User,
};
use crate::repositories::{DepartmentSort, EmployeeSort, Page, PageQuery};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user; a taken email surfaces as `AppError::Duplicate`.
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    async fn find_by_id(&self, user_id: i32) -> AppResult<Option<User>>;

    /// Users for the given ids, in no particular order. Unknown ids are skipped.
    async fn find_by_ids(&self, user_ids: &[i32]) -> AppResult<Vec<User>>;

    async fn find_by_email(&self, user_email: &str) -> AppResult<Option<User>>;

    async fn exists_with_role(&self, user_role: Role) -> AppResult<bool>;

    async fn list_by_role(&self, user_role: Role) -> AppResult<Vec<User>>;

    async fn list_by_role_and_department(
        &self,
        user_role: Role,
        department: i32,
    ) -> AppResult<Vec<User>>;

    async fn list_by_role_and_status(&self, user_role: Role, active: bool)
    -> AppResult<Vec<User>>;

    /// Case-insensitive substring match on first name, last name, email or
    /// position, or membership in one of `department_ids`.
    async fn search_by_role(
        &self,
        user_role: Role,
        term: &str,
        department_ids: &[i32],
    ) -> AppResult<Vec<User>>;

    async fn page_by_role(
        &self,
        user_role: Role,
        query: PageQuery<EmployeeSort>,
    ) -> AppResult<Page<User>>;

    /// `(department_id, count)` for users of `user_role` in the given
    /// departments. Departments without such users are absent.
    async fn count_by_department(
        &self,
        user_role: Role,
        department_ids: &[i32],
    ) -> AppResult<Vec<(i32, i64)>>;

    async fn update(&self, user_id: i32, changes: UpdateUser) -> AppResult<User>;

    /// Returns the number of deleted rows (0 or 1).
    async fn delete(&self, user_id: i32) -> AppResult<usize>;

    /// Round-trip to the backing store, for health checks.
    async fn ping(&self) -> AppResult<()>;
}

#[async_trait]
pub trait DepartmentStore: Send + Sync {
    /// Inserts a department; a name taken case-insensitively surfaces as
    /// `AppError::Duplicate`.
    async fn create(&self, new_department: NewDepartment) -> AppResult<Department>;

    /// Any department, active or not.
    async fn find_by_id(&self, department_id: i32) -> AppResult<Option<Department>>;

    /// Case-insensitive exact name match over all departments.
    async fn find_by_name(&self, department_name: &str) -> AppResult<Option<Department>>;

    async fn find_by_ids(&self, department_ids: &[i32]) -> AppResult<Vec<Department>>;

    /// Active departments ordered by name.
    async fn list_active(&self) -> AppResult<Vec<Department>>;

    async fn page_active(&self, query: PageQuery<DepartmentSort>) -> AppResult<Page<Department>>;

    /// Active departments whose name or description contains `term`,
    /// case-insensitively, ordered by name.
    async fn search_active(&self, term: &str) -> AppResult<Vec<Department>>;

    /// Ids of all departments whose name contains `term`, case-insensitively.
    async fn ids_with_name_like(&self, term: &str) -> AppResult<Vec<i32>>;

    async fn list_active_by_manager(&self, manager: i32) -> AppResult<Vec<Department>>;

    async fn update(
        &self,
        department_id: i32,
        changes: DepartmentChanges,
    ) -> AppResult<Department>;

    /// Soft delete: flips `is_active` off.
    async fn deactivate(&self, department_id: i32) -> AppResult<Department>;
}
