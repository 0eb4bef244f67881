//! In-memory store backend, selected with `database.url = "memory://"`.
//!
//! Mirrors the PostgreSQL constraints the services rely on: unique user
//! email, case-insensitive unique department name and the
//! `users.department_id` foreign key.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::models::{
    Department, DepartmentChanges, NewDepartment, NewUser, Role, UpdateUser, User,
};
use crate::repositories::{
    DepartmentSort, DepartmentStore, EmployeeSort, Page, PageQuery, SortDirection, UserStore,
};
use crate::utils::time::now;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    departments: Vec<Department>,
    next_user_id: i32,
    next_department_id: i32,
}

/// Shared tables behind both store traits.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| AppError::Internal {
            source: anyhow::anyhow!("memory store lock poisoned"),
        })
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn paginate<T: Clone>(mut rows: Vec<T>, offset: i64, size: i64) -> Page<T> {
    let total = rows.len() as i64;
    let start = offset.clamp(0, total) as usize;
    let end = offset.saturating_add(size).clamp(0, total) as usize;
    let items = rows.drain(start..end).collect();
    Page { items, total }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn compare_users(a: &User, b: &User, sort: EmployeeSort) -> Ordering {
    match sort {
        EmployeeSort::Name => a
            .first_name
            .cmp(&b.first_name)
            .then_with(|| a.last_name.cmp(&b.last_name)),
        EmployeeSort::Id => a.id.cmp(&b.id),
        EmployeeSort::FirstName => a.first_name.cmp(&b.first_name),
        EmployeeSort::LastName => a.last_name.cmp(&b.last_name),
        EmployeeSort::Email => a.email.cmp(&b.email),
        EmployeeSort::Position => a.position.cmp(&b.position),
        EmployeeSort::HireDate => a
            .hire_date
            .map(|d| d.to_jiff())
            .cmp(&b.hire_date.map(|d| d.to_jiff())),
        EmployeeSort::CreatedAt => a.created_at.to_jiff().cmp(&b.created_at.to_jiff()),
    }
}

fn compare_departments(a: &Department, b: &Department, sort: DepartmentSort) -> Ordering {
    match sort {
        DepartmentSort::Name => a.name.cmp(&b.name),
        DepartmentSort::Id => a.id.cmp(&b.id),
        DepartmentSort::Location => a.location.cmp(&b.location),
        DepartmentSort::Budget => a.budget.cmp(&b.budget),
        DepartmentSort::EstablishedDate => a
            .established_date
            .map(|d| d.to_jiff())
            .cmp(&b.established_date.map(|d| d.to_jiff())),
        DepartmentSort::CreatedAt => a.created_at.to_jiff().cmp(&b.created_at.to_jiff()),
    }
}

impl Tables {
    fn check_department_exists(&self, department_id: Option<i32>) -> AppResult<()> {
        match department_id {
            Some(dept) if !self.departments.iter().any(|d| d.id == dept) => {
                Err(AppError::validation(
                    "department_id",
                    format!("Invalid reference with value '{}'", dept),
                ))
            }
            _ => Ok(()),
        }
    }

    fn check_unique_email(&self, email: &str, except: Option<i32>) -> AppResult<()> {
        if self
            .users
            .iter()
            .any(|u| u.email == email && Some(u.id) != except)
        {
            return Err(AppError::duplicate("user", "email", email));
        }
        Ok(())
    }

    fn check_unique_department_name(&self, name: &str, except: Option<i32>) -> AppResult<()> {
        let lowered = name.to_lowercase();
        if self
            .departments
            .iter()
            .any(|d| d.name.to_lowercase() == lowered && Some(d.id) != except)
        {
            return Err(AppError::duplicate("department", "name", lowered));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut tables = self.lock()?;
        tables.check_unique_email(&new_user.email, None)?;
        tables.check_department_exists(new_user.department_id)?;

        tables.next_user_id += 1;
        let timestamp = now();
        let user = User {
            id: tables.next_user_id,
            email: new_user.email,
            password: new_user.password,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            role: new_user.role,
            is_active: new_user.is_active,
            position: new_user.position,
            department_id: new_user.department_id,
            phone_number: new_user.phone_number,
            hire_date: new_user.hire_date,
            avatar_url: new_user.avatar_url,
            profile: new_user.profile,
            created_at: timestamp,
            updated_at: timestamp,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, user_id: i32) -> AppResult<Option<User>> {
        Ok(self.lock()?.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn find_by_ids(&self, user_ids: &[i32]) -> AppResult<Vec<User>> {
        Ok(self
            .lock()?
            .users
            .iter()
            .filter(|u| user_ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn find_by_email(&self, user_email: &str) -> AppResult<Option<User>> {
        Ok(self
            .lock()?
            .users
            .iter()
            .find(|u| u.email == user_email)
            .cloned())
    }

    async fn exists_with_role(&self, user_role: Role) -> AppResult<bool> {
        Ok(self.lock()?.users.iter().any(|u| u.role == user_role))
    }

    async fn list_by_role(&self, user_role: Role) -> AppResult<Vec<User>> {
        Ok(self
            .lock()?
            .users
            .iter()
            .filter(|u| u.role == user_role)
            .cloned()
            .collect())
    }

    async fn list_by_role_and_department(
        &self,
        user_role: Role,
        department: i32,
    ) -> AppResult<Vec<User>> {
        Ok(self
            .lock()?
            .users
            .iter()
            .filter(|u| u.role == user_role && u.department_id == Some(department))
            .cloned()
            .collect())
    }

    async fn list_by_role_and_status(
        &self,
        user_role: Role,
        active: bool,
    ) -> AppResult<Vec<User>> {
        Ok(self
            .lock()?
            .users
            .iter()
            .filter(|u| u.role == user_role && u.is_active == active)
            .cloned()
            .collect())
    }

    async fn search_by_role(
        &self,
        user_role: Role,
        term: &str,
        department_ids: &[i32],
    ) -> AppResult<Vec<User>> {
        let needle = term.trim().to_lowercase();
        Ok(self
            .lock()?
            .users
            .iter()
            .filter(|u| u.role == user_role)
            .filter(|u| {
                contains_ci(&u.first_name, &needle)
                    || contains_ci(&u.last_name, &needle)
                    || contains_ci(&u.email, &needle)
                    || u.position.as_deref().is_some_and(|p| contains_ci(p, &needle))
                    || u.department_id.is_some_and(|d| department_ids.contains(&d))
            })
            .cloned()
            .collect())
    }

    async fn page_by_role(
        &self,
        user_role: Role,
        query: PageQuery<EmployeeSort>,
    ) -> AppResult<Page<User>> {
        let mut rows: Vec<User> = self
            .lock()?
            .users
            .iter()
            .filter(|u| u.role == user_role)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            directed(compare_users(a, b, query.sort), query.direction).then(a.id.cmp(&b.id))
        });
        Ok(paginate(rows, query.offset(), query.size))
    }

    async fn count_by_department(
        &self,
        user_role: Role,
        department_ids: &[i32],
    ) -> AppResult<Vec<(i32, i64)>> {
        let mut counts: HashMap<i32, i64> = HashMap::new();
        for user in self.lock()?.users.iter().filter(|u| u.role == user_role) {
            if let Some(dept) = user.department_id
                && department_ids.contains(&dept)
            {
                *counts.entry(dept).or_insert(0) += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }

    async fn update(&self, user_id: i32, changes: UpdateUser) -> AppResult<User> {
        let mut tables = self.lock()?;
        if let Some(new_email) = &changes.email {
            tables.check_unique_email(new_email, Some(user_id))?;
        }
        if let Some(department) = changes.department_id {
            tables.check_department_exists(department)?;
        }

        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| AppError::not_found("user", "id", user_id))?;

        if let Some(v) = changes.email {
            user.email = v;
        }
        if let Some(v) = changes.first_name {
            user.first_name = v;
        }
        if let Some(v) = changes.last_name {
            user.last_name = v;
        }
        if let Some(v) = changes.is_active {
            user.is_active = v;
        }
        if let Some(v) = changes.position {
            user.position = Some(v);
        }
        if let Some(v) = changes.department_id {
            user.department_id = v;
        }
        if let Some(v) = changes.phone_number {
            user.phone_number = Some(v);
        }
        if let Some(v) = changes.hire_date {
            user.hire_date = Some(v);
        }
        if let Some(v) = changes.avatar_url {
            user.avatar_url = Some(v);
        }
        if let Some(v) = changes.profile {
            user.profile = Some(v);
        }
        user.updated_at = changes.updated_at;

        Ok(user.clone())
    }

    async fn delete(&self, user_id: i32) -> AppResult<usize> {
        let mut tables = self.lock()?;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != user_id);
        Ok(before - tables.users.len())
    }

    async fn ping(&self) -> AppResult<()> {
        self.lock().map(|_| ())
    }
}

#[async_trait]
impl DepartmentStore for MemoryStore {
    async fn create(&self, new_department: NewDepartment) -> AppResult<Department> {
        let mut tables = self.lock()?;
        tables.check_unique_department_name(&new_department.name, None)?;

        tables.next_department_id += 1;
        let timestamp = now();
        let department = Department {
            id: tables.next_department_id,
            name: new_department.name,
            description: new_department.description,
            manager_id: new_department.manager_id,
            budget: new_department.budget,
            location: new_department.location,
            established_date: new_department.established_date,
            icon_color: new_department.icon_color,
            is_active: new_department.is_active,
            created_at: timestamp,
            updated_at: timestamp,
        };
        tables.departments.push(department.clone());
        Ok(department)
    }

    async fn find_by_id(&self, department_id: i32) -> AppResult<Option<Department>> {
        Ok(self
            .lock()?
            .departments
            .iter()
            .find(|d| d.id == department_id)
            .cloned())
    }

    async fn find_by_name(&self, department_name: &str) -> AppResult<Option<Department>> {
        Ok(self
            .lock()?
            .departments
            .iter()
            .find(|d| d.has_name(department_name))
            .cloned())
    }

    async fn find_by_ids(&self, department_ids: &[i32]) -> AppResult<Vec<Department>> {
        Ok(self
            .lock()?
            .departments
            .iter()
            .filter(|d| department_ids.contains(&d.id))
            .cloned()
            .collect())
    }

    async fn list_active(&self) -> AppResult<Vec<Department>> {
        let mut rows: Vec<Department> = self
            .lock()?
            .departments
            .iter()
            .filter(|d| d.is_active)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn page_active(&self, query: PageQuery<DepartmentSort>) -> AppResult<Page<Department>> {
        let mut rows: Vec<Department> = self
            .lock()?
            .departments
            .iter()
            .filter(|d| d.is_active)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            directed(compare_departments(a, b, query.sort), query.direction)
                .then(a.id.cmp(&b.id))
        });
        Ok(paginate(rows, query.offset(), query.size))
    }

    async fn search_active(&self, term: &str) -> AppResult<Vec<Department>> {
        let needle = term.trim().to_lowercase();
        let mut rows: Vec<Department> = self
            .lock()?
            .departments
            .iter()
            .filter(|d| d.is_active)
            .filter(|d| {
                contains_ci(&d.name, &needle)
                    || d
                        .description
                        .as_deref()
                        .is_some_and(|desc| contains_ci(desc, &needle))
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn ids_with_name_like(&self, term: &str) -> AppResult<Vec<i32>> {
        let needle = term.trim().to_lowercase();
        Ok(self
            .lock()?
            .departments
            .iter()
            .filter(|d| contains_ci(&d.name, &needle))
            .map(|d| d.id)
            .collect())
    }

    async fn list_active_by_manager(&self, manager: i32) -> AppResult<Vec<Department>> {
        let mut rows: Vec<Department> = self
            .lock()?
            .departments
            .iter()
            .filter(|d| d.is_active && d.manager_id == Some(manager))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn update(
        &self,
        department_id: i32,
        changes: DepartmentChanges,
    ) -> AppResult<Department> {
        let mut tables = self.lock()?;
        tables.check_unique_department_name(&changes.name, Some(department_id))?;

        let department = tables
            .departments
            .iter_mut()
            .find(|d| d.id == department_id)
            .ok_or_else(|| AppError::not_found("department", "id", department_id))?;

        department.name = changes.name;
        department.description = changes.description;
        department.manager_id = changes.manager_id;
        department.budget = changes.budget;
        department.location = changes.location;
        department.established_date = changes.established_date;
        department.icon_color = changes.icon_color;
        department.is_active = changes.is_active;
        department.updated_at = changes.updated_at;

        Ok(department.clone())
    }

    async fn deactivate(&self, department_id: i32) -> AppResult<Department> {
        let mut tables = self.lock()?;
        let department = tables
            .departments
            .iter_mut()
            .find(|d| d.id == department_id)
            .ok_or_else(|| AppError::not_found("department", "id", department_id))?;

        department.is_active = false;
        department.updated_at = now();
        Ok(department.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_department(name: &str) -> NewDepartment {
        NewDepartment {
            name: name.to_string(),
            description: None,
            manager_id: None,
            budget: None,
            location: None,
            established_date: None,
            icon_color: None,
            is_active: true,
        }
    }

    fn new_employee(email: &str, department_id: Option<i32>) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: "hash".to_string(),
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
            role: Role::Employee,
            is_active: true,
            position: None,
            department_id,
            phone_number: None,
            hire_date: None,
            avatar_url: None,
            profile: None,
        }
    }

    #[tokio::test]
    async fn test_department_name_is_unique_case_insensitively() {
        let store = MemoryStore::new();
        DepartmentStore::create(&store, new_department("Eng")).await.unwrap();

        let err = DepartmentStore::create(&store, new_department("eng"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_user_email_is_unique() {
        let store = MemoryStore::new();
        UserStore::create(&store, new_employee("a@b.com", None)).await.unwrap();

        let err = UserStore::create(&store, new_employee("a@b.com", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate { .. }));
        assert_eq!(store.list_by_role(Role::Employee).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_department_reference_must_exist() {
        let store = MemoryStore::new();
        let err = UserStore::create(&store, new_employee("a@b.com", Some(99)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_grouped_counts_and_paging() {
        let store = MemoryStore::new();
        let eng = DepartmentStore::create(&store, new_department("Eng")).await.unwrap();
        let ops = DepartmentStore::create(&store, new_department("Ops")).await.unwrap();
        for i in 0..3 {
            UserStore::create(&store, new_employee(&format!("e{}@x.io", i), Some(eng.id)))
                .await
                .unwrap();
        }

        let mut counts = store
            .count_by_department(Role::Employee, &[eng.id, ops.id])
            .await
            .unwrap();
        counts.sort();
        assert_eq!(counts, vec![(eng.id, 3)]);

        let page = store
            .page_by_role(
                Role::Employee,
                PageQuery {
                    page: 1,
                    size: 2,
                    sort: EmployeeSort::Email,
                    direction: SortDirection::Desc,
                },
            )
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].email, "e0@x.io");
    }
}
