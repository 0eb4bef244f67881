//! Department service: uniqueness rules, soft delete and read-time
//! enrichment with employee counts and manager summaries.

use std::collections::HashMap;
use std::sync::Arc;

use bigdecimal::BigDecimal;

use crate::error::{AppError, AppResult};
use crate::models::{Department, DepartmentChanges, NewDepartment, Role, User};
use crate::repositories::{DepartmentSort, DepartmentStore, Page, PageQuery, UserStore};
use crate::utils::time::{now, parse_optional_date};
use crate::utils::validate::require_text;

/// A department with its computed fields.
#[derive(Debug, Clone)]
pub struct DepartmentView {
    pub department: Department,
    pub employee_count: i64,
    /// `None` when no manager is set or the id no longer resolves
    pub manager: Option<User>,
}

/// Editable department fields, used for both create and full update.
#[derive(Debug, Clone, Default)]
pub struct DepartmentInput {
    pub name: String,
    pub description: Option<String>,
    pub manager_id: Option<i32>,
    pub budget: Option<BigDecimal>,
    pub location: Option<String>,
    pub established_date: Option<String>,
    pub icon_color: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Clone)]
pub struct DepartmentService {
    departments: Arc<dyn DepartmentStore>,
    users: Arc<dyn UserStore>,
}

impl DepartmentService {
    pub fn new(departments: Arc<dyn DepartmentStore>, users: Arc<dyn UserStore>) -> Self {
        Self { departments, users }
    }

    pub async fn list_active(&self) -> AppResult<Vec<DepartmentView>> {
        let departments = self.departments.list_active().await?;
        self.enrich(departments).await
    }

    pub async fn list_active_paginated(
        &self,
        query: PageQuery<DepartmentSort>,
    ) -> AppResult<Page<DepartmentView>> {
        let page = self.departments.page_active(query).await?;
        Ok(Page {
            items: self.enrich(page.items).await?,
            total: page.total,
        })
    }

    pub async fn search_active(&self, term: &str) -> AppResult<Vec<DepartmentView>> {
        let departments = self.departments.search_active(term).await?;
        self.enrich(departments).await
    }

    pub async fn by_manager(&self, manager_id: i32) -> AppResult<Vec<DepartmentView>> {
        let departments = self.departments.list_active_by_manager(manager_id).await?;
        self.enrich(departments).await
    }

    /// Any department, including soft-deleted ones.
    pub async fn get(&self, department_id: i32) -> AppResult<DepartmentView> {
        let department = self.find(department_id).await?;
        self.enrich_one(department).await
    }

    pub async fn create(&self, input: DepartmentInput) -> AppResult<DepartmentView> {
        let name = require_text("name", &input.name)?;
        if let Some(existing) = self.departments.find_by_name(&name).await? {
            return Err(AppError::duplicate("department", "name", existing.name));
        }

        let established_date =
            parse_optional_date("establishedDate", input.established_date.as_deref())?
                .unwrap_or_else(now);

        let department = self
            .departments
            .create(NewDepartment {
                name,
                description: input.description,
                manager_id: input.manager_id,
                budget: input.budget,
                location: input.location,
                established_date: Some(established_date),
                icon_color: input.icon_color,
                is_active: input.is_active.unwrap_or(true),
            })
            .await?;

        tracing::info!(department_id = department.id, name = %department.name, "Department created");
        self.enrich_one(department).await
    }

    /// Replaces every editable field. An omitted establishment date keeps
    /// the stored one.
    pub async fn update(
        &self,
        department_id: i32,
        input: DepartmentInput,
    ) -> AppResult<DepartmentView> {
        let existing = self.find(department_id).await?;

        let name = require_text("name", &input.name)?;
        if !existing.has_name(&name)
            && let Some(other) = self.departments.find_by_name(&name).await?
            && other.id != existing.id
        {
            return Err(AppError::duplicate("department", "name", name));
        }

        let established_date =
            parse_optional_date("establishedDate", input.established_date.as_deref())?
                .or(existing.established_date);

        let department = self
            .departments
            .update(
                department_id,
                DepartmentChanges {
                    name,
                    description: input.description,
                    manager_id: input.manager_id,
                    budget: input.budget,
                    location: input.location,
                    established_date,
                    icon_color: input.icon_color,
                    is_active: input.is_active.unwrap_or(true),
                    updated_at: now(),
                },
            )
            .await?;

        tracing::info!(department_id, "Department updated");
        self.enrich_one(department).await
    }

    /// Soft delete; refused while employees are still assigned.
    pub async fn delete(&self, department_id: i32) -> AppResult<()> {
        self.find(department_id).await?;

        let count = self.employee_counts(&[department_id]).await?;
        let employees = count.get(&department_id).copied().unwrap_or(0);
        if employees > 0 {
            return Err(AppError::BadRequest {
                message: format!(
                    "Cannot delete department with {} employees. Please move employees to other departments first.",
                    employees
                ),
            });
        }

        self.departments.deactivate(department_id).await?;
        tracing::info!(department_id, "Department deactivated");
        Ok(())
    }

    async fn find(&self, department_id: i32) -> AppResult<Department> {
        self.departments
            .find_by_id(department_id)
            .await?
            .ok_or_else(|| AppError::not_found("department", "id", department_id))
    }

    async fn employee_counts(&self, department_ids: &[i32]) -> AppResult<HashMap<i32, i64>> {
        Ok(self
            .users
            .count_by_department(Role::Employee, department_ids)
            .await?
            .into_iter()
            .collect())
    }

    async fn enrich_one(&self, department: Department) -> AppResult<DepartmentView> {
        let mut views = self.enrich(vec![department]).await?;
        views.pop().ok_or_else(|| AppError::Internal {
            source: anyhow::anyhow!("department enrichment returned no rows"),
        })
    }

    /// One grouped count and one batched manager lookup for the whole list.
    async fn enrich(&self, departments: Vec<Department>) -> AppResult<Vec<DepartmentView>> {
        if departments.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = departments.iter().map(|d| d.id).collect();
        let counts = self.employee_counts(&ids).await?;

        let mut manager_ids: Vec<i32> = departments.iter().filter_map(|d| d.manager_id).collect();
        manager_ids.sort_unstable();
        manager_ids.dedup();
        let managers: HashMap<i32, User> = self
            .users
            .find_by_ids(&manager_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(departments
            .into_iter()
            .map(|department| DepartmentView {
                employee_count: counts.get(&department.id).copied().unwrap_or(0),
                manager: department
                    .manager_id
                    .and_then(|id| managers.get(&id).cloned()),
                department,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::repositories::MemoryStore;

    fn setup() -> (DepartmentService, MemoryStore) {
        let store = MemoryStore::new();
        let service = DepartmentService::new(Arc::new(store.clone()), Arc::new(store.clone()));
        (service, store)
    }

    fn input(name: &str) -> DepartmentInput {
        DepartmentInput {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn user(email: &str, role: Role, department_id: Option<i32>) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: "hash".to_string(),
            first_name: "Linus".to_string(),
            last_name: "T".to_string(),
            role,
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
    async fn test_create_rejects_case_insensitive_duplicate() {
        let (service, _) = setup();

        let created = service.create(input("Eng")).await.unwrap();
        assert!(created.department.is_active);
        assert!(created.department.established_date.is_some());
        assert_eq!(created.employee_count, 0);

        let err = service.create(input("eng")).await.unwrap_err();
        assert!(matches!(err, AppError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let (service, _) = setup();

        let err = service.create(input("   ")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "name"));
        assert!(service.list_active().await.unwrap().is_empty());

        let trimmed = service.create(input("  Ops ")).await.unwrap();
        assert_eq!(trimmed.department.name, "Ops");
    }

    #[tokio::test]
    async fn test_update_name_rules() {
        let (service, _) = setup();
        let eng = service.create(input("Eng")).await.unwrap();
        service.create(input("Ops")).await.unwrap();

        let err = service
            .update(eng.department.id, input("OPS"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate { .. }));

        let renamed = service
            .update(eng.department.id, input("ENG"))
            .await
            .unwrap();
        assert_eq!(renamed.department.name, "ENG");
        assert_eq!(
            renamed.department.established_date,
            eng.department.established_date
        );

        let blank = service
            .update(eng.department.id, input(" "))
            .await
            .unwrap_err();
        assert!(matches!(blank, AppError::Validation { ref field, .. } if field == "name"));

        let missing = service.update(9999, input("X")).await.unwrap_err();
        assert!(matches!(missing, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_blocked_then_soft_deletes() {
        let (service, store) = setup();
        let eng = service.create(input("Eng")).await.unwrap();
        let id = eng.department.id;

        let worker = UserStore::create(&store, user("w@x.io", Role::Employee, Some(id)))
            .await
            .unwrap();

        let err = service.delete(id).await.unwrap_err();
        match err {
            AppError::BadRequest { message } => {
                assert!(message.starts_with("Cannot delete department with 1 employees"))
            }
            other => panic!("Expected BadRequest, got {:?}", other),
        }

        store.delete(worker.id).await.unwrap();
        service.delete(id).await.unwrap();

        assert!(service.list_active().await.unwrap().is_empty());
        let fetched = service.get(id).await.unwrap();
        assert!(!fetched.department.is_active);
    }

    #[tokio::test]
    async fn test_enrichment_counts_employees_and_resolves_manager() {
        let (service, store) = setup();
        let boss = UserStore::create(&store, user("boss@x.io", Role::Manager, None))
            .await
            .unwrap();

        let mut with_manager = input("Eng");
        with_manager.manager_id = Some(boss.id);
        let eng = service.create(with_manager).await.unwrap();

        let mut stale = input("Ops");
        stale.manager_id = Some(4242);
        service.create(stale).await.unwrap();

        UserStore::create(&store, user("a@x.io", Role::Employee, Some(eng.department.id)))
            .await
            .unwrap();
        UserStore::create(&store, user("m@x.io", Role::Manager, Some(eng.department.id)))
            .await
            .unwrap();

        let listed = service.list_active().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].department.name, "Eng");
        assert_eq!(listed[0].employee_count, 1);
        assert_eq!(listed[0].manager.as_ref().map(|m| m.id), Some(boss.id));
        assert!(listed[1].manager.is_none());

        assert_eq!(service.by_manager(boss.id).await.unwrap().len(), 1);
        assert_eq!(service.search_active("ops").await.unwrap().len(), 1);
    }
}
