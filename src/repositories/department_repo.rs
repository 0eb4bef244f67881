//! Department repository for async database operations.
//!
//! Provides CRUD operations for the departments table. Name lookups are
//! case-insensitive, matching the `lower(name)` unique index.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Department, DepartmentChanges, NewDepartment};
use crate::repositories::{DepartmentSort, DepartmentStore, Page, PageQuery, SortDirection};
use crate::utils::time::now;

define_sql_function!(fn lower(x: Text) -> Text);

/// Department repository
#[derive(Clone)]
pub struct DepartmentRepository {
    pool: AsyncDbPool,
}

impl DepartmentRepository {
    /// Creates a new DepartmentRepository with the given connection pool.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DepartmentStore for DepartmentRepository {
    async fn create(&self, new_department: NewDepartment) -> AppResult<Department> {
        use crate::schema::departments::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(departments)
            .values(&new_department)
            .returning(Department::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_id(&self, department_id: i32) -> AppResult<Option<Department>> {
        use crate::schema::departments::dsl::*;
        let mut conn = self.pool.get().await?;

        departments
            .filter(id.eq(department_id))
            .select(Department::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn find_by_name(&self, department_name: &str) -> AppResult<Option<Department>> {
        use crate::schema::departments::dsl::*;
        let mut conn = self.pool.get().await?;

        departments
            .filter(lower(name).eq(department_name.trim().to_lowercase()))
            .select(Department::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn find_by_ids(&self, department_ids: &[i32]) -> AppResult<Vec<Department>> {
        use crate::schema::departments::dsl::*;
        if department_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await?;

        departments
            .filter(id.eq_any(department_ids.to_vec()))
            .select(Department::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn list_active(&self) -> AppResult<Vec<Department>> {
        use crate::schema::departments::dsl::*;
        let mut conn = self.pool.get().await?;

        departments
            .filter(is_active.eq(true))
            .order((name.asc(), id.asc()))
            .select(Department::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn page_active(&self, page: PageQuery<DepartmentSort>) -> AppResult<Page<Department>> {
        use crate::schema::departments::dsl::*;
        let mut conn = self.pool.get().await?;

        let query = departments
            .filter(is_active.eq(true))
            .select(Department::as_select())
            .into_boxed();
        let query = match (page.sort, page.direction) {
            (DepartmentSort::Name, SortDirection::Asc) => query.order_by(name.asc()),
            (DepartmentSort::Name, SortDirection::Desc) => query.order_by(name.desc()),
            (DepartmentSort::Id, SortDirection::Asc) => query.order_by(id.asc()),
            (DepartmentSort::Id, SortDirection::Desc) => query.order_by(id.desc()),
            (DepartmentSort::Location, SortDirection::Asc) => query.order_by(location.asc()),
            (DepartmentSort::Location, SortDirection::Desc) => query.order_by(location.desc()),
            (DepartmentSort::Budget, SortDirection::Asc) => query.order_by(budget.asc()),
            (DepartmentSort::Budget, SortDirection::Desc) => query.order_by(budget.desc()),
            (DepartmentSort::EstablishedDate, SortDirection::Asc) => {
                query.order_by(established_date.asc())
            }
            (DepartmentSort::EstablishedDate, SortDirection::Desc) => {
                query.order_by(established_date.desc())
            }
            (DepartmentSort::CreatedAt, SortDirection::Asc) => query.order_by(created_at.asc()),
            (DepartmentSort::CreatedAt, SortDirection::Desc) => query.order_by(created_at.desc()),
        };

        let items = query
            .then_order_by(id.asc())
            .offset(page.offset())
            .limit(page.size)
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        let total = departments
            .filter(is_active.eq(true))
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok(Page { items, total })
    }

    async fn search_active(&self, term: &str) -> AppResult<Vec<Department>> {
        use crate::schema::departments::dsl::*;
        let mut conn = self.pool.get().await?;

        let pattern = format!("%{}%", term.trim());
        departments
            .filter(is_active.eq(true))
            .filter(
                name.ilike(pattern.clone())
                    .or(description.ilike(pattern)),
            )
            .order((name.asc(), id.asc()))
            .select(Department::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn ids_with_name_like(&self, term: &str) -> AppResult<Vec<i32>> {
        use crate::schema::departments::dsl::*;
        let mut conn = self.pool.get().await?;

        departments
            .filter(name.ilike(format!("%{}%", term.trim())))
            .select(id)
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn list_active_by_manager(&self, manager: i32) -> AppResult<Vec<Department>> {
        use crate::schema::departments::dsl::*;
        let mut conn = self.pool.get().await?;

        departments
            .filter(is_active.eq(true))
            .filter(manager_id.eq(manager))
            .order((name.asc(), id.asc()))
            .select(Department::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn update(
        &self,
        department_id: i32,
        changes: DepartmentChanges,
    ) -> AppResult<Department> {
        use crate::schema::departments::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(departments.filter(id.eq(department_id)))
            .set(&changes)
            .returning(Department::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::not_found("department", "id", department_id))
    }

    async fn deactivate(&self, department_id: i32) -> AppResult<Department> {
        use crate::schema::departments::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(departments.filter(id.eq(department_id)))
            .set((is_active.eq(false), updated_at.eq(now())))
            .returning(Department::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::not_found("department", "id", department_id))
    }
}
