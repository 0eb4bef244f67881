//! User repository for async database operations.
//!
//! Provides CRUD and role-scoped queries for the users table using diesel_async.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, Role, UpdateUser, User};
use crate::repositories::{EmployeeSort, Page, PageQuery, SortDirection, UserStore};

/// User repository holding an async connection pool.
///
/// Since `AsyncDbPool` (bb8::Pool) internally uses `Arc`, cloning is cheap
/// (just reference count increment). No need for `Arc<UserRepository>`.
#[derive(Clone)]
pub struct UserRepository {
    pool: AsyncDbPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(users)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_id(&self, user_id: i32) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .filter(id.eq(user_id))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn find_by_ids(&self, user_ids: &[i32]) -> AppResult<Vec<User>> {
        use crate::schema::users::dsl::*;
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await?;

        users
            .filter(id.eq_any(user_ids.to_vec()))
            .select(User::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_email(&self, user_email: &str) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .filter(email.eq(user_email))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn exists_with_role(&self, user_role: Role) -> AppResult<bool> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::select(diesel::dsl::exists(users.filter(role.eq(user_role))))
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn list_by_role(&self, user_role: Role) -> AppResult<Vec<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .filter(role.eq(user_role))
            .order(id.asc())
            .select(User::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn list_by_role_and_department(
        &self,
        user_role: Role,
        department: i32,
    ) -> AppResult<Vec<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .filter(role.eq(user_role))
            .filter(department_id.eq(department))
            .order(id.asc())
            .select(User::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn list_by_role_and_status(
        &self,
        user_role: Role,
        active: bool,
    ) -> AppResult<Vec<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .filter(role.eq(user_role))
            .filter(is_active.eq(active))
            .order(id.asc())
            .select(User::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn search_by_role(
        &self,
        user_role: Role,
        term: &str,
        department_ids: &[i32],
    ) -> AppResult<Vec<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let pattern = format!("%{}%", term.trim());
        let matches_text = first_name
            .ilike(pattern.clone())
            .or(last_name.ilike(pattern.clone()))
            .or(email.ilike(pattern.clone()))
            .or(position.ilike(pattern));

        let mut query = users
            .filter(role.eq(user_role))
            .select(User::as_select())
            .order(id.asc())
            .into_boxed();
        query = if department_ids.is_empty() {
            query.filter(matches_text)
        } else {
            query.filter(matches_text.or(department_id.eq_any(department_ids.to_vec())))
        };

        query.load(&mut conn).await.map_err(AppError::from)
    }

    async fn page_by_role(
        &self,
        user_role: Role,
        page: PageQuery<EmployeeSort>,
    ) -> AppResult<Page<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let query = users
            .filter(role.eq(user_role))
            .select(User::as_select())
            .into_boxed();
        let query = match (page.sort, page.direction) {
            (EmployeeSort::Name, SortDirection::Asc) => {
                query.order_by((first_name.asc(), last_name.asc()))
            }
            (EmployeeSort::Name, SortDirection::Desc) => {
                query.order_by((first_name.desc(), last_name.desc()))
            }
            (EmployeeSort::Id, SortDirection::Asc) => query.order_by(id.asc()),
            (EmployeeSort::Id, SortDirection::Desc) => query.order_by(id.desc()),
            (EmployeeSort::FirstName, SortDirection::Asc) => query.order_by(first_name.asc()),
            (EmployeeSort::FirstName, SortDirection::Desc) => query.order_by(first_name.desc()),
            (EmployeeSort::LastName, SortDirection::Asc) => query.order_by(last_name.asc()),
            (EmployeeSort::LastName, SortDirection::Desc) => query.order_by(last_name.desc()),
            (EmployeeSort::Email, SortDirection::Asc) => query.order_by(email.asc()),
            (EmployeeSort::Email, SortDirection::Desc) => query.order_by(email.desc()),
            (EmployeeSort::Position, SortDirection::Asc) => query.order_by(position.asc()),
            (EmployeeSort::Position, SortDirection::Desc) => query.order_by(position.desc()),
            (EmployeeSort::HireDate, SortDirection::Asc) => query.order_by(hire_date.asc()),
            (EmployeeSort::HireDate, SortDirection::Desc) => query.order_by(hire_date.desc()),
            (EmployeeSort::CreatedAt, SortDirection::Asc) => query.order_by(created_at.asc()),
            (EmployeeSort::CreatedAt, SortDirection::Desc) => query.order_by(created_at.desc()),
        };

        let items = query
            .then_order_by(id.asc())
            .offset(page.offset())
            .limit(page.size)
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        let total = users
            .filter(role.eq(user_role))
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok(Page { items, total })
    }

    async fn count_by_department(
        &self,
        user_role: Role,
        department_ids: &[i32],
    ) -> AppResult<Vec<(i32, i64)>> {
        use crate::schema::users::dsl::*;
        if department_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await?;

        let rows: Vec<(Option<i32>, i64)> = users
            .filter(role.eq(user_role))
            .filter(department_id.eq_any(department_ids.to_vec()))
            .group_by(department_id)
            .select((department_id, count_star()))
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .filter_map(|(department, count)| department.map(|d| (d, count)))
            .collect())
    }

    async fn update(&self, user_id: i32, changes: UpdateUser) -> AppResult<User> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(users.filter(id.eq(user_id)))
            .set(&changes)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::not_found("user", "id", user_id))
    }

    async fn delete(&self, user_id: i32) -> AppResult<usize> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(users.filter(id.eq(user_id)))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.pool.get().await?;

        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| AppError::Database {
                operation: "ping".to_string(),
                source: anyhow::Error::from(e),
            })
    }
}
