//! Repository layer for data access operations.
//!
//! Services talk to the [`UserStore`] and [`DepartmentStore`] traits; the
//! backend behind them is picked once at startup.

mod department_repo;
mod memory;
mod query;
mod traits;
mod user_repo;

use std::sync::Arc;

pub use department_repo::DepartmentRepository;
pub use memory::MemoryStore;
pub use query::{DepartmentSort, EmployeeSort, Page, PageQuery, SortDirection};
pub use traits::{DepartmentStore, UserStore};
pub use user_repo::UserRepository;

use crate::db::AsyncDbPool;

/// Aggregates the store handles for convenient access.
///
/// Cloning is cheap: both handles are reference counted.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserStore>,
    pub departments: Arc<dyn DepartmentStore>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one connection pool.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            departments: Arc::new(DepartmentRepository::new(pool)),
        }
    }

    /// Both stores over one set of in-memory tables.
    pub fn in_memory() -> Self {
        let store = MemoryStore::new();
        Self {
            users: Arc::new(store.clone()),
            departments: Arc::new(store),
        }
    }
}
