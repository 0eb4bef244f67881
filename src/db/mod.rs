//! Database connection pool and embedded migrations.
//!
//! Provides async PostgreSQL connection pooling using diesel_async with bb8.

mod pool;

pub use pool::{
    AsyncDbPool, MEMORY_URL, MIGRATIONS, establish_async_connection_pool, is_memory_url,
    run_pending_migrations,
};
