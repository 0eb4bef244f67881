//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use crate::config::JwtConfig;
use crate::repositories::Repositories;
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// Cloning is cheap since the stores behind services and repositories
/// are shared through `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Direct store access, used by the health checks
    pub repositories: Repositories,
    /// JWT configuration for token validation
    pub jwt_config: JwtConfig,
}

impl AppState {
    /// Creates the state from a set of stores and the JWT settings.
    ///
    /// # Example
    /// ```ignore
    /// let pool = establish_async_connection_pool(&settings.database).await?;
    /// let state = AppState::new(Repositories::new(pool), settings.jwt.clone());
    /// ```
    pub fn new(repositories: Repositories, jwt_config: JwtConfig) -> Self {
        let services = Services::new(repositories.clone(), jwt_config.clone());
        Self {
            services,
            repositories,
            jwt_config,
        }
    }
}
