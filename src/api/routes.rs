//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use std::time::Duration;

use axum::{Router, http::StatusCode, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    auth_middleware, global_error_handler, logging_middleware, request_id_middleware,
};
use crate::state::AppState;

/// Where the generated OpenAPI document is served.
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Request ID middleware - generates/propagates request IDs
/// 2. Logging middleware - logs requests with request IDs
/// 3. Global error handler - JSON bodies and request ids on every error
/// 4. CORS, compression and the request timeout
///
/// # Routes
/// - `/api/auth` - Registration, login and refresh (public)
/// - `/api/employees`, `/api/departments`, `/api/roles`, `/api/test` - bearer token required
/// - `/health`, `/health/ready`, `/health/live` - probes (public)
/// - `/swagger-ui`, `/api-docs/openapi.json` - API documentation (public)
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let protected = OpenApiRouter::new()
        .nest("/employees", handlers::employees::employee_routes())
        .nest("/departments", handlers::departments::department_routes())
        .nest("/roles", handlers::roles::role_routes())
        .nest("/test", handlers::test::test_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = OpenApiRouter::new()
        .nest("/auth", handlers::auth::auth_routes())
        .merge(protected);

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", api_routes)
        .merge(handlers::health::health_routes())
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url(OPENAPI_JSON_PATH, api))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(global_error_handler))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::repositories::Repositories;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    fn router() -> Router {
        let state = AppState::new(Repositories::in_memory(), JwtConfig::default());
        create_router(state, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_openapi_document_lists_paths() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri(OPENAPI_JSON_PATH)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.keys().any(|p| p.starts_with("/api/employees")));
        assert!(paths.contains_key("/api/auth/login"));
        assert!(paths.contains_key("/health"));
        assert!(doc["components"]["securitySchemes"]["bearerAuth"].is_object());
    }

    #[tokio::test]
    async fn test_protected_group_requires_token() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/roles/check-permissions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_liveness_is_public() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
