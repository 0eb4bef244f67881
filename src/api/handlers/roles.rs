//! Role dashboards and the permission report.

use axum::Json;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::ROLE_TAG;
use crate::api::dto::{DashboardResponse, ErrorResponse, PermissionReport};
use crate::api::middleware::{AuthUser, Require, can};
use crate::state::AppState;

pub fn role_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(admin_dashboard))
        .routes(routes!(manager_dashboard))
        .routes(routes!(employee_dashboard))
        .routes(routes!(check_permissions))
}

/// GET /api/roles/admin - Admin dashboard
#[utoipa::path(
    get,
    path = "/admin",
    tag = ROLE_TAG,
    responses(
        (status = 200, description = "Admin greeting", body = DashboardResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn admin_dashboard(
    Require(caller, _): Require<can::AccessAdminPanel>,
) -> Json<DashboardResponse> {
    Json(DashboardResponse::new(
        "Welcome to the Admin Dashboard!",
        caller.email,
        caller.role,
    ))
}

/// GET /api/roles/manager - Manager dashboard
#[utoipa::path(
    get,
    path = "/manager",
    tag = ROLE_TAG,
    responses(
        (status = 200, description = "Manager greeting", body = DashboardResponse),
        (status = 403, description = "Caller is neither manager nor admin", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn manager_dashboard(
    Require(caller, _): Require<can::AccessManagerPanel>,
) -> Json<DashboardResponse> {
    Json(DashboardResponse::new(
        "Welcome to the Manager Dashboard!",
        caller.email,
        caller.role,
    ))
}

/// GET /api/roles/employee - Employee dashboard
#[utoipa::path(
    get,
    path = "/employee",
    tag = ROLE_TAG,
    responses(
        (status = 200, description = "Employee greeting", body = DashboardResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn employee_dashboard(
    Require(caller, _): Require<can::AccessEmployeePanel>,
) -> Json<DashboardResponse> {
    Json(DashboardResponse::new(
        "Welcome to the Employee Dashboard!",
        caller.email,
        caller.role,
    ))
}

/// GET /api/roles/check-permissions - What the caller may do
#[utoipa::path(
    get,
    path = "/check-permissions",
    tag = ROLE_TAG,
    responses(
        (status = 200, description = "Capability flags of the caller", body = PermissionReport)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn check_permissions(caller: AuthUser) -> Json<PermissionReport> {
    Json(PermissionReport::new(caller.email, caller.role))
}
