//! Department request handlers.
//!
//! Every response is wrapped in [`ApiResponse`]. Only active departments
//! are listed; deletion deactivates.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::DEPARTMENT_TAG;
use crate::api::dto::{
    ApiResponse, DepartmentListParams, DepartmentRequest, DepartmentResponse, ErrorResponse,
    PageMeta,
};
use crate::api::middleware::{AuthUser, Require, can};
use crate::error::{AppError, AppResult};
use crate::models::Capability;
use crate::services::DepartmentView;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

/// Creates department-related routes.
pub fn department_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_departments))
        .routes(routes!(create_department))
        .routes(routes!(departments_by_manager))
        .routes(routes!(get_department))
        .routes(routes!(update_department))
        .routes(routes!(delete_department))
}

fn to_responses(views: Vec<DepartmentView>) -> Vec<DepartmentResponse> {
    views.into_iter().map(DepartmentResponse::from).collect()
}

/// GET /api/departments - List active departments
///
/// A non-blank `search` returns the matches. Otherwise a page is returned
/// with `meta` when `page > 0` or `size` differs from 50, and the full
/// list when neither holds.
#[utoipa::path(
    get,
    path = "/",
    tag = DEPARTMENT_TAG,
    params(DepartmentListParams),
    responses(
        (status = 200, description = "Departments retrieved", body = ApiResponse<Vec<DepartmentResponse>>),
        (status = 403, description = "Missing capability", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn list_departments(
    State(state): State<AppState>,
    _guard: Require<can::ViewDepartments>,
    ValidatedQuery(params): ValidatedQuery<DepartmentListParams>,
) -> AppResult<Json<ApiResponse<Vec<DepartmentResponse>>>> {
    let departments = &state.services.departments;
    const MESSAGE: &str = "Departments retrieved successfully";

    if let Some(term) = params.search_term() {
        let views = departments.search_active(term).await?;
        return Ok(Json(ApiResponse::success(to_responses(views), MESSAGE)));
    }

    if params.wants_page() {
        let page = departments.list_active_paginated(params.to_query()).await?;
        let meta = PageMeta::new(params.page, params.size, page.total);
        return Ok(Json(
            ApiResponse::success(to_responses(page.items), MESSAGE).with_meta(meta),
        ));
    }

    let views = departments.list_active().await?;
    Ok(Json(ApiResponse::success(to_responses(views), MESSAGE)))
}

/// GET /api/departments/{id} - Get department by ID
///
/// Inactive departments are still returned here.
#[utoipa::path(
    get,
    path = "/{id}",
    tag = DEPARTMENT_TAG,
    params(("id" = i32, Path, description = "Department id")),
    responses(
        (status = 200, description = "Department retrieved", body = ApiResponse<DepartmentResponse>),
        (status = 404, description = "No department with this id", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn get_department(
    State(state): State<AppState>,
    _guard: Require<can::ViewDepartments>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<DepartmentResponse>>> {
    let view = state.services.departments.get(id).await?;
    Ok(Json(ApiResponse::success(
        view.into(),
        "Department retrieved successfully",
    )))
}

/// POST /api/departments - Create department
#[utoipa::path(
    post,
    path = "/",
    tag = DEPARTMENT_TAG,
    request_body = DepartmentRequest,
    responses(
        (status = 201, description = "Department created", body = ApiResponse<DepartmentResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn create_department(
    State(state): State<AppState>,
    _guard: Require<can::ManageDepartments>,
    ValidatedJson(payload): ValidatedJson<DepartmentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<DepartmentResponse>>)> {
    let view = state
        .services
        .departments
        .create(payload.into_input())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            view.into(),
            "Department created successfully",
        )),
    ))
}

/// PUT /api/departments/{id} - Replace department fields
#[utoipa::path(
    put,
    path = "/{id}",
    tag = DEPARTMENT_TAG,
    params(("id" = i32, Path, description = "Department id")),
    request_body = DepartmentRequest,
    responses(
        (status = 200, description = "Department updated", body = ApiResponse<DepartmentResponse>),
        (status = 404, description = "No department with this id", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn update_department(
    State(state): State<AppState>,
    _guard: Require<can::ManageDepartments>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<DepartmentRequest>,
) -> AppResult<Json<ApiResponse<DepartmentResponse>>> {
    let view = state
        .services
        .departments
        .update(id, payload.into_input())
        .await?;
    Ok(Json(ApiResponse::success(
        view.into(),
        "Department updated successfully",
    )))
}

/// DELETE /api/departments/{id} - Deactivate department
///
/// Refused while employees are still assigned.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = DEPARTMENT_TAG,
    params(("id" = i32, Path, description = "Department id")),
    responses(
        (status = 200, description = "Department deleted"),
        (status = 400, description = "Department still has employees", body = ErrorResponse),
        (status = 404, description = "No department with this id", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn delete_department(
    State(state): State<AppState>,
    _guard: Require<can::ManageDepartments>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.departments.delete(id).await?;
    Ok(Json(ApiResponse::message("Department deleted successfully")))
}

/// GET /api/departments/manager/{manager_id} - Departments run by a manager
///
/// Open to `ViewDepartments` holders and to the manager named in the path.
#[utoipa::path(
    get,
    path = "/manager/{manager_id}",
    tag = DEPARTMENT_TAG,
    params(("manager_id" = i32, Path, description = "Managing user id")),
    responses(
        (status = 200, description = "Active departments of the manager", body = ApiResponse<Vec<DepartmentResponse>>),
        (status = 403, description = "Neither department viewer nor the manager", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn departments_by_manager(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(manager_id): Path<i32>,
) -> AppResult<Json<ApiResponse<Vec<DepartmentResponse>>>> {
    if !caller.can(Capability::ViewDepartments) && caller.user_id != manager_id {
        tracing::warn!(
            user_id = caller.user_id,
            manager_id,
            "Department listing of another manager refused"
        );
        return Err(AppError::forbidden(
            "Only department viewers or the manager may list these departments",
        ));
    }

    let views = state.services.departments.by_manager(manager_id).await?;
    Ok(Json(ApiResponse::success(
        to_responses(views),
        "Departments managed by employee retrieved successfully",
    )))
}
