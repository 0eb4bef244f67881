//! Employee request handlers.
//!
//! Responses are bare JSON bodies. Reads need `ViewEmployees`, writes need
//! `ManageEmployees`.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::EMPLOYEE_TAG;
use crate::api::dto::{
    CreateEmployeeRequest, DepartmentCountResponse, EmployeeFilterParams, EmployeePageParams,
    EmployeePageResponse, EmployeeResponse, ErrorResponse, UpdateEmployeeRequest,
};
use crate::api::middleware::{Require, can};
use crate::error::AppResult;
use crate::services::EmployeeView;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

/// Creates employee-related routes.
pub fn employee_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_employees))
        .routes(routes!(create_employee))
        .routes(routes!(paginated_employees))
        .routes(routes!(list_department_names))
        .routes(routes!(count_by_department))
        .routes(routes!(get_employee_by_email))
        .routes(routes!(get_employee))
        .routes(routes!(update_employee))
        .routes(routes!(delete_employee))
}

fn to_responses(views: Vec<EmployeeView>) -> Vec<EmployeeResponse> {
    views.into_iter().map(EmployeeResponse::from).collect()
}

/// GET /api/employees - List employees
///
/// Applies the first non-empty filter in the order `search`,
/// `department`, `isActive`; with none, lists every employee.
#[utoipa::path(
    get,
    path = "/",
    tag = EMPLOYEE_TAG,
    params(EmployeeFilterParams),
    responses(
        (status = 200, description = "Employees", body = Vec<EmployeeResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing capability", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn list_employees(
    State(state): State<AppState>,
    _guard: Require<can::ViewEmployees>,
    ValidatedQuery(filter): ValidatedQuery<EmployeeFilterParams>,
) -> AppResult<Json<Vec<EmployeeResponse>>> {
    let employees = &state.services.employees;
    let search = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let department = filter
        .department
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let views = if let Some(term) = search {
        employees.search(term).await?
    } else if let Some(name) = department {
        employees.by_department(name).await?
    } else if let Some(is_active) = filter.is_active {
        employees.by_status(is_active).await?
    } else {
        employees.list_employees().await?
    };

    Ok(Json(to_responses(views)))
}

/// GET /api/employees/paginated - One page of employees
#[utoipa::path(
    get,
    path = "/paginated",
    tag = EMPLOYEE_TAG,
    params(EmployeePageParams),
    responses(
        (status = 200, description = "Employee page", body = EmployeePageResponse),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn paginated_employees(
    State(state): State<AppState>,
    _guard: Require<can::ViewEmployees>,
    ValidatedQuery(params): ValidatedQuery<EmployeePageParams>,
) -> AppResult<Json<EmployeePageResponse>> {
    let page = state.services.employees.paginated(params.to_query()).await?;
    Ok(Json(EmployeePageResponse::new(page, params.page, params.size)))
}

/// GET /api/employees/{id} - Get employee by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = EMPLOYEE_TAG,
    params(("id" = i32, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee", body = EmployeeResponse),
        (status = 404, description = "No employee with this id", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn get_employee(
    State(state): State<AppState>,
    _guard: Require<can::ViewEmployees>,
    Path(id): Path<i32>,
) -> AppResult<Json<EmployeeResponse>> {
    let view = state.services.employees.get_employee(id).await?;
    Ok(Json(view.into()))
}

/// GET /api/employees/email/{email} - Get employee by email
#[utoipa::path(
    get,
    path = "/email/{email}",
    tag = EMPLOYEE_TAG,
    params(("email" = String, Path, description = "Employee email")),
    responses(
        (status = 200, description = "Employee", body = EmployeeResponse),
        (status = 404, description = "No employee with this email", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn get_employee_by_email(
    State(state): State<AppState>,
    _guard: Require<can::ViewEmployees>,
    Path(email): Path<String>,
) -> AppResult<Json<EmployeeResponse>> {
    let view = state.services.employees.get_employee_by_email(&email).await?;
    Ok(Json(view.into()))
}

/// POST /api/employees - Create employee
///
/// The password is mandatory here and must be at least 6 characters.
#[utoipa::path(
    post,
    path = "/",
    tag = EMPLOYEE_TAG,
    request_body = CreateEmployeeRequest,
    responses(
        (status = 201, description = "Employee created", body = EmployeeResponse),
        (status = 400, description = "Invalid request or unknown department", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn create_employee(
    State(state): State<AppState>,
    _guard: Require<can::ManageEmployees>,
    ValidatedJson(payload): ValidatedJson<CreateEmployeeRequest>,
) -> AppResult<(StatusCode, Json<EmployeeResponse>)> {
    let view = state
        .services
        .employees
        .create_employee(payload.into_new_employee())
        .await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

/// PUT /api/employees/{id} - Update employee
#[utoipa::path(
    put,
    path = "/{id}",
    tag = EMPLOYEE_TAG,
    params(("id" = i32, Path, description = "Employee id")),
    request_body = UpdateEmployeeRequest,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeResponse),
        (status = 400, description = "Invalid request or unknown department", body = ErrorResponse),
        (status = 404, description = "No employee with this id", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn update_employee(
    State(state): State<AppState>,
    _guard: Require<can::ManageEmployees>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateEmployeeRequest>,
) -> AppResult<Json<EmployeeResponse>> {
    let view = state
        .services
        .employees
        .update_employee(id, payload.into_patch())
        .await?;
    Ok(Json(view.into()))
}

/// DELETE /api/employees/{id} - Delete employee
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = EMPLOYEE_TAG,
    params(("id" = i32, Path, description = "Employee id")),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 404, description = "No employee with this id", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn delete_employee(
    State(state): State<AppState>,
    _guard: Require<can::ManageEmployees>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.employees.delete_employee(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/employees/departments - Active department names
///
/// Falls back to a fixed list when the department store is unavailable.
#[utoipa::path(
    get,
    path = "/departments",
    tag = EMPLOYEE_TAG,
    responses(
        (status = 200, description = "Department names, sorted", body = Vec<String>)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn list_department_names(
    State(state): State<AppState>,
    _guard: Require<can::ViewEmployees>,
) -> Json<Vec<String>> {
    Json(state.services.employees.department_names().await)
}

/// GET /api/employees/departments/{department}/count - Employees in a department
#[utoipa::path(
    get,
    path = "/departments/{department}/count",
    tag = EMPLOYEE_TAG,
    params(("department" = String, Path, description = "Department name, case-insensitive")),
    responses(
        (status = 200, description = "Employee count; 0 for unknown names", body = DepartmentCountResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn count_by_department(
    State(state): State<AppState>,
    _guard: Require<can::ViewEmployees>,
    Path(department): Path<String>,
) -> AppResult<Json<DepartmentCountResponse>> {
    let employee_count = state
        .services
        .employees
        .count_by_department(&department)
        .await?;
    Ok(Json(DepartmentCountResponse {
        department,
        employee_count,
    }))
}
