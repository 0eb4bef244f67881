//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `auth` - login, registration and token refresh
//! - `employee` - employee requests, responses and pages
//! - `department` - department requests, responses and the envelope
//! - `access` - role dashboards, permission report, user info
//! - `error` - Common error response DTOs
//! - `pagination` - Pagination-related DTOs

mod access;
mod auth;
mod department;
mod employee;
mod error;
mod health;
mod pagination;

pub use access::{DashboardResponse, PermissionFlags, PermissionReport, UserInfoResponse};
pub use auth::{AuthResponse, LoginRequest, RefreshTokenRequest, RegisterRequest};
pub use department::{ApiResponse, DepartmentRequest, DepartmentResponse, ManagerInfo};
pub use employee::{
    CreateEmployeeRequest, DepartmentCountResponse, EmployeeFilterParams, EmployeePageResponse,
    EmployeeResponse, UpdateEmployeeRequest,
};
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use pagination::{DepartmentListParams, EmployeePageParams, PageMeta};
