use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub const AUTH_TAG: &str = "Auth";
pub const EMPLOYEE_TAG: &str = "Employees";
pub const DEPARTMENT_TAG: &str = "Departments";
pub const ROLE_TAG: &str = "Roles";
pub const TEST_TAG: &str = "Test";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Workforce",
        description = "Employee and department management API",
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::api::dto::PageMeta,
            crate::models::Role,
            crate::models::Capability,
            crate::error::ValidationFieldError,
        )
    ),
    tags(
        (name = AUTH_TAG, description = "Registration, login and token refresh"),
        (name = EMPLOYEE_TAG, description = "Employee management endpoints"),
        (name = DEPARTMENT_TAG, description = "Department management endpoints"),
        (name = ROLE_TAG, description = "Role dashboards and permission report"),
        (name = TEST_TAG, description = "Authenticated role check endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer Token Authentication"))
                        .build(),
                ),
            )
        }
    }
}
