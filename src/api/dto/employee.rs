//! Employee request/response DTOs.

use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::dto::PageMeta;
use crate::models::Role;
use crate::repositories::Page;
use crate::services::{EmployeePatch, EmployeeView, NewEmployee};
use crate::utils::validate::not_blank;

/// Request body for creating an employee.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[validate(
        length(max = 100, message = "First name must not exceed 100 characters"),
        custom(function = "not_blank", message = "First name is required")
    )]
    #[schema(example = "Grace", min_length = 1)]
    pub first_name: String,

    #[validate(
        length(max = 100, message = "Last name must not exceed 100 characters"),
        custom(function = "not_blank", message = "Last name is required")
    )]
    #[schema(example = "Hopper", min_length = 1)]
    pub last_name: String,

    #[validate(
        length(max = 100, message = "Position must not exceed 100 characters"),
        custom(function = "not_blank", message = "Position is required")
    )]
    #[schema(example = "Software Engineer", min_length = 1)]
    pub position: String,

    #[validate(email(message = "Email should be valid"))]
    #[schema(example = "grace@example.com", format = "email")]
    pub email: String,

    /// Name of an active department (case-insensitive)
    #[validate(
        length(max = 100, message = "Department must not exceed 100 characters"),
        custom(function = "not_blank", message = "Department is required")
    )]
    #[schema(example = "Engineering & Technology", min_length = 1)]
    pub department: String,

    pub is_active: Option<bool>,

    #[validate(length(max = 500, message = "Avatar URL must not exceed 500 characters"))]
    pub avatar_url: Option<String>,

    #[validate(length(max = 20, message = "Phone number must not exceed 20 characters"))]
    #[schema(example = "+1 555 0100")]
    pub phone_number: Option<String>,

    /// `YYYY-MM-DD` or ISO date-time; defaults to now
    #[schema(example = "2024-01-15")]
    pub hire_date: Option<String>,

    #[validate(length(max = 1000, message = "Profile must not exceed 1000 characters"))]
    pub profile: Option<String>,

    /// Required on create
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(format = "password", min_length = 6)]
    pub password: Option<String>,
}

impl CreateEmployeeRequest {
    pub fn into_new_employee(self) -> NewEmployee {
        NewEmployee {
            first_name: self.first_name,
            last_name: self.last_name,
            position: Some(self.position),
            email: self.email,
            department: self.department,
            is_active: self.is_active,
            avatar_url: self.avatar_url,
            phone_number: self.phone_number,
            hire_date: self.hire_date,
            profile: self.profile,
            password: self.password,
        }
    }
}

/// Request body for updating an employee; omitted fields keep their value.
///
/// A blank `department` unassigns the employee. `password` is accepted
/// for compatibility and ignored.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    #[validate(
        length(max = 100, message = "First name must not exceed 100 characters"),
        custom(function = "not_blank", message = "First name must not be blank")
    )]
    pub first_name: Option<String>,

    #[validate(
        length(max = 100, message = "Last name must not exceed 100 characters"),
        custom(function = "not_blank", message = "Last name must not be blank")
    )]
    pub last_name: Option<String>,

    #[validate(length(max = 100, message = "Position must not exceed 100 characters"))]
    pub position: Option<String>,

    #[validate(email(message = "Email should be valid"))]
    pub email: Option<String>,

    #[validate(length(max = 100, message = "Department must not exceed 100 characters"))]
    pub department: Option<String>,

    pub is_active: Option<bool>,

    #[validate(length(max = 500, message = "Avatar URL must not exceed 500 characters"))]
    pub avatar_url: Option<String>,

    #[validate(length(max = 20, message = "Phone number must not exceed 20 characters"))]
    pub phone_number: Option<String>,

    pub hire_date: Option<String>,

    #[validate(length(max = 1000, message = "Profile must not exceed 1000 characters"))]
    pub profile: Option<String>,

    #[schema(format = "password")]
    pub password: Option<String>,
}

impl UpdateEmployeeRequest {
    pub fn into_patch(self) -> EmployeePatch {
        EmployeePatch {
            first_name: self.first_name,
            last_name: self.last_name,
            position: self.position,
            email: self.email,
            department: self.department,
            is_active: self.is_active,
            avatar_url: self.avatar_url,
            phone_number: self.phone_number,
            hire_date: self.hire_date,
            profile: self.profile,
        }
    }
}

/// Filters for `GET /api/employees`; the first non-empty one applies, in
/// the order search, department, isActive.
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EmployeeFilterParams {
    /// Case-insensitive match on name, email, position or department
    pub search: Option<String>,
    /// Exact department name (case-insensitive)
    pub department: Option<String>,
    pub is_active: Option<bool>,
}

/// Employee response; never carries the password hash.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    #[schema(example = 1)]
    pub id: i32,
    /// Full display name
    #[schema(example = "Grace Hopper")]
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub position: Option<String>,
    pub email: String,
    /// Department name
    pub department: Option<String>,
    pub is_active: bool,
    /// Stored avatar or a generated placeholder
    pub avatar_url: String,
    pub phone_number: Option<String>,
    #[schema(value_type = Option<String>, format = DateTime, example = "2024-01-15T00:00:00")]
    pub hire_date: Option<DateTime>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime,
    pub role: Role,
    pub profile: Option<String>,
}

impl From<EmployeeView> for EmployeeResponse {
    fn from(view: EmployeeView) -> Self {
        let user = view.user;
        Self {
            name: user.full_name(),
            avatar_url: user.avatar(),
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            position: user.position,
            email: user.email,
            department: view.department,
            is_active: user.is_active,
            phone_number: user.phone_number,
            hire_date: user.hire_date.map(|d| d.to_jiff()),
            created_at: user.created_at.to_jiff(),
            updated_at: user.updated_at.to_jiff(),
            role: user.role,
            profile: user.profile,
        }
    }
}

/// One page of employees.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePageResponse {
    pub employees: Vec<EmployeeResponse>,
    /// 0-based
    #[schema(example = 0)]
    pub current_page: i64,
    #[schema(example = 42)]
    pub total_items: i64,
    #[schema(example = 5)]
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl EmployeePageResponse {
    pub fn new(page: Page<EmployeeView>, current_page: i64, size: i64) -> Self {
        let meta = PageMeta::new(current_page, size, page.total);
        Self {
            employees: page.items.into_iter().map(EmployeeResponse::from).collect(),
            current_page: meta.current_page,
            total_items: meta.total_elements,
            total_pages: meta.total_pages,
            has_next: meta.has_next,
            has_previous: meta.has_previous,
        }
    }
}

/// Employee count of one department.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentCountResponse {
    #[schema(example = "Finance")]
    pub department: String,
    #[schema(example = 12)]
    pub employee_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::utils::time::now;

    fn view() -> EmployeeView {
        EmployeeView {
            user: User {
                id: 3,
                email: "grace@example.com".to_string(),
                password: "$argon2id$secret".to_string(),
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                role: Role::Employee,
                is_active: true,
                position: Some("Engineer".to_string()),
                department_id: Some(1),
                phone_number: None,
                hire_date: Some(now()),
                avatar_url: None,
                profile: None,
                created_at: now(),
                updated_at: now(),
            },
            department: Some("Engineering".to_string()),
        }
    }

    #[test]
    fn test_response_shape() {
        let json = serde_json::to_value(EmployeeResponse::from(view())).unwrap();
        assert_eq!(json["name"], "Grace Hopper");
        assert_eq!(json["firstName"], "Grace");
        assert_eq!(json["department"], "Engineering");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["role"], "EMPLOYEE");
        assert_eq!(json["avatarUrl"], "https://i.pravatar.cc/40?img=4");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_create_request_rules() {
        let request: CreateEmployeeRequest = serde_json::from_str(
            r#"{"firstName":"G","lastName":"H","position":"Dev","email":"g@x.io",
                "department":"Finance","password":"12345"}"#,
        )
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));

        let request: CreateEmployeeRequest = serde_json::from_str(
            r#"{"firstName":"G","lastName":"H","position":"Dev","email":"g@x.io",
                "department":"Finance"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
        assert!(request.into_new_employee().password.is_none());
    }

    #[test]
    fn test_blank_names_are_rejected() {
        let request: CreateEmployeeRequest = serde_json::from_str(
            r#"{"firstName":"  ","lastName":" ","position":"Dev","email":"g@x.io",
                "department":"Finance","password":"secret1"}"#,
        )
        .unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("last_name"));
        assert!(!fields.contains_key("position"));

        let patch: UpdateEmployeeRequest =
            serde_json::from_str(r#"{"lastName":"   ","department":""}"#).unwrap();
        let errors = patch.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("last_name"));
        assert!(!errors.field_errors().contains_key("department"));
    }

    #[test]
    fn test_page_response() {
        let page = Page {
            items: vec![view()],
            total: 11,
        };
        let response = EmployeePageResponse::new(page, 1, 10);
        assert_eq!(response.total_pages, 2);
        assert!(!response.has_next);
        assert!(response.has_previous);
    }
}
