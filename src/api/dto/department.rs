//! Department request/response DTOs and the response envelope used by the
//! department endpoints.

use bigdecimal::BigDecimal;
use jiff::civil::DateTime;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::PageMeta;
use crate::models::User;
use crate::services::{DepartmentInput, DepartmentView};
use crate::utils::validate::not_blank;

/// Request body for creating or replacing a department.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentRequest {
    #[validate(
        length(max = 100, message = "Department name must not exceed 100 characters"),
        custom(function = "not_blank", message = "Department name is required")
    )]
    #[schema(example = "Engineering & Technology", min_length = 1)]
    pub name: String,

    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,

    /// Id of the managing user; not checked for existence
    pub manager_id: Option<i32>,

    #[schema(value_type = Option<f64>, example = 250000.00)]
    pub budget: Option<BigDecimal>,

    #[validate(length(max = 200, message = "Location must not exceed 200 characters"))]
    pub location: Option<String>,

    /// `YYYY-MM-DD` or ISO date-time
    #[schema(example = "2020-03-01")]
    pub established_date: Option<String>,

    #[validate(length(max = 50, message = "Icon color must not exceed 50 characters"))]
    #[schema(example = "#3b82f6")]
    pub icon_color: Option<String>,

    /// Defaults to true
    pub is_active: Option<bool>,
}

impl DepartmentRequest {
    pub fn into_input(self) -> DepartmentInput {
        DepartmentInput {
            name: self.name,
            description: self.description,
            manager_id: self.manager_id,
            budget: self.budget,
            location: self.location,
            established_date: self.established_date,
            icon_color: self.icon_color,
            is_active: self.is_active,
        }
    }
}

/// Manager summary embedded in a department.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagerInfo {
    pub id: i32,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    pub email: String,
    pub avatar_url: String,
}

impl From<User> for ManagerInfo {
    fn from(user: User) -> Self {
        Self {
            name: user.full_name(),
            avatar_url: user.avatar(),
            id: user.id,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub manager_id: Option<i32>,
    pub manager: Option<ManagerInfo>,
    #[schema(value_type = Option<f64>)]
    pub budget: Option<BigDecimal>,
    pub location: Option<String>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub established_date: Option<DateTime>,
    pub icon_color: Option<String>,
    pub is_active: bool,
    /// Employees currently assigned
    pub employee_count: i64,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime,
}

impl From<DepartmentView> for DepartmentResponse {
    fn from(view: DepartmentView) -> Self {
        let department = view.department;
        Self {
            id: department.id,
            name: department.name,
            description: department.description,
            manager_id: department.manager_id,
            manager: view.manager.map(ManagerInfo::from),
            budget: department.budget,
            location: department.location,
            established_date: department.established_date.map(|d| d.to_jiff()),
            icon_color: department.icon_color,
            is_active: department.is_active,
            employee_count: view.employee_count,
            created_at: department.created_at.to_jiff(),
            updated_at: department.updated_at.to_jiff(),
        }
    }
}

/// `{success, message, data, meta?, timestamp}` envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: Timestamp,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: Some(data),
            meta: None,
            timestamp: Timestamp::now(),
        }
    }

    pub fn with_meta(mut self, meta: PageMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl ApiResponse<()> {
    /// Success without a payload.
    pub fn message(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: None,
            meta: None,
            timestamp: Timestamp::now(),
        }
    }
}
