//! Pagination-related DTOs for API requests and responses.
//!
//! Pages are 0-based on the wire.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::repositories::{DepartmentSort, EmployeeSort, PageQuery, SortDirection};

/// Query parameters for the paginated employee listing.
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EmployeePageParams {
    /// Page number (0-based)
    #[serde(default)]
    #[validate(range(min = 0, message = "Page must not be negative"))]
    #[param(minimum = 0, example = 0)]
    pub page: i64,

    /// Number of items per page (max 100)
    #[serde(default = "default_employee_page_size")]
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100, example = 10)]
    pub size: i64,

    /// `name`, `id`, `firstName`, `lastName`, `email`, `position`,
    /// `hireDate` or `createdAt`
    #[param(example = "name")]
    pub sort_by: Option<String>,

    /// `asc` or `desc`
    #[param(example = "asc")]
    pub sort_dir: Option<String>,
}

impl EmployeePageParams {
    pub fn to_query(&self) -> PageQuery<EmployeeSort> {
        PageQuery {
            page: self.page,
            size: self.size,
            sort: EmployeeSort::parse(self.sort_by.as_deref()),
            direction: SortDirection::parse(self.sort_dir.as_deref()),
        }
    }
}

/// Query parameters for the department listing.
///
/// A non-blank `search` wins; otherwise the listing is paged only when
/// `page > 0` or `size` differs from its default.
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DepartmentListParams {
    /// Page number (0-based)
    #[serde(default)]
    #[validate(range(min = 0, message = "Page must not be negative"))]
    #[param(minimum = 0, example = 0)]
    pub page: i64,

    #[serde(default = "default_department_page_size")]
    #[validate(range(min = 1, max = 500, message = "Page size must be between 1 and 500"))]
    #[param(minimum = 1, maximum = 500, example = 50)]
    pub size: i64,

    /// `name`, `id`, `location`, `budget`, `establishedDate` or `createdAt`
    #[param(example = "name")]
    pub sort_by: Option<String>,

    /// `asc` or `desc`
    pub sort_dir: Option<String>,

    /// Case-insensitive match on name or description
    pub search: Option<String>,
}

impl DepartmentListParams {
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn wants_page(&self) -> bool {
        self.page > 0 || self.size != default_department_page_size()
    }

    pub fn to_query(&self) -> PageQuery<DepartmentSort> {
        PageQuery {
            page: self.page,
            size: self.size,
            sort: DepartmentSort::parse(self.sort_by.as_deref()),
            direction: SortDirection::parse(self.sort_dir.as_deref()),
        }
    }
}

fn default_employee_page_size() -> i64 {
    10
}

fn default_department_page_size() -> i64 {
    50
}

/// Pagination metadata attached to paged envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Current page number (0-based)
    #[schema(example = 0)]
    pub current_page: i64,

    #[schema(example = 3)]
    pub total_pages: i64,

    /// Total number of items across all pages
    #[schema(example = 120)]
    pub total_elements: i64,

    /// Number of items per page
    #[schema(example = 50)]
    pub size: i64,

    #[schema(example = true)]
    pub has_next: bool,

    #[schema(example = false)]
    pub has_previous: bool,
}

impl PageMeta {
    pub fn new(page: i64, size: i64, total: i64) -> Self {
        let total_pages = if size > 0 { (total + size - 1) / size } else { 0 };
        Self {
            current_page: page,
            total_pages,
            total_elements: total,
            size,
            has_next: page + 1 < total_pages,
            has_previous: page > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_page_meta_edges() {
        let meta = PageMeta::new(0, 10, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_previous);

        let meta = PageMeta::new(1, 10, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_previous);

        let meta = PageMeta::new(2, 10, 25);
        assert!(!meta.has_next);
    }

    #[test]
    fn test_department_params_paging_rule() {
        let params: DepartmentListParams = serde_json::from_str("{}").unwrap();
        assert!(!params.wants_page());
        assert!(params.search_term().is_none());

        let params: DepartmentListParams =
            serde_json::from_str(r#"{"size": 10, "search": "  "}"#).unwrap();
        assert!(params.wants_page());
        assert!(params.search_term().is_none());

        let params: DepartmentListParams =
            serde_json::from_str(r#"{"page": 1, "sortBy": "budget", "sortDir": "DESC"}"#).unwrap();
        let query = params.to_query();
        assert_eq!(query.sort, DepartmentSort::Budget);
        assert_eq!(query.direction, SortDirection::Desc);
        assert_eq!(query.offset(), 50);
    }

    #[test]
    fn test_employee_params_defaults() {
        let params: EmployeePageParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, 0);
        assert_eq!(params.size, 10);
        assert_eq!(params.to_query().sort, EmployeeSort::Name);
    }

    proptest! {
        #[test]
        fn prop_page_meta_covers_total(total in 0i64..10_000, size in 1i64..200) {
            let meta = PageMeta::new(0, size, total);
            prop_assert!(meta.total_pages * size >= total);
            prop_assert!((meta.total_pages - 1).max(0) * size <= total);
        }
    }
}
