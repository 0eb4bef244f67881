//! Paging and ordering parameters shared by the store backends.

/// Sort direction; anything other than `desc` (case-insensitive) is ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

/// Orderable employee columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmployeeSort {
    /// First name, then last name
    #[default]
    Name,
    Id,
    FirstName,
    LastName,
    Email,
    Position,
    HireDate,
    CreatedAt,
}

impl EmployeeSort {
    /// Maps an API `sortBy` key; a missing key means [`EmployeeSort::Name`],
    /// an unknown one falls back to [`EmployeeSort::Id`].
    pub fn parse(key: Option<&str>) -> Self {
        match key.map(str::trim) {
            None | Some("") | Some("name") => EmployeeSort::Name,
            Some("firstName") => EmployeeSort::FirstName,
            Some("lastName") => EmployeeSort::LastName,
            Some("email") => EmployeeSort::Email,
            Some("position") => EmployeeSort::Position,
            Some("hireDate") => EmployeeSort::HireDate,
            Some("createdAt") => EmployeeSort::CreatedAt,
            Some(_) => EmployeeSort::Id,
        }
    }
}

/// Orderable department columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepartmentSort {
    #[default]
    Name,
    Id,
    Location,
    Budget,
    EstablishedDate,
    CreatedAt,
}

impl DepartmentSort {
    /// Same fallback rules as [`EmployeeSort::parse`].
    pub fn parse(key: Option<&str>) -> Self {
        match key.map(str::trim) {
            None | Some("") | Some("name") => DepartmentSort::Name,
            Some("location") => DepartmentSort::Location,
            Some("budget") => DepartmentSort::Budget,
            Some("establishedDate") => DepartmentSort::EstablishedDate,
            Some("createdAt") => DepartmentSort::CreatedAt,
            Some(_) => DepartmentSort::Id,
        }
    }
}

/// One 0-based page of a sorted listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery<K> {
    pub page: i64,
    pub size: i64,
    pub sort: K,
    pub direction: SortDirection,
}

impl<K> PageQuery<K> {
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }
}

/// Rows of one page plus the total row count across all pages.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_fallbacks() {
        assert_eq!(EmployeeSort::parse(None), EmployeeSort::Name);
        assert_eq!(EmployeeSort::parse(Some("hireDate")), EmployeeSort::HireDate);
        assert_eq!(EmployeeSort::parse(Some("salary")), EmployeeSort::Id);
        assert_eq!(DepartmentSort::parse(Some("")), DepartmentSort::Name);
        assert_eq!(DepartmentSort::parse(Some("budget")), DepartmentSort::Budget);
        assert_eq!(DepartmentSort::parse(Some("employeeCount")), DepartmentSort::Id);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!(SortDirection::parse(Some("DESC")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("sideways")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(None), SortDirection::Asc);
    }

    #[test]
    fn test_offset() {
        let query = PageQuery {
            page: 3,
            size: 10,
            sort: EmployeeSort::Id,
            direction: SortDirection::Asc,
        };
        assert_eq!(query.offset(), 30);
    }
}
