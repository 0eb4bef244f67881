use bigdecimal::BigDecimal;
use diesel::prelude::*;
use jiff_diesel::DateTime;

/// Department model for reading from database
#[derive(Debug, Queryable, Selectable, Identifiable, Clone)]
#[diesel(table_name = crate::schema::departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Department {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Informal reference to `users.id`; may point at a user that no longer exists
    pub manager_id: Option<i32>,
    pub budget: Option<BigDecimal>,
    pub location: Option<String>,
    pub established_date: Option<DateTime>,
    pub icon_color: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Department {
    /// Case-insensitive name comparison used for uniqueness checks.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

/// NewDepartment model for inserting new records
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::departments)]
pub struct NewDepartment {
    pub name: String,
    pub description: Option<String>,
    pub manager_id: Option<i32>,
    pub budget: Option<BigDecimal>,
    pub location: Option<String>,
    pub established_date: Option<DateTime>,
    pub icon_color: Option<String>,
    pub is_active: bool,
}

/// Full replacement of the editable department columns.
///
/// Unlike [`super::UpdateUser`], `None` clears the column.
#[derive(Debug, AsChangeset, Clone)]
#[diesel(table_name = crate::schema::departments)]
#[diesel(treat_none_as_null = true)]
pub struct DepartmentChanges {
    pub name: String,
    pub description: Option<String>,
    pub manager_id: Option<i32>,
    pub budget: Option<BigDecimal>,
    pub location: Option<String>,
    pub established_date: Option<DateTime>,
    pub icon_color: Option<String>,
    pub is_active: bool,
    pub updated_at: DateTime,
}
