use diesel::prelude::*;
use jiff_diesel::DateTime;

use super::Role;

/// User model for reading from database.
///
/// One table holds admins, managers and employees; the employee-only
/// columns stay `None` for the other roles.
#[derive(Debug, Queryable, Selectable, Identifiable, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_active: bool,
    pub position: Option<String>,
    pub department_id: Option<i32>,
    pub phone_number: Option<String>,
    pub hire_date: Option<DateTime>,
    pub avatar_url: Option<String>,
    pub profile: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    /// Display name: "first last", whichever part is present, or the
    /// local part of the email when both are blank.
    pub fn full_name(&self) -> String {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        match (first.is_empty(), last.is_empty()) {
            (false, false) => format!("{} {}", first, last),
            (false, true) => first.to_string(),
            (true, false) => last.to_string(),
            (true, true) => self
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Stored avatar or a stable placeholder derived from the id.
    pub fn avatar(&self) -> String {
        match &self.avatar_url {
            Some(url) if !url.trim().is_empty() => url.clone(),
            _ => format!("https://i.pravatar.cc/40?img={}", self.id.rem_euclid(70) + 1),
        }
    }

    pub fn is_employee(&self) -> bool {
        self.role == Role::Employee
    }
}

/// NewUser model for inserting new records
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub email: String,
    /// Already hashed
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_active: bool,
    pub position: Option<String>,
    pub department_id: Option<i32>,
    pub phone_number: Option<String>,
    pub hire_date: Option<DateTime>,
    pub avatar_url: Option<String>,
    pub profile: Option<String>,
}

/// UpdateUser model for partial updates
/// `None` fields are left untouched; `updated_at` is always written.
/// `department_id: Some(None)` clears the department.
#[derive(Debug, AsChangeset, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub position: Option<String>,
    pub department_id: Option<Option<i32>>,
    pub phone_number: Option<String>,
    pub hire_date: Option<DateTime>,
    pub avatar_url: Option<String>,
    pub profile: Option<String>,
    pub updated_at: DateTime,
}

impl UpdateUser {
    /// A changeset that only bumps `updated_at`.
    pub fn touch(updated_at: DateTime) -> Self {
        Self {
            email: None,
            first_name: None,
            last_name: None,
            is_active: None,
            position: None,
            department_id: None,
            phone_number: None,
            hire_date: None,
            avatar_url: None,
            profile: None,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::now;

    fn user(first: &str, last: &str, email: &str) -> User {
        User {
            id: 69,
            email: email.to_string(),
            password: String::new(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            role: Role::Employee,
            is_active: true,
            position: None,
            department_id: None,
            phone_number: None,
            hire_date: None,
            avatar_url: None,
            profile: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn test_full_name_variants() {
        assert_eq!(user("Ada", "Lovelace", "a@x.io").full_name(), "Ada Lovelace");
        assert_eq!(user("Ada", "", "a@x.io").full_name(), "Ada");
        assert_eq!(user("", "Lovelace", "a@x.io").full_name(), "Lovelace");
        assert_eq!(user(" ", "", "ada.l@x.io").full_name(), "ada.l");
    }

    #[test]
    fn test_avatar_placeholder_wraps_at_seventy() {
        let mut u = user("Ada", "Lovelace", "a@x.io");
        assert_eq!(u.avatar(), "https://i.pravatar.cc/40?img=70");
        u.id = 70;
        assert_eq!(u.avatar(), "https://i.pravatar.cc/40?img=1");
        u.avatar_url = Some("https://cdn.example.com/a.png".to_string());
        assert_eq!(u.avatar(), "https://cdn.example.com/a.png");
    }
}
