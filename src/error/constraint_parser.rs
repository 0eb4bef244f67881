use std::sync::OnceLock;

use regex::Regex;

/// Extracts entity/field/value details from PostgreSQL constraint violations.
pub struct ConstraintParser;

struct Patterns {
    /// `Key (email)=(a@b.com)` or `Key (lower((name)::text))=(eng)`
    key_value: Regex,
    /// `column "email"`
    column: Regex,
    /// `table "users"` or `relation "users"`
    table: Regex,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| Patterns {
        key_value: Regex::new(r"Key \((.+)\)=\(([^)]*)\)").expect("valid key/value pattern"),
        column: Regex::new(r#"column "([^"]+)""#).expect("valid column pattern"),
        table: Regex::new(r#"(?:table|relation) "([^"]+)""#).expect("valid table pattern"),
    })
}

/// Singular entity name for a table, as used in error messages.
fn entity_for_table(table: &str) -> String {
    match table {
        "users" => "user".to_string(),
        "departments" => "department".to_string(),
        other => other.trim_end_matches('s').to_string(),
    }
}

impl ConstraintParser {
    /// `(entity, field, value)` for a unique violation.
    ///
    /// Constraint names follow `<table>_<column>_key`, e.g. `users_email_key`
    /// or `departments_name_key` (the case-insensitive name index).
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let value = Self::extract_value(message).unwrap_or_else(|| "duplicate_value".to_string());

        if let Some((table, field)) = constraint_name.and_then(Self::split_constraint_name) {
            return Some((entity_for_table(&table), field, value));
        }

        let field = Self::extract_key_column(message)?;
        let entity = Self::extract_table(message)
            .map(|t| entity_for_table(&t))
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// `(entity, field)` for a not-null violation.
    pub fn parse_not_null_violation(message: &str) -> Option<(String, String)> {
        let field = Self::extract_column(message)?;
        let entity = Self::extract_table(message)
            .map(|t| entity_for_table(&t))
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// `(field, value)` for a foreign key violation such as
    /// `users_department_id_fkey`.
    pub fn parse_foreign_key_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        let value = Self::extract_value(message).unwrap_or_else(|| "invalid_reference".to_string());
        let field = constraint_name
            .and_then(|c| c.strip_suffix("_fkey"))
            .and_then(|c| c.split_once('_'))
            .map(|(_, field)| field.to_string())
            .or_else(|| Self::extract_key_column(message))?;
        Some((field, value))
    }

    /// `<table>_<column>_<suffix>` → `(table, column)`.
    ///
    /// Column names may contain underscores (`department_id`), so the first
    /// segment is the table and the last is the suffix.
    pub fn split_constraint_name(constraint_name: &str) -> Option<(String, String)> {
        let (table, rest) = constraint_name.split_once('_')?;
        let (column, _suffix) = rest.rsplit_once('_')?;
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some((table.to_string(), column.to_string()))
    }

    fn extract_value(message: &str) -> Option<String> {
        patterns()
            .key_value
            .captures(message)
            .and_then(|caps| caps.get(2))
            .map(|m| m.as_str().to_string())
    }

    /// Column inside `Key (...)`, unwrapping expressions like
    /// `lower((name)::text)`.
    fn extract_key_column(message: &str) -> Option<String> {
        let raw = patterns()
            .key_value
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())?;
        let column = raw
            .trim_start_matches("lower(")
            .trim_start_matches('(')
            .split(|c| c == ')' || c == ':')
            .next()
            .unwrap_or(raw);
        Some(column.to_string())
    }

    fn extract_column(message: &str) -> Option<String> {
        patterns()
            .column
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    fn extract_table(message: &str) -> Option<String> {
        patterns()
            .table
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}
