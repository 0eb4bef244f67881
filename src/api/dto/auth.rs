//! Authentication-related Data Transfer Objects

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Role;
use crate::services::{AuthSession, Registration};
use crate::utils::validate::not_blank;

/// Login request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    /// User's email address
    #[validate(email(message = "Email should be valid"))]
    #[schema(example = "user@example.com", format = "email")]
    pub email: String,
    /// User's password (plain text)
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "secret1", format = "password")]
    pub password: String,
}

/// Register request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// User's email address (unique)
    #[validate(email(message = "Email should be valid"))]
    #[schema(example = "user@example.com", format = "email")]
    pub email: String,
    /// User's password (plain text, will be hashed)
    #[validate(length(min = 6, max = 100, message = "Password must be at least 6 characters"))]
    #[schema(example = "secret1", format = "password", min_length = 6)]
    pub password: String,
    #[validate(
        length(max = 100, message = "First name must not exceed 100 characters"),
        custom(function = "not_blank", message = "First name is required")
    )]
    #[schema(example = "Ada", min_length = 1)]
    pub first_name: String,
    #[validate(
        length(max = 100, message = "Last name must not exceed 100 characters"),
        custom(function = "not_blank", message = "Last name is required")
    )]
    #[schema(example = "Lovelace", min_length = 1)]
    pub last_name: String,
}

impl RegisterRequest {
    pub fn into_registration(self) -> Registration {
        Registration {
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}

/// Refresh token request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token cannot be empty"))]
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub refresh_token: String,
}

/// Tokens plus the profile fields of the authenticated user.
///
/// Returned by login, register and refresh.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Access token (short-lived)
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub token: String,
    /// Refresh token (long-lived)
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub refresh_token: String,
    #[schema(example = "user@example.com")]
    pub email: String,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    pub role: Role,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.tokens.access_token,
            refresh_token: session.tokens.refresh_token,
            email: session.user.email,
            first_name: session.user.first_name,
            last_name: session.user.last_name,
            role: session.user.role,
        }
    }
}
