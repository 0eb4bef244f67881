use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{Role, User};

/// Token type enumeration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token for API authentication (short-lived)
    Access,
    /// Refresh token for obtaining new access tokens (long-lived)
    Refresh,
}

/// JWT claims: the identity a protected request runs as.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub token_type: TokenType,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration time (unix seconds)
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user
    ///
    /// # Arguments
    /// * `user_id` - The user's ID
    /// * `email` - The user's email
    /// * `role` - The user's role at issue time
    /// * `token_type` - The type of token (Access or Refresh)
    /// * `expiration_hours` - Token validity duration in hours
    pub fn new(
        user_id: i32,
        email: String,
        role: Role,
        token_type: TokenType,
        expiration_hours: i64,
    ) -> Self {
        let now = Timestamp::now();
        let exp = now.as_second() + SignedDuration::from_hours(expiration_hours).as_secs();

        Self {
            sub: user_id.to_string(),
            email,
            role,
            token_type,
            iat: now.as_second(),
            exp,
        }
    }

    /// The numeric user id carried in `sub`.
    pub fn user_id(&self) -> AppResult<i32> {
        self.sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }
}

/// Signed access/refresh tokens issued together on login, register and refresh.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Generates a JWT token
///
/// # Arguments
/// * `claims` - The claims to sign
/// * `secret` - The secret key for signing the token
///
/// # Returns
/// The encoded JWT token string
pub fn generate_token(claims: &Claims, secret: &str) -> AppResult<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
    })
}

/// Generates both access and refresh tokens for a user
///
/// # Arguments
/// * `user` - The user the tokens are issued to
/// * `secret` - The secret key for signing the tokens
/// * `access_expiration_hours` - Access token validity duration in hours
/// * `refresh_expiration_hours` - Refresh token validity duration in hours
pub fn generate_token_pair(
    user: &User,
    secret: &str,
    access_expiration_hours: i64,
    refresh_expiration_hours: i64,
) -> AppResult<TokenPair> {
    let access = Claims::new(
        user.id,
        user.email.clone(),
        user.role,
        TokenType::Access,
        access_expiration_hours,
    );
    let refresh = Claims::new(
        user.id,
        user.email.clone(),
        user.role,
        TokenType::Refresh,
        refresh_expiration_hours,
    );

    Ok(TokenPair {
        access_token: generate_token(&access, secret)?,
        refresh_token: generate_token(&refresh, secret)?,
    })
}

/// Validates and decodes a JWT token
///
/// # Arguments
/// * `token` - The JWT token string to validate
/// * `secret` - The secret key for verifying the token
/// * `expected_type` - Optional expected token type to validate against
///
/// # Returns
/// The decoded claims if the token is valid
pub fn validate_token(
    token: &str,
    secret: &str,
    expected_type: Option<TokenType>,
) -> AppResult<Claims> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::unauthorized("Token has expired")
        }
        jsonwebtoken::errors::ErrorKind::InvalidToken => AppError::unauthorized("Invalid token"),
        jsonwebtoken::errors::ErrorKind::InvalidSignature => {
            AppError::unauthorized("Invalid token signature")
        }
        _ => AppError::unauthorized(format!("Token validation failed: {}", e)),
    })?;

    if let Some(expected) = expected_type
        && claims.token_type != expected
    {
        return Err(AppError::unauthorized(format!(
            "Invalid token type: expected {:?}, got {:?}",
            expected, claims.token_type
        )));
    }

    Ok(claims)
}

pub fn validate_access_token(token: &str, secret: &str) -> AppResult<Claims> {
    validate_token(token, secret, Some(TokenType::Access))
}

pub fn validate_refresh_token(token: &str, secret: &str) -> AppResult<Claims> {
    validate_token(token, secret, Some(TokenType::Refresh))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::now;

    const TEST_SECRET: &str = "test_secret_key_for_jwt_testing_0123456789";

    fn manager() -> User {
        User {
            id: 7,
            email: "mia@example.com".to_string(),
            password: String::new(),
            first_name: "Mia".to_string(),
            last_name: "Wong".to_string(),
            role: Role::Manager,
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
    fn test_generate_token_pair_embeds_identity() {
        let pair = generate_token_pair(&manager(), TEST_SECRET, 1, 168).unwrap();
        assert_ne!(pair.access_token, pair.refresh_token);

        let claims = validate_access_token(&pair.access_token, TEST_SECRET).unwrap();
        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.email, "mia@example.com");
        assert_eq!(claims.role, Role::Manager);
        assert_eq!(claims.token_type, TokenType::Access);

        let claims = validate_refresh_token(&pair.refresh_token, TEST_SECRET).unwrap();
        assert_eq!(claims.token_type, TokenType::Refresh);
    }

    #[test]
    fn test_validate_wrong_token_type() {
        let pair = generate_token_pair(&manager(), TEST_SECRET, 1, 168).unwrap();

        match validate_refresh_token(&pair.access_token, TEST_SECRET) {
            Err(AppError::Unauthorized { message }) => {
                assert!(message.contains("Invalid token type"))
            }
            other => panic!("Expected Unauthorized error for wrong token type, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_token_invalid_secret() {
        let pair = generate_token_pair(&manager(), TEST_SECRET, 1, 168).unwrap();

        match validate_token(&pair.access_token, "another_secret_key_that_is_long_enough", None) {
            Err(AppError::Unauthorized { message }) => assert!(message.contains("signature")),
            other => panic!("Expected Unauthorized error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_token_invalid_format() {
        let result = validate_token("invalid.token.format", TEST_SECRET, None);
        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }

    #[test]
    fn test_expired_token() {
        let claims = Claims::new(
            1,
            "test@example.com".to_string(),
            Role::Employee,
            TokenType::Access,
            -1,
        );
        let token = generate_token(&claims, TEST_SECRET).unwrap();

        match validate_token(&token, TEST_SECRET, None) {
            Err(AppError::Unauthorized { message }) => assert!(message.contains("expired")),
            other => panic!("Expected Unauthorized error for expired token, got {:?}", other),
        }
    }

    #[test]
    fn test_claims_serialization() {
        let claims = Claims::new(
            42,
            "user@example.com".to_string(),
            Role::Admin,
            TokenType::Refresh,
            24,
        );
        assert!(claims.exp > claims.iat);

        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("\"token_type\":\"refresh\""));
        assert!(json.contains("\"role\":\"ADMIN\""));
    }

    #[test]
    fn test_non_numeric_subject_is_unauthorized() {
        let mut claims = Claims::new(
            1,
            "x@example.com".to_string(),
            Role::Employee,
            TokenType::Access,
            1,
        );
        claims.sub = "abc".to_string();
        assert!(matches!(claims.user_id(), Err(AppError::Unauthorized { .. })));
    }
}
