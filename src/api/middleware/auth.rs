//! JWT authentication middleware and capability guards.
//!
//! [`auth_middleware`] resolves the bearer token into an [`AuthUser`];
//! [`Require`] then checks the caller's role against the capability table
//! before the handler body runs.

use std::marker::PhantomData;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::Serialize;

use crate::error::AppError;
use crate::models::{Capability, Role};
use crate::state::AppState;
use crate::utils::jwt::{Claims, validate_access_token};

/// Extension type for authenticated user information
///
/// This is added to request extensions after successful authentication
/// and can be extracted directly in handlers.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn can(&self, capability: Capability) -> bool {
        self.role.can(capability)
    }
}

impl TryFrom<Claims> for AuthUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: claims.user_id()?,
            email: claims.email,
            role: claims.role,
        })
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

/// JWT authentication middleware
///
/// # Headers
/// Expects: `Authorization: Bearer <token>`
///
/// # Errors
/// Returns 401 Unauthorized if the header is missing or malformed, or the
/// token is expired, of the wrong type or signed with another key.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::unauthorized("Invalid authorization header format. Expected: Bearer <token>")
    })?;

    let claims = validate_access_token(token, &state.jwt_config.secret)?;
    let auth_user = AuthUser::try_from(claims)?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// A capability a route demands, named at the type level.
pub trait CapabilityRequirement {
    const CAPABILITY: Capability;
}

/// Extractor that admits the caller only when their role holds `C`.
///
/// ```ignore
/// async fn delete_employee(Require(caller, _): Require<can::ManageEmployees>) { .. }
/// ```
pub struct Require<C>(pub AuthUser, pub PhantomData<C>);

impl<C> Require<C> {
    pub fn user(&self) -> &AuthUser {
        &self.0
    }
}

impl<S, C> FromRequestParts<S> for Require<C>
where
    S: Send + Sync,
    C: CapabilityRequirement + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.can(C::CAPABILITY) {
            tracing::warn!(
                user_id = user.user_id,
                role = %user.role,
                capability = C::CAPABILITY.as_str(),
                "Access denied"
            );
            return Err(AppError::forbidden(format!(
                "Role {} lacks {}",
                user.role,
                C::CAPABILITY.as_str()
            )));
        }
        Ok(Require(user, PhantomData))
    }
}

/// Marker types for [`Require`], one per capability.
pub mod can {
    use super::CapabilityRequirement;
    use crate::models::Capability;

    macro_rules! requirements {
        ($($name:ident),* $(,)?) => {
            $(
                pub struct $name;

                impl CapabilityRequirement for $name {
                    const CAPABILITY: Capability = Capability::$name;
                }
            )*
        };
    }

    requirements!(
        AccessAdminPanel,
        AccessManagerPanel,
        AccessEmployeePanel,
        ManageEmployees,
        ViewEmployees,
        ViewDepartments,
        ManageDepartments,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jwt::TokenType;
    use axum::http::Request as HttpRequest;

    fn parts_with(user: Option<AuthUser>) -> Parts {
        let (mut parts, _) = HttpRequest::builder()
            .uri("/")
            .body(())
            .unwrap()
            .into_parts();
        if let Some(user) = user {
            parts.extensions.insert(user);
        }
        parts
    }

    fn user(role: Role) -> AuthUser {
        AuthUser {
            user_id: 7,
            email: "u@x.io".to_string(),
            role,
        }
    }

    #[test]
    fn test_auth_user_from_claims() {
        let claims = Claims::new(
            123,
            "test@example.com".to_string(),
            Role::Manager,
            TokenType::Access,
            1,
        );
        let auth_user = AuthUser::try_from(claims).unwrap();
        assert_eq!(auth_user.user_id, 123);
        assert_eq!(auth_user.email, "test@example.com");
        assert_eq!(auth_user.role, Role::Manager);
    }

    #[test]
    fn test_auth_user_rejects_non_numeric_subject() {
        let mut claims = Claims::new(
            1,
            "test@example.com".to_string(),
            Role::Admin,
            TokenType::Access,
            1,
        );
        claims.sub = "invalid".to_string();
        assert!(matches!(
            AuthUser::try_from(claims),
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_require_checks_capability() {
        let mut parts = parts_with(Some(user(Role::Manager)));
        assert!(
            Require::<can::ManageEmployees>::from_request_parts(&mut parts, &())
                .await
                .is_ok()
        );

        let mut parts = parts_with(Some(user(Role::Manager)));
        let denied = Require::<can::ManageDepartments>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(denied, Err(AppError::Forbidden { .. })));

        let mut parts = parts_with(None);
        let anonymous = Require::<can::ViewEmployees>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(anonymous, Err(AppError::Unauthorized { .. })));
    }
}
