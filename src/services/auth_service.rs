//! Authentication service: credential checks, registration and token issue.

use std::sync::Arc;

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, Role, User};
use crate::repositories::UserStore;
use crate::utils::jwt::{
    Claims, TokenPair, generate_token_pair, validate_access_token, validate_refresh_token,
};
use crate::utils::password::{hash_password, verify_password};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// A user together with a freshly issued token pair.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub tokens: TokenPair,
}

/// Self-service account creation input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt: JwtConfig) -> Self {
        Self { users, jwt }
    }

    /// Verifies the credential and issues tokens.
    ///
    /// Unknown email and wrong password fail with the same message; an
    /// inactive account fails even with the right password.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

        if !verify_password(password, &user.password)? {
            tracing::info!(email = %user.email, "Login rejected: wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        if !user.is_active {
            tracing::info!(user_id = user.id, "Login rejected: account inactive");
            return Err(AppError::unauthorized("Account is disabled"));
        }

        tracing::info!(user_id = user.id, role = %user.role, "User logged in");
        self.issue(user)
    }

    /// Creates an `EMPLOYEE` account and logs it in.
    pub async fn register(&self, registration: Registration) -> AppResult<AuthSession> {
        let email = registration.email.trim().to_string();
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::duplicate("user", "email", email));
        }

        let new_user = NewUser {
            email,
            password: hash_password(&registration.password)?,
            first_name: registration.first_name.trim().to_string(),
            last_name: registration.last_name.trim().to_string(),
            role: Role::Employee,
            is_active: true,
            position: None,
            department_id: None,
            phone_number: None,
            hire_date: None,
            avatar_url: None,
            profile: None,
        };
        let user = self.users.create(new_user).await?;

        tracing::info!(user_id = user.id, email = %user.email, "User registered");
        self.issue(user)
    }

    /// Exchanges a refresh token for a new pair, re-reading the user so that
    /// deleted or deactivated accounts cannot keep refreshing.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthSession> {
        let claims = validate_refresh_token(refresh_token, &self.jwt.secret)?;
        let user = self
            .users
            .find_by_id(claims.user_id()?)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::unauthorized("User no longer exists or is inactive"))?;

        self.issue(user)
    }

    /// Resolves a bearer access token to its claims.
    pub fn authenticate(&self, access_token: &str) -> AppResult<Claims> {
        validate_access_token(access_token, &self.jwt.secret)
    }

    pub async fn current_user(&self, user_id: i32) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("user", "id", user_id))
    }

    /// Creates the first `ADMIN` account unless one already exists.
    ///
    /// Returns the created user, or `None` when an admin was already present.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> AppResult<Option<User>> {
        if self.users.exists_with_role(Role::Admin).await? {
            return Ok(None);
        }

        let admin = self
            .users
            .create(NewUser {
                email: email.trim().to_string(),
                password: hash_password(password)?,
                first_name: "Admin".to_string(),
                last_name: "User".to_string(),
                role: Role::Admin,
                is_active: true,
                position: None,
                department_id: None,
                phone_number: None,
                hire_date: None,
                avatar_url: None,
                profile: None,
            })
            .await?;

        tracing::info!(user_id = admin.id, email = %admin.email, "Bootstrap admin created");
        Ok(Some(admin))
    }

    fn issue(&self, user: User) -> AppResult<AuthSession> {
        let tokens = generate_token_pair(
            &user,
            &self.jwt.secret,
            self.jwt.access_token_expiration,
            self.jwt.refresh_token_expiration,
        )?;
        Ok(AuthSession { user, tokens })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;

    fn service() -> (AuthService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let jwt = JwtConfig {
            secret: "unit-test-secret-that-is-at-least-32-chars".to_string(),
            access_token_expiration: 1,
            refresh_token_expiration: 24,
        };
        (AuthService::new(store.clone(), jwt), store)
    }

    fn registration(email: &str) -> Registration {
        Registration {
            email: email.to_string(),
            password: "secret1".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_duplicate_conflicts() {
        let (auth, store) = service();

        let session = auth.register(registration("a@b.com")).await.unwrap();
        assert_eq!(session.user.role, Role::Employee);
        assert!(!session.tokens.access_token.is_empty());

        let err = auth.register(registration("a@b.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Duplicate { .. }));
        assert_eq!(store.list_by_role(Role::Employee).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_login_token_matches_stored_identity() {
        let (auth, _) = service();
        let registered = auth.register(registration("a@b.com")).await.unwrap();

        let session = auth.login("a@b.com", "secret1").await.unwrap();
        let claims = validate_access_token(
            &session.tokens.access_token,
            "unit-test-secret-that-is-at-least-32-chars",
        )
        .unwrap();
        assert_eq!(claims.user_id().unwrap(), registered.user.id);
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.role, Role::Employee);
    }

    #[tokio::test]
    async fn test_login_failures_are_unauthorized() {
        let (auth, store) = service();
        let session = auth.register(registration("a@b.com")).await.unwrap();

        let unknown = auth.login("x@b.com", "secret1").await.unwrap_err();
        let wrong = auth.login("a@b.com", "secret2").await.unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());

        let mut changes = crate::models::UpdateUser::touch(crate::utils::time::now());
        changes.is_active = Some(false);
        store.update(session.user.id, changes).await.unwrap();
        assert!(matches!(
            auth.login("a@b.com", "secret1").await,
            Err(AppError::Unauthorized { .. })
        ));
        assert!(matches!(
            auth.refresh(&session.tokens.refresh_token).await,
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let (auth, _) = service();
        let session = auth.register(registration("a@b.com")).await.unwrap();

        assert!(auth.refresh(&session.tokens.refresh_token).await.is_ok());
        assert!(matches!(
            auth.refresh(&session.tokens.access_token).await,
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_ensure_admin_runs_once() {
        let (auth, _) = service();

        let admin = auth.ensure_admin("admin@x.io", "admin123").await.unwrap();
        assert_eq!(admin.map(|u| u.role), Some(Role::Admin));
        assert!(auth.ensure_admin("other@x.io", "admin123").await.unwrap().is_none());
    }
}
