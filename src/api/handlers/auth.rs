//! Authentication handlers for login, registration and token refresh.

use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::AUTH_TAG;
use crate::api::dto::{AuthResponse, LoginRequest, RefreshTokenRequest, RegisterRequest};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Creates the authentication routes
///
/// # Routes
/// - `POST /login` - Authenticate user and get tokens
/// - `POST /register` - Register new user and get tokens
/// - `POST /refresh` - Exchange a refresh token for a new pair
pub fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(login))
        .routes(routes!(register))
        .routes(routes!(refresh_token))
}

/// POST /api/auth/login - Authenticate user
#[utoipa::path(
    post,
    path = "/login",
    tag = AUTH_TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Malformed request", body = crate::api::dto::ErrorResponse),
        (status = 401, description = "Invalid credentials or inactive account", body = crate::api::dto::ErrorResponse)
    )
)]
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let session = state
        .services
        .auth
        .login(&payload.email, &payload.password)
        .await?;
    Ok(Json(session.into()))
}

/// POST /api/auth/register - Register new user
///
/// Creates an `EMPLOYEE` account and returns tokens for it.
#[utoipa::path(
    post,
    path = "/register",
    tag = AUTH_TAG,
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Invalid request data", body = crate::api::dto::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::api::dto::ErrorResponse)
    )
)]
async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    let session = state
        .services
        .auth
        .register(payload.into_registration())
        .await?;
    Ok(Json(session.into()))
}

/// POST /api/auth/refresh - Refresh access token
#[utoipa::path(
    post,
    path = "/refresh",
    tag = AUTH_TAG,
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Tokens refreshed successfully", body = AuthResponse),
        (status = 401, description = "Invalid or expired refresh token", body = crate::api::dto::ErrorResponse)
    )
)]
async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshTokenRequest>,
) -> AppResult<Json<AuthResponse>> {
    let session = state
        .services
        .auth
        .refresh(&payload.refresh_token)
        .await?;
    Ok(Json(session.into()))
}
