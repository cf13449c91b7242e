use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::{ApiError, AppState};
use super::types::{AuthResponse, LoginRequest, ProfileResponse, SignupRequest, UserDto};

/// Identity of an authenticated end user, inserted into request extensions
/// by [`require_user`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
}

/// Identity of an authenticated admin, inserted into request extensions by
/// [`require_admin`].
#[derive(Debug, Clone)]
pub struct AuthAdmin {
    pub id: i32,
    pub username: String,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Route layer for user endpoints. Missing or invalid tokens are rejected
/// with 401; a valid admin token on a user route is rejected with 403.
pub async fn require_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token =
        bearer_token(&headers).ok_or_else(|| ApiError::unauthorized("No token provided"))?;

    let claims = state
        .tokens
        .verify(token)
        .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

    if claims.is_admin {
        return Err(ApiError::forbidden("User access required"));
    }

    request.extensions_mut().insert(AuthUser {
        id: claims.id,
        email: claims.email.unwrap_or_default(),
    });

    Ok(next.run(request).await)
}

/// Route layer for admin endpoints. The audience check mirrors
/// [`require_user`]: a valid user token on an admin route is 403, not 401.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token =
        bearer_token(&headers).ok_or_else(|| ApiError::unauthorized("No token provided"))?;

    let claims = state
        .tokens
        .verify(token)
        .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

    if !claims.is_admin {
        return Err(ApiError::forbidden("Admin access required"));
    }

    request.extensions_mut().insert(AuthAdmin {
        id: claims.id,
        username: claims.username.unwrap_or_default(),
    });

    Ok(next.run(request).await)
}

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    if payload.name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
        || payload.confirm_password.is_empty()
    {
        return Err(ApiError::validation("All fields are required"));
    }
    if payload.password != payload.confirm_password {
        return Err(ApiError::validation("Passwords do not match"));
    }
    if payload.password.len() < 6 {
        return Err(ApiError::validation(
            "Password must be at least 6 characters",
        ));
    }

    let email = payload.email.trim().to_lowercase();

    if state.store.get_user_by_email(&email).await?.is_some() {
        return Err(ApiError::validation("Email already registered"));
    }

    let user = state
        .store
        .create_user(
            payload.name.trim(),
            &email,
            &payload.password,
            &state.config.auth,
        )
        .await?;

    let token = state
        .tokens
        .issue_user(user.id, &user.email)
        .map_err(|e| ApiError::internal(format!("Failed to issue token: {e}")))?;

    tracing::info!("New user registered: {}", user.email);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "User registered successfully".to_string(),
            token,
            user: UserDto::from(user),
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }

    let email = payload.email.trim().to_lowercase();

    let user = state
        .store
        .get_user_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let is_valid = state
        .store
        .verify_user_password(&email, &payload.password)
        .await?;

    if !is_valid {
        return Err(ApiError::validation("Invalid credentials"));
    }

    let token = state
        .tokens
        .issue_user(user.id, &user.email)
        .map_err(|e| ApiError::internal(format!("Failed to issue token: {e}")))?;

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        user: UserDto::from(user),
    }))
}

/// GET /api/auth/profile
pub async fn profile(
    State(state): State<Arc<AppState>>,
    axum::Extension(auth): axum::Extension<AuthUser>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = state
        .store
        .get_user_by_id(auth.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(ProfileResponse {
        success: true,
        user: UserDto::from(user),
    }))
}
