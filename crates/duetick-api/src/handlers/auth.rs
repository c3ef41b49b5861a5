//! Registration, login, token refresh, and current-user handlers.

use axum::Json;
use axum::extract::State;

use duetick_service::auth::{LoginRequest, RegisterRequest};

use crate::dto::request::RefreshRequest;
use crate::dto::response::{ApiResponse, LoginResponse, TokenResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let (user, tokens) = state.auth_service.register(req).await?;
    Ok(Json(ApiResponse::ok(LoginResponse::new(user, tokens))))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let (user, tokens) = state.auth_service.login(req).await?;
    Ok(Json(ApiResponse::ok(LoginResponse::new(user, tokens))))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let tokens = state.auth_service.refresh(&req.refresh_token).await?;
    Ok(Json(ApiResponse::ok(tokens.into())))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let profile = state.user_service.get_profile(user.user_id).await?;
    Ok(Json(ApiResponse::ok(profile.into())))
}
