//! Profile and notification-settings handlers.
//!
//! All routes operate on the authenticated caller; there is no
//! admin-style access to other accounts.

use axum::Json;
use axum::extract::State;

use duetick_entity::user::NotificationSettings;
use duetick_service::user::UpdateProfileRequest;

use crate::dto::response::{ApiResponse, MessageResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/users/me
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let profile = state.user_service.get_profile(user.user_id).await?;
    Ok(Json(ApiResponse::ok(profile.into())))
}

/// PUT /api/users/me
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let profile = state.user_service.update_profile(user.user_id, req).await?;
    Ok(Json(ApiResponse::ok(profile.into())))
}

/// GET /api/users/me/notifications
pub async fn get_notification_settings(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<NotificationSettings>>, ApiError> {
    let settings = state
        .user_service
        .get_notification_settings(user.user_id)
        .await?;
    Ok(Json(ApiResponse::ok(settings)))
}

/// PUT /api/users/me/notifications
pub async fn update_notification_settings(
    State(state): State<AppState>,
    user: AuthUser,
    Json(settings): Json<NotificationSettings>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let profile = state
        .user_service
        .update_notification_settings(user.user_id, settings)
        .await?;
    Ok(Json(ApiResponse::ok(profile.into())))
}

/// DELETE /api/users/me
pub async fn delete_account(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.user_service.delete_account(user.user_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Account deleted",
    ))))
}
