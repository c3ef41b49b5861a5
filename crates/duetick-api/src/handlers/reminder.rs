//! Reminder CRUD handlers.
//!
//! Every route requires authentication; the service scopes each query
//! to the caller, so one user can never see or touch another's
//! reminders.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use duetick_entity::reminder::Reminder;
use duetick_service::reminder::{CreateReminderRequest, UpdateReminderRequest};

use crate::dto::request::ListRemindersQuery;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/reminders
pub async fn list_reminders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListRemindersQuery>,
) -> Result<Json<ApiResponse<Vec<Reminder>>>, ApiError> {
    let reminders = state
        .reminder_service
        .list(user.user_id, query.include_completed)
        .await?;
    Ok(Json(ApiResponse::ok(reminders)))
}

/// POST /api/reminders
pub async fn create_reminder(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateReminderRequest>,
) -> Result<Json<ApiResponse<Reminder>>, ApiError> {
    let reminder = state.reminder_service.create(user.user_id, req).await?;
    Ok(Json(ApiResponse::ok(reminder)))
}

/// GET /api/reminders/{id}
pub async fn get_reminder(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Reminder>>, ApiError> {
    let reminder = state.reminder_service.get(user.user_id, id).await?;
    Ok(Json(ApiResponse::ok(reminder)))
}

/// PUT /api/reminders/{id}
pub async fn update_reminder(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateReminderRequest>,
) -> Result<Json<ApiResponse<Reminder>>, ApiError> {
    let reminder = state.reminder_service.update(user.user_id, id, req).await?;
    Ok(Json(ApiResponse::ok(reminder)))
}

/// POST /api/reminders/{id}/complete
pub async fn complete_reminder(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Reminder>>, ApiError> {
    let reminder = state.reminder_service.complete(user.user_id, id).await?;
    Ok(Json(ApiResponse::ok(reminder)))
}

/// DELETE /api/reminders/{id}
pub async fn delete_reminder(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.reminder_service.delete(user.user_id, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Reminder deleted",
    ))))
}
