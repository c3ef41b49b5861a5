//! User self-service operations: profile and notification settings.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use duetick_core::error::AppError;
use duetick_database::repositories::user::UserRepository;
use duetick_entity::user::{NotificationSettings, User};

/// Largest accepted look-ahead window, in days.
const MAX_NOTIFY_DAYS: i32 = 365;

/// Data for updating a user's own profile.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UpdateProfileRequest {
    /// New display name.
    pub display_name: Option<String>,
}

/// Handles user self-service operations.
#[derive(Debug, Clone)]
pub struct UserService {
    /// User repository.
    user_repo: Arc<UserRepository>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(user_repo: Arc<UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Gets the current user's full profile.
    pub async fn get_profile(&self, user_id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Updates the current user's profile fields.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<User, AppError> {
        let Some(display_name) = req.display_name else {
            return self.get_profile(user_id).await;
        };

        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(AppError::validation("Display name cannot be empty"));
        }

        let user = self
            .user_repo
            .update_display_name(user_id, display_name)
            .await?;

        info!(user_id = %user_id, "Profile updated");

        Ok(user)
    }

    /// Gets the current user's notification settings.
    pub async fn get_notification_settings(
        &self,
        user_id: Uuid,
    ) -> Result<NotificationSettings, AppError> {
        self.user_repo.get_notification_settings(user_id).await
    }

    /// Updates the look-ahead window and the notification switch.
    pub async fn update_notification_settings(
        &self,
        user_id: Uuid,
        settings: NotificationSettings,
    ) -> Result<User, AppError> {
        if !(0..=MAX_NOTIFY_DAYS).contains(&settings.notify_days_before) {
            return Err(AppError::validation(format!(
                "notify_days_before must be between 0 and {MAX_NOTIFY_DAYS}"
            )));
        }

        let user = self
            .user_repo
            .update_notification_settings(user_id, &settings)
            .await?;

        info!(
            user_id = %user_id,
            notify_enabled = settings.notify_enabled,
            notify_days_before = settings.notify_days_before,
            "Notification settings updated"
        );

        Ok(user)
    }

    /// Deletes the current user's account and, through the schema's
    /// cascade, all their reminders.
    pub async fn delete_account(&self, user_id: Uuid) -> Result<(), AppError> {
        let deleted = self.user_repo.delete(user_id).await?;
        if !deleted {
            return Err(AppError::not_found("User not found"));
        }

        info!(user_id = %user_id, "Account deleted");

        Ok(())
    }
}
