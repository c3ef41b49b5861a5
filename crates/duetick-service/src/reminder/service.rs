//! Reminder CRUD operations, always scoped to the owning user.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use duetick_core::error::AppError;
use duetick_database::repositories::reminder::ReminderRepository;
use duetick_entity::reminder::{CreateReminder, Reminder, UpdateReminder};

const MAX_TITLE_LENGTH: usize = 200;
const MAX_NOTIFY_PERIODS: usize = 20;

/// Data for creating a reminder.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateReminderRequest {
    /// Short title, shown in email subjects.
    pub title: String,
    /// Free-form description (optional).
    #[serde(default)]
    pub description: String,
    /// The tracked deadline.
    pub deadline: DateTime<Utc>,
    /// Whether deadline emails are wanted at all.
    #[serde(default = "default_true")]
    pub deadline_notify_enabled: bool,
    /// Timestamps before the deadline at which a deadline email is due.
    #[serde(default)]
    pub notify_periods: Vec<DateTime<Utc>>,
}

/// Data for updating a reminder. `None` fields are left unchanged.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UpdateReminderRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
    pub deadline_notify_enabled: Option<bool>,
    pub notify_periods: Option<Vec<DateTime<Utc>>>,
}

fn default_true() -> bool {
    true
}

/// Handles reminder lifecycle operations.
#[derive(Debug, Clone)]
pub struct ReminderService {
    /// Reminder repository.
    reminder_repo: Arc<ReminderRepository>,
}

impl ReminderService {
    /// Creates a new reminder service.
    pub fn new(reminder_repo: Arc<ReminderRepository>) -> Self {
        Self { reminder_repo }
    }

    /// Creates a reminder owned by the given user.
    pub async fn create(
        &self,
        user_id: Uuid,
        req: CreateReminderRequest,
    ) -> Result<Reminder, AppError> {
        let title = validate_title(&req.title)?;
        validate_notify_periods(&req.notify_periods, req.deadline)?;

        let reminder = self
            .reminder_repo
            .create(&CreateReminder {
                user_id,
                title,
                description: req.description.trim().to_string(),
                deadline: req.deadline,
                deadline_notify_enabled: req.deadline_notify_enabled,
                notify_periods: req.notify_periods,
            })
            .await?;

        info!(reminder_id = %reminder.id, user_id = %user_id, "Reminder created");

        Ok(reminder)
    }

    /// Fetches a single reminder owned by the given user.
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Reminder, AppError> {
        self.reminder_repo
            .find_owned(id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Reminder {id} not found")))
    }

    /// Lists the user's reminders, optionally including completed ones.
    pub async fn list(
        &self,
        user_id: Uuid,
        include_completed: bool,
    ) -> Result<Vec<Reminder>, AppError> {
        self.reminder_repo
            .list_by_user(user_id, include_completed)
            .await
    }

    /// Applies a partial update to a reminder owned by the given user.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        req: UpdateReminderRequest,
    ) -> Result<Reminder, AppError> {
        let existing = self.get(user_id, id).await?;

        let title = match req.title {
            Some(title) => Some(validate_title(&title)?),
            None => None,
        };

        // Validate periods against whichever deadline will be in effect.
        let effective_deadline = req.deadline.unwrap_or(existing.deadline);
        let effective_periods = req
            .notify_periods
            .as_deref()
            .unwrap_or(&existing.notify_periods);
        validate_notify_periods(effective_periods, effective_deadline)?;

        let reminder = self
            .reminder_repo
            .update(
                user_id,
                &UpdateReminder {
                    id,
                    title,
                    description: req.description.map(|d| d.trim().to_string()),
                    deadline: req.deadline,
                    completed: req.completed,
                    deadline_notify_enabled: req.deadline_notify_enabled,
                    notify_periods: req.notify_periods,
                },
            )
            .await?;

        info!(reminder_id = %id, user_id = %user_id, "Reminder updated");

        Ok(reminder)
    }

    /// Marks a reminder completed. Completed reminders never produce
    /// notification emails.
    pub async fn complete(&self, user_id: Uuid, id: Uuid) -> Result<Reminder, AppError> {
        let reminder = self.reminder_repo.set_completed(id, user_id).await?;

        info!(reminder_id = %id, user_id = %user_id, "Reminder completed");

        Ok(reminder)
    }

    /// Deletes a reminder owned by the given user.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let deleted = self.reminder_repo.delete(id, user_id).await?;
        if !deleted {
            return Err(AppError::not_found(format!("Reminder {id} not found")));
        }

        info!(reminder_id = %id, user_id = %user_id, "Reminder deleted");

        Ok(())
    }
}

fn validate_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::validation("Title cannot be empty"));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::validation(format!(
            "Title cannot exceed {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(title.to_string())
}

fn validate_notify_periods(
    periods: &[DateTime<Utc>],
    deadline: DateTime<Utc>,
) -> Result<(), AppError> {
    if periods.len() > MAX_NOTIFY_PERIODS {
        return Err(AppError::validation(format!(
            "At most {MAX_NOTIFY_PERIODS} notify periods are allowed"
        )));
    }
    if periods.iter().any(|p| *p > deadline) {
        return Err(AppError::validation(
            "Notify periods must not be after the deadline",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_title_trimmed_and_required() {
        assert_eq!(validate_title("  Pay rent  ").unwrap(), "Pay rent");
        assert!(validate_title("   ").is_err());
    }

    #[test]
    fn test_overlong_title_rejected() {
        assert!(validate_title(&"x".repeat(MAX_TITLE_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_periods_after_deadline_rejected() {
        let deadline = Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap();
        let before = deadline - chrono::Duration::hours(2);
        let after = deadline + chrono::Duration::hours(2);

        assert!(validate_notify_periods(&[before], deadline).is_ok());
        assert!(validate_notify_periods(&[before, after], deadline).is_err());
        // A period exactly at the deadline is allowed.
        assert!(validate_notify_periods(&[deadline], deadline).is_ok());
    }

    #[test]
    fn test_too_many_periods_rejected() {
        let deadline = Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap();
        let periods: Vec<_> = (0..MAX_NOTIFY_PERIODS as i64 + 1)
            .map(|h| deadline - chrono::Duration::hours(h))
            .collect();
        assert!(validate_notify_periods(&periods, deadline).is_err());
    }
}
