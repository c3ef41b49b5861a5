//! Reminder repository implementation.
//!
//! Besides CRUD, this repository is the reminder data gateway for the
//! notification worker: two candidate queries select reminders due for
//! an email, and two single-row conditional writes record that an email
//! went out so the same notification never fires twice.

use chrono::{DateTime, Duration, DurationRound, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use duetick_core::error::{AppError, ErrorKind};
use duetick_core::result::AppResult;
use duetick_core::types::{ReminderId, UserId};
use duetick_entity::notification::{NotificationCandidate, NotificationCategory};
use duetick_entity::reminder::{CreateReminder, Reminder, UpdateReminder};

/// Row shape produced by the look-ahead candidate query.
#[derive(Debug, sqlx::FromRow)]
struct CandidateRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: String,
    deadline: DateTime<Utc>,
}

/// Row shape produced by the notify-period candidate query. Carries the
/// stored array entry that triggered the row.
#[derive(Debug, sqlx::FromRow)]
struct DeadlineCandidateRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: String,
    deadline: DateTime<Utc>,
    fired_period: DateTime<Utc>,
}

/// Repository for reminder CRUD and notification-state operations.
#[derive(Debug, Clone)]
pub struct ReminderRepository {
    pool: PgPool,
}

impl ReminderRepository {
    /// Create a new reminder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new reminder.
    pub async fn create(&self, data: &CreateReminder) -> AppResult<Reminder> {
        sqlx::query_as::<_, Reminder>(
            "INSERT INTO reminders (user_id, title, description, deadline, deadline_notify_enabled, notify_periods) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(data.user_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.deadline)
        .bind(data.deadline_notify_enabled)
        .bind(&data.notify_periods)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create reminder", e))
    }

    /// Find a reminder owned by the given user.
    pub async fn find_owned(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Reminder>> {
        sqlx::query_as::<_, Reminder>("SELECT * FROM reminders WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find reminder", e))
    }

    /// List a user's reminders, earliest deadline first.
    pub async fn list_by_user(
        &self,
        user_id: Uuid,
        include_completed: bool,
    ) -> AppResult<Vec<Reminder>> {
        sqlx::query_as::<_, Reminder>(
            "SELECT * FROM reminders WHERE user_id = $1 AND ($2 OR completed = FALSE) \
             ORDER BY deadline ASC",
        )
        .bind(user_id)
        .bind(include_completed)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list reminders", e))
    }

    /// Update a reminder's fields. `None` values are left unchanged.
    pub async fn update(&self, user_id: Uuid, data: &UpdateReminder) -> AppResult<Reminder> {
        sqlx::query_as::<_, Reminder>(
            "UPDATE reminders SET title = COALESCE($3, title), \
                                  description = COALESCE($4, description), \
                                  deadline = COALESCE($5, deadline), \
                                  completed = COALESCE($6, completed), \
                                  deadline_notify_enabled = COALESCE($7, deadline_notify_enabled), \
                                  notify_periods = COALESCE($8, notify_periods), \
                                  updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(data.id)
        .bind(user_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.deadline)
        .bind(data.completed)
        .bind(data.deadline_notify_enabled)
        .bind(&data.notify_periods)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update reminder", e))?
        .ok_or_else(|| AppError::not_found(format!("Reminder {} not found", data.id)))
    }

    /// Mark a reminder as completed.
    pub async fn set_completed(&self, id: Uuid, user_id: Uuid) -> AppResult<Reminder> {
        sqlx::query_as::<_, Reminder>(
            "UPDATE reminders SET completed = TRUE, updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to complete reminder", e))?
        .ok_or_else(|| AppError::not_found(format!("Reminder {id} not found")))
    }

    /// Delete a reminder owned by the given user.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM reminders WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete reminder", e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    /// Select reminders due for a look-ahead email.
    ///
    /// A reminder qualifies when its deadline falls within the owning
    /// user's configured window of whole days before the deadline, it is
    /// not completed, the look-ahead email has not been sent yet, and the
    /// user has notifications enabled. The window is evaluated against
    /// each owner's own `notify_days_before`; overdue reminders stay
    /// eligible until notified or completed.
    pub async fn user_notification_candidates(
        &self,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<NotificationCandidate>> {
        let rows = sqlx::query_as::<_, CandidateRow>(
            "SELECT r.id, r.user_id, r.title, r.description, r.deadline \
             FROM reminders r \
             JOIN users u ON u.id = r.user_id \
             WHERE r.completed = FALSE \
               AND r.user_notified = FALSE \
               AND u.notify_enabled = TRUE \
               AND r.deadline <= $1 + make_interval(days => u.notify_days_before) \
             ORDER BY r.deadline ASC",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to fetch user candidates", e)
        })?;

        Ok(rows
            .into_iter()
            .map(|row| NotificationCandidate {
                reminder_id: ReminderId::from_uuid(row.id),
                user_id: UserId::from_uuid(row.user_id),
                title: row.title,
                description: row.description,
                deadline: row.deadline,
                category: NotificationCategory::UserMessage,
                fired_period: None,
            })
            .collect())
    }

    /// Select reminders with an elapsed pending notify-period entry.
    ///
    /// The boundary is `now` truncated to whole minutes, computed once
    /// here and returned to the caller; the write-back in
    /// [`ReminderRepository::remove_deadline_period_entry`] uses the stored
    /// entry carried on the candidate, never a recomputed clock value.
    /// One candidate is produced per (reminder, elapsed entry) pair.
    pub async fn deadline_notification_candidates(
        &self,
        now: DateTime<Utc>,
    ) -> AppResult<(Vec<NotificationCandidate>, DateTime<Utc>)> {
        let boundary = now
            .duration_trunc(Duration::minutes(1))
            .map_err(|e| AppError::internal(format!("Failed to truncate boundary: {e}")))?;

        let rows = sqlx::query_as::<_, DeadlineCandidateRow>(
            "SELECT r.id, r.user_id, r.title, r.description, r.deadline, p.period AS fired_period \
             FROM reminders r \
             CROSS JOIN LATERAL unnest(r.notify_periods) AS p(period) \
             WHERE r.completed = FALSE \
               AND r.deadline_notify_enabled = TRUE \
               AND p.period <= $1 \
             ORDER BY r.deadline ASC",
        )
        .bind(boundary)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to fetch deadline candidates", e)
        })?;

        let candidates = rows
            .into_iter()
            .map(|row| NotificationCandidate {
                reminder_id: ReminderId::from_uuid(row.id),
                user_id: UserId::from_uuid(row.user_id),
                title: row.title,
                description: row.description,
                deadline: row.deadline,
                category: NotificationCategory::DeadlineMessage,
                fired_period: Some(row.fired_period),
            })
            .collect();

        Ok((candidates, boundary))
    }

    /// Record that the look-ahead email for a reminder went out.
    ///
    /// Returns a not-found error when the reminder was deleted
    /// concurrently; the caller logs and moves on.
    pub async fn mark_user_notified(&self, reminder_id: Uuid) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE reminders SET user_notified = TRUE, updated_at = NOW() WHERE id = $1")
                .bind(reminder_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to mark notified", e)
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Reminder {reminder_id} not found"
            )));
        }
        Ok(())
    }

    /// Remove a fired notify-period entry from a reminder's pending list.
    ///
    /// `fired` must be the stored entry value carried on the candidate;
    /// only that timestamp is removed.
    pub async fn remove_deadline_period_entry(
        &self,
        reminder_id: Uuid,
        fired: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE reminders SET notify_periods = array_remove(notify_periods, $2), \
                                  updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(reminder_id)
        .bind(fired)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to remove period entry", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Reminder {reminder_id} not found"
            )));
        }
        Ok(())
    }
}
