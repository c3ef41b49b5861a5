//! Gateway traits between the worker and the data layer.
//!
//! The worker only needs four reminder operations and one user lookup.
//! Keeping them behind traits lets the dispatcher and runner be tested
//! against in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use duetick_core::types::{ReminderId, UserId};
use duetick_core::AppResult;
use duetick_database::repositories::reminder::ReminderRepository;
use duetick_database::repositories::user::UserRepository;
use duetick_entity::notification::NotificationCandidate;
use duetick_entity::user::Recipient;

/// Reminder-store operations used by the notification worker.
#[async_trait]
pub trait ReminderGateway: Send + Sync {
    /// Reminders inside their owner's look-ahead window, not yet notified.
    async fn user_notification_candidates(
        &self,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<NotificationCandidate>>;

    /// Reminders with an elapsed pending notify-period entry, together
    /// with the minute-truncated boundary the selection used.
    async fn deadline_notification_candidates(
        &self,
        now: DateTime<Utc>,
    ) -> AppResult<(Vec<NotificationCandidate>, DateTime<Utc>)>;

    /// Record that the look-ahead email for a reminder went out.
    async fn mark_user_notified(&self, reminder_id: ReminderId) -> AppResult<()>;

    /// Remove one fired entry from a reminder's pending notify periods.
    /// `fired_period` must be the stored value carried on the candidate.
    async fn remove_deadline_period_entry(
        &self,
        reminder_id: ReminderId,
        fired_period: DateTime<Utc>,
    ) -> AppResult<()>;
}

/// Recipient resolution, one lookup per candidate.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// `None` when the user was deleted after the candidate was fetched.
    async fn find_recipient(&self, user_id: UserId) -> AppResult<Option<Recipient>>;
}

#[async_trait]
impl ReminderGateway for ReminderRepository {
    async fn user_notification_candidates(
        &self,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<NotificationCandidate>> {
        ReminderRepository::user_notification_candidates(self, now).await
    }

    async fn deadline_notification_candidates(
        &self,
        now: DateTime<Utc>,
    ) -> AppResult<(Vec<NotificationCandidate>, DateTime<Utc>)> {
        ReminderRepository::deadline_notification_candidates(self, now).await
    }

    async fn mark_user_notified(&self, reminder_id: ReminderId) -> AppResult<()> {
        ReminderRepository::mark_user_notified(self, reminder_id.into_uuid()).await
    }

    async fn remove_deadline_period_entry(
        &self,
        reminder_id: ReminderId,
        fired_period: DateTime<Utc>,
    ) -> AppResult<()> {
        ReminderRepository::remove_deadline_period_entry(self, reminder_id.into_uuid(), fired_period)
            .await
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn find_recipient(&self, user_id: UserId) -> AppResult<Option<Recipient>> {
        UserRepository::find_recipient(self, user_id.into_uuid()).await
    }
}
