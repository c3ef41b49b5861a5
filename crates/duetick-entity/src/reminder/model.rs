//! Reminder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A reminder with a deadline, owned by a single user.
///
/// Notification state lives in two fields: `user_notified` is the
/// once-only flag for the look-ahead email, and `notify_periods` holds
/// the still-pending pre-deadline notification timestamps. A fired
/// period is removed from the array; it never fires twice.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reminder {
    /// Unique reminder identifier.
    pub id: Uuid,
    /// The user owning this reminder.
    pub user_id: Uuid,
    /// Short title shown in lists and email subjects.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// The deadline this reminder tracks.
    pub deadline: DateTime<Utc>,
    /// Whether the task has been completed.
    pub completed: bool,
    /// Whether the look-ahead email has already been sent.
    pub user_notified: bool,
    /// Whether pre-deadline notification emails are enabled.
    pub deadline_notify_enabled: bool,
    /// Pending pre-deadline notification timestamps.
    pub notify_periods: Vec<DateTime<Utc>>,
    /// When the reminder was created.
    pub created_at: DateTime<Utc>,
    /// When the reminder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Reminder {
    /// Check if the deadline has passed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.deadline < now
    }
}

/// Data required to create a new reminder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReminder {
    /// Owning user.
    pub user_id: Uuid,
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// The deadline.
    pub deadline: DateTime<Utc>,
    /// Whether pre-deadline notification emails are enabled.
    pub deadline_notify_enabled: bool,
    /// Pre-deadline notification timestamps to schedule.
    pub notify_periods: Vec<DateTime<Utc>>,
}

/// Data for updating an existing reminder.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReminder {
    /// The reminder ID to update.
    pub id: Uuid,
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// New completion state.
    pub completed: Option<bool>,
    /// New pre-deadline notification toggle.
    pub deadline_notify_enabled: Option<bool>,
    /// Replacement set of pending notification timestamps.
    pub notify_periods: Option<Vec<DateTime<Utc>>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_reminder(deadline: DateTime<Utc>, completed: bool) -> Reminder {
        Reminder {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "File quarterly report".to_string(),
            description: String::new(),
            deadline,
            completed,
            user_notified: false,
            deadline_notify_enabled: true,
            notify_periods: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_overdue() {
        let now = Utc::now();
        assert!(sample_reminder(now - Duration::hours(1), false).is_overdue(now));
        assert!(!sample_reminder(now + Duration::hours(1), false).is_overdue(now));
    }

    #[test]
    fn test_completed_never_overdue() {
        let now = Utc::now();
        assert!(!sample_reminder(now - Duration::hours(1), true).is_overdue(now));
    }
}
