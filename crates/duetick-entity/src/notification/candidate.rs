//! Notification candidate value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use duetick_core::types::{ReminderId, UserId};

use super::category::NotificationCategory;

/// A reminder selected for a notification email in the current poll cycle.
///
/// Candidates are materialized transiently from the reminder store on
/// every tick and discarded once the corresponding email job succeeds or
/// fails. The worker never mutates a candidate; it only issues a
/// state-mutation request back to the store after a successful send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCandidate {
    /// The reminder this candidate was built from.
    pub reminder_id: ReminderId,
    /// The user owning the reminder.
    pub user_id: UserId,
    /// Reminder title, used in the subject line.
    pub title: String,
    /// Reminder description, used in the body.
    pub description: String,
    /// The tracked deadline.
    pub deadline: DateTime<Utc>,
    /// Which notification path selected this candidate.
    pub category: NotificationCategory,
    /// For [`NotificationCategory::DeadlineMessage`]: the stored pending
    /// timestamp that triggered this candidate. Exactly this value is
    /// removed from the reminder's pending list after a successful send.
    pub fired_period: Option<DateTime<Utc>>,
}
