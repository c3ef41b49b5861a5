//! Notification domain values built from reminders during a poll cycle.

pub mod candidate;
pub mod category;

pub use candidate::NotificationCandidate;
pub use category::NotificationCategory;
