//! Notification category enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two kinds of reminder email Duetick sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// Look-ahead email: the deadline falls within the user's configured
    /// window of whole days. Sent at most once per reminder.
    UserMessage,
    /// Scheduled pre-deadline email: one of the reminder's pending
    /// notify-period timestamps has elapsed.
    DeadlineMessage,
}

impl NotificationCategory {
    /// Return the category as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserMessage => "user_message",
            Self::DeadlineMessage => "deadline_message",
        }
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationCategory {
    type Err = duetick_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user_message" => Ok(Self::UserMessage),
            "deadline_message" => Ok(Self::DeadlineMessage),
            _ => Err(duetick_core::AppError::validation(format!(
                "Invalid notification category: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        assert_eq!(NotificationCategory::UserMessage.to_string(), "user_message");
        assert_eq!(
            "deadline_message".parse::<NotificationCategory>().unwrap(),
            NotificationCategory::DeadlineMessage
        );
        assert!("push".parse::<NotificationCategory>().is_err());
    }
}
