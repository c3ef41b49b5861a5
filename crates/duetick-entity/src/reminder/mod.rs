//! Reminder domain entities.

pub mod model;

pub use model::{CreateReminder, Reminder, UpdateReminder};
