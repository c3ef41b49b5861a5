mod service;

pub use service::{CreateReminderRequest, ReminderService, UpdateReminderRequest};
