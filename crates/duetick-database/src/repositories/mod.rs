//! Repository implementations for all Duetick entities.

pub mod reminder;
pub mod user;

pub use reminder::ReminderRepository;
pub use user::UserRepository;
