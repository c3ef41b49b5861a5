//! # duetick-service
//!
//! Business logic service layer for Duetick. Each service orchestrates
//! repositories and authentication components to implement application
//! use cases.
//!
//! Services follow constructor injection; all dependencies are provided
//! at construction time via `Arc` references.

pub mod auth;
pub mod reminder;
pub mod user;

pub use auth::AuthService;
pub use reminder::ReminderService;
pub use user::UserService;
