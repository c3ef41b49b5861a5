//! User domain entities.

pub mod model;
pub mod provider;
pub mod role;

pub use model::{CreateUser, NotificationSettings, Recipient, User};
pub use provider::OauthProvider;
pub use role::UserRole;
