mod service;

pub use service::{UpdateProfileRequest, UserService};
