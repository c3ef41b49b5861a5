mod service;

pub use service::{AuthService, LoginRequest, RegisterRequest};
