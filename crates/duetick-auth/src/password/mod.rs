//! Password hashing and policy validation.

mod hasher;
mod validator;

pub use hasher::PasswordHasher;
pub use validator::PasswordValidator;
