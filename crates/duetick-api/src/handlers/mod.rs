//! HTTP request handlers, organized by domain.

pub mod auth;
pub mod health;
pub mod oauth;
pub mod reminder;
pub mod user;
