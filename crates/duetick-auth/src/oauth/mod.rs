//! OAuth 2.0 authorization-code flows.
//!
//! Each provider module knows its endpoints and profile shape; the
//! [`OAuthClient`] dispatches on the provider enum and normalizes every
//! profile into an [`OAuthUserInfo`].

mod client;
mod github;
mod google;
mod linkedin;

pub use client::{OAuthClient, OAuthUserInfo};
