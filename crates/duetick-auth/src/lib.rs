//! # duetick-auth
//!
//! Authentication building blocks for the Duetick platform:
//!
//! - `jwt` - access/refresh token issuance and validation
//! - `password` - Argon2id password hashing and verification
//! - `oauth` - authorization-code flows for Google, GitHub and LinkedIn

pub mod jwt;
pub mod oauth;
pub mod password;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenPair, TokenType};
pub use oauth::{OAuthClient, OAuthUserInfo};
pub use password::{PasswordHasher, PasswordValidator};
