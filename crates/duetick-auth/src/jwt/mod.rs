//! JWT token handling.
//!
//! Tokens are stateless HS256 JWTs. An access token authorizes API calls
//! for a short window; a refresh token may only be exchanged for a new
//! token pair. Validation checks signature, expiry and token type.

mod claims;
mod decoder;
mod encoder;

pub use claims::{Claims, TokenType};
pub use decoder::JwtDecoder;
pub use encoder::{JwtEncoder, TokenPair};
