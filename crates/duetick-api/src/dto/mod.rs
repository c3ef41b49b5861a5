//! Request and response body types for the HTTP API.

pub mod request;
pub mod response;
