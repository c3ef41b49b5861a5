//! # duetick-api
//!
//! HTTP API layer for Duetick built on Axum.
//!
//! This crate wires the domain services into REST endpoints:
//! - **Routes** (`router`) - URL structure, middleware layers
//! - **Handlers** (`handlers`) - request handling per domain
//! - **Extractors** (`extractors`) - bearer-token authentication
//! - **DTOs** (`dto`) - request/response body types
//! - **State** (`state`) - shared application state

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
