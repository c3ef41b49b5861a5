//! # duetick-database
//!
//! PostgreSQL database connection management and concrete repository
//! implementations for all Duetick entities.

pub mod connection;
pub mod migration;
pub mod repositories;
