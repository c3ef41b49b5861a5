//! Core type definitions used across the Duetick workspace.

pub mod id;

pub use id::*;
