//! HTTP API integration tests.

mod api_test;
mod helpers;
