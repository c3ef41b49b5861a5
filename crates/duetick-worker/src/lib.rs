//! Background notification worker for Duetick.
//!
//! This crate provides:
//! - A runner that polls the reminder store on a fixed interval
//! - A dispatcher that fans candidate emails out to a bounded send pool
//! - Gateway traits decoupling the worker from the concrete repositories
//!
//! Every poll cycle fetches two candidate categories, resolves each
//! candidate's recipient, sends the emails through the pool, and records
//! successful sends back in the store so the same email is not produced
//! again. Failures never stop the cycle; they are logged and the
//! candidate stays pending for a later cycle.

pub mod dispatcher;
pub mod error;
pub mod gateway;
pub mod job;
pub mod runner;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatcher::{CycleStats, EmailDispatcher};
pub use error::DispatchError;
pub use gateway::{ReminderGateway, UserDirectory};
pub use runner::NotifierRunner;
