//! Core logic for the domain watch bot.
//!
//! This crate is framework-agnostic. Telegram and the remote status API live behind
//! ports (traits) implemented in adapter crates.

pub mod checker;
pub mod config;
pub mod cycle;
pub mod dispatcher;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod normalize;
pub mod pacing;
pub mod ports;
pub mod report;
pub mod scheduler;
pub mod status;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::{Error, Result};
