//! AWS-oriented adapters and handlers for the order relay pipeline.
//!
//! This crate owns runtime integration details (Lambda handlers, queue,
//! table and topic adapters, log setup). Contracts and the notification
//! transform live in `order_relay_core`.

pub mod adapters;
pub mod error;
pub mod handlers;
pub mod logging;
