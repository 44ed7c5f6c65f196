//! Shared order relay primitives.
//!
//! This crate owns the event and record contracts, identifier generation,
//! the change-event to notification transform, and relay settings. It
//! intentionally excludes AWS SDK and Lambda runtime concerns.

pub mod config;
pub mod contract;
pub mod ids;
pub mod notification;
pub mod topology;
