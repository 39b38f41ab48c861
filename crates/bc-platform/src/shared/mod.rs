//! Shared infrastructure: error types and flash messages.

pub mod error;
pub mod flash;
