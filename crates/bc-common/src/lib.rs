//! BC Racing shared infrastructure.
//!
//! Currently just the logging bootstrap; every binary calls
//! [`logging::init_logging`] before doing anything else.

pub mod logging;
