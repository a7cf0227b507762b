//! Infrastructure shared by the `goinstant-sign` binary: command line and
//! environment configuration, and terminal logging.

pub mod config;
pub mod logging;
