//! Logging utilities.
//!
//! Centralizes logger initialization on the standard `log` facade.

mod init;

pub use init::init_logging;
