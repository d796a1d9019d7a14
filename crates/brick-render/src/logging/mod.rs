//! Logging setup.
//!
//! Everything in this workspace logs through the `log` facade; this module only
//! wires up `env_logger` for binaries.

mod init;

pub use init::{init_logging, LoggingConfig};
