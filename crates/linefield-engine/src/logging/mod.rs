//! Logging utilities.
//!
//! Centralizes logger initialization behind the `log` facade; diagnostics
//! elsewhere in the crate go through `log::warn!`/`info!`/`debug!`.

mod init;

pub use init::{init_logging, LoggingConfig};
