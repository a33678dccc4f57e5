//! One-time `env_logger` setup for the lesson binaries. Library code only
//! uses the `log` macros.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
