//! Shared plumbing for Quanta tools
//!
//! - [`config`]: layered configuration (defaults, files, environment)
//! - [`logging`]: tracing subscriber setup

pub mod config;
pub mod logging;

pub use config::{load_config_from_file, QuantaConfig};
pub use logging::LoggingSettings;
