//! Quanta CLI internals: argument parsing, command handlers and output
//! rendering, kept out of `main.rs` so integration tests can drive them.

pub mod args;
pub mod commands;
pub mod output;

pub use commands::Session;
pub use output::OutputFormat;
