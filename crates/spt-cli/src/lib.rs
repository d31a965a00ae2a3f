//! `sonic-pi-tool`: control a Sonic Pi server from the command line.
//!
//! The binary in `main.rs` is the composition root; everything it wires
//! together lives here so handlers can be tested without a process boundary.

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
