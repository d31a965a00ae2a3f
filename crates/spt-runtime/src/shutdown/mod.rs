//! Stopping a running Sonic Pi.

mod controller;
mod process_table;

pub use controller::{ShutdownController, ShutdownTimeouts};
pub use process_table::SysinfoProcessTable;
