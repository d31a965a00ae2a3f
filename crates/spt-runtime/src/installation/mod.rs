//! Sonic Pi installation discovery.

mod locator;

pub use locator::{InstallationLocator, LocateError, default_patterns, fallback_interpreter, probe};
