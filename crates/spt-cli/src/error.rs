//! CLI error type and exit code mapping.

use spt_core::PathError;
use spt_osc::{OscError, RelayError};
use spt_runtime::{LaunchError, LocateError};
use thiserror::Error;

/// Hint shown when the log port is taken.
const LOG_PORT_IN_USE_HINT: &str = "error: Unable to listen for Sonic Pi server logs, address
already in use. This may be because the Sonic Pi GUI is running and already
listening on the desired port. If the GUI is running this command cannot
function, try running just the Sonic Pi server.";

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Another process (usually the GUI) holds the log port.
    #[error("{}", LOG_PORT_IN_USE_HINT)]
    LogPortInUse,

    /// Sending to the server failed.
    #[error("Unexpected error: {0}\n\nPlease report this error to the sonic-pi-tool maintainers.")]
    Transport(#[from] OscError),

    /// The log relay failed for a reason other than a port conflict.
    #[error("Unexpected error: {0}\n\nPlease report this error to the sonic-pi-tool maintainers.")]
    Unexpected(String),

    /// Code could not be read from a file or stdin.
    #[error("{0:#}")]
    Input(anyhow::Error),

    /// No installation was found.
    #[error("I couldn't find the Sonic Pi server executable :(")]
    InstallationNotFound,

    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    /// Shutdown could not be attempted.
    #[error("Shutdown failed: {0}")]
    Shutdown(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Map error to exit code.
    ///
    /// Every failure exits with 1; 2 is reserved for `check` reporting a
    /// half-running server, which is not an error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl From<RelayError> for CliError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::AddressInUse { .. } => CliError::LogPortInUse,
            RelayError::Io(e) => CliError::Unexpected(e.to_string()),
        }
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        CliError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    #[test]
    fn address_in_use_maps_to_hint() {
        let addr: SocketAddr = "127.0.0.1:4558".parse().unwrap();
        let err = CliError::from(RelayError::AddressInUse { addr });
        assert!(matches!(err, CliError::LogPortInUse));
        assert!(err.to_string().contains("address\nalready in use"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn other_relay_errors_are_unexpected() {
        let err = CliError::from(RelayError::Io(std::io::Error::other("boom")));
        let text = err.to_string();
        assert!(text.starts_with("Unexpected error: boom"));
        assert!(text.contains("Please report this error"));
    }

    #[test]
    fn send_failures_ask_for_a_report() {
        let err = CliError::from(OscError::Resolve {
            host: "nowhere.invalid".into(),
        });
        let text = err.to_string();
        assert!(text.starts_with("Unexpected error: Could not resolve host nowhere.invalid"));
        assert!(text.ends_with("Please report this error to the sonic-pi-tool maintainers."));
        assert_eq!(err.exit_code(), 1);
    }
}
