//! Core domain types and port definitions for sonic-pi-tool.
//!
//! Nothing in this crate touches the network or spawns processes. Adapters
//! (`spt-osc`, `spt-runtime`) implement the ports declared in [`ports`] and
//! consume the domain types declared here.

pub mod domain;
pub mod paths;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    CLIENT_NAME, Color, Endpoint, Installation, LaunchSpec, LogEvent, MessagePart, PartKind,
    ShutdownOutcome, ShutdownReport, ShutdownRole, ShutdownTarget, StyleKind, TargetResult,
    TextStyle, Value, default_shutdown_targets,
};
pub use paths::{
    PathError, expand_home, server_output_log, server_stderr_log, server_stdout_log,
    sonic_pi_home,
};
pub use ports::{
    LogEventSink, OutputStream, ProcessEntry, ProcessTablePort, ServerOutputSink,
    TerminationSignal,
};
