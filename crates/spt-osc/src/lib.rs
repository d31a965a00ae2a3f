//! OSC channels for talking to a Sonic Pi server.
//!
//! # Structure
//!
//! - [`CommandPortResolver`] - works out which port the server takes commands on
//! - [`ControlChannel`] - client-identified commands (`/run-code`, `/stop-all-jobs`, ...)
//! - [`CueChannel`] - arbitrary cues sent to running scripts
//! - [`LogRelay`] - receives and decodes the server's log events
//! - [`render_event`] - turns a log event into styled lines
//!
//! The wire codec is `rosc`; sockets are tokio UDP sockets.

mod client;
mod command_port;
mod control;
mod cue;
mod probe;
pub mod relay;

pub use client::{OscClient, OscError};
pub use command_port::{CommandPortResolver, PortResolution, PortSource, resolve_command_port};
pub use control::{ControlChannel, CueServerMode, preamble};
pub use cue::CueChannel;
pub use probe::port_in_use;
pub use relay::{
    LOG_RELAY_PORT, LogRelay, RelayError, RenderedLine, Span, decode_message, render_event,
};
