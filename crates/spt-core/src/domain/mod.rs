//! Domain types shared by every sonic-pi-tool adapter.

mod endpoint;
mod events;
mod installation;
mod shutdown;
mod style;
mod value;

pub use endpoint::{CLIENT_NAME, Endpoint};
pub use events::{LogEvent, MessagePart};
pub use installation::{Installation, LaunchSpec};
pub use shutdown::{
    ShutdownOutcome, ShutdownReport, ShutdownRole, ShutdownTarget, TargetResult,
    default_shutdown_targets,
};
pub use style::{Color, PartKind, StyleKind, TextStyle};
pub use value::Value;
