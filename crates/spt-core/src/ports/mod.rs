//! Port definitions implemented by adapter crates.
//!
//! - [`LogEventSink`] receives decoded server log events (CLI renders them)
//! - [`ServerOutputSink`] receives raw stdout/stderr lines of a launched server
//! - [`ProcessTablePort`] enumerates and signals OS processes

mod log_event_sink;
mod process_table;
mod server_output_sink;

pub use log_event_sink::LogEventSink;
pub use process_table::{ProcessEntry, ProcessTablePort, TerminationSignal};
pub use server_output_sink::{OutputStream, ServerOutputSink};
