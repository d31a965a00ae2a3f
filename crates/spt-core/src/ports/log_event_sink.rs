//! Sink for events received by the log relay.

use crate::domain::LogEvent;

/// Receives log events one at a time, in arrival order.
///
/// The relay waits for `handle` to return before reading the next datagram,
/// so an implementation may write several lines without interleaving.
pub trait LogEventSink: Send {
    fn handle(&mut self, event: LogEvent);
}

impl<F> LogEventSink for F
where
    F: FnMut(LogEvent) + Send,
{
    fn handle(&mut self, event: LogEvent) {
        self(event);
    }
}
