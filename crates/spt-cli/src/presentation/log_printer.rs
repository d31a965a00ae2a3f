//! Prints relayed log events to the terminal.

use console::Term;
use spt_core::{LogEvent, LogEventSink};
use spt_osc::{RenderedLine, render_event};
use tracing::debug;

use super::style::to_console_style;

/// [`LogEventSink`] that writes rendered events to stdout.
pub struct TerminalLogPrinter {
    term: Term,
}

impl Default for TerminalLogPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalLogPrinter {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

/// Apply styles to one rendered line.
pub fn format_line(line: &RenderedLine) -> String {
    line.spans
        .iter()
        .map(|span| to_console_style(span.style.style()).apply_to(&span.text).to_string())
        .collect()
}

impl LogEventSink for TerminalLogPrinter {
    fn handle(&mut self, event: LogEvent) {
        for line in render_event(&event) {
            if let Err(e) = self.term.write_line(&format_line(&line)) {
                debug!(error = %e, "Failed to write log line");
                return;
            }
        }
    }
}
