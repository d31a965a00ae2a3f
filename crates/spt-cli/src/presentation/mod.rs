//! Terminal presentation.
//!
//! Format-only: events arrive already rendered into styled spans, and this
//! module turns style descriptors into terminal escape codes.

mod log_printer;
mod server_output;
mod style;

pub use log_printer::TerminalLogPrinter;
pub use server_output::TerminalServerOutput;
pub use style::to_console_style;

use spt_osc::{PortResolution, PortSource};

/// Tell the user where the command port came from.
pub fn print_port_source(resolution: &PortResolution) {
    eprintln!("{}", describe_port_source(resolution));
}

pub fn describe_port_source(resolution: &PortResolution) -> String {
    match resolution.source {
        PortSource::Explicit => format!("Using command port of {}", resolution.port),
        PortSource::ServerLog => format!("Found command port in log: {}", resolution.port),
        PortSource::Fallback => format!(
            "Couldn't find command port in log, using {}",
            resolution.port
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_source_messages() {
        let msg = |port, source| describe_port_source(&PortResolution { port, source });
        assert_eq!(msg(4557, PortSource::Explicit), "Using command port of 4557");
        assert_eq!(msg(12345, PortSource::ServerLog), "Found command port in log: 12345");
        assert_eq!(
            msg(4557, PortSource::Fallback),
            "Couldn't find command port in log, using 4557"
        );
    }
}
