//! Prints a launched server's output.

use spt_core::{OutputStream, ServerOutputSink};

/// Echoes server stdout to stdout and server stderr to stderr.
#[derive(Debug, Default)]
pub struct TerminalServerOutput;

impl ServerOutputSink for TerminalServerOutput {
    fn line(&self, stream: OutputStream, line: &str) {
        match stream {
            OutputStream::Stdout => println!("{line}"),
            OutputStream::Stderr => eprintln!("{line}"),
        }
    }
}
