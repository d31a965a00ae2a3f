//! Server output sink port.
//!
//! Abstracts where the stdout/stderr lines of a launched server go: the CLI
//! prints them, tests collect them.

use std::fmt;

/// Which output stream of the child a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl OutputStream {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

impl fmt::Display for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Port for forwarding server output lines.
///
/// Called from tailer tasks; implementations must be thread-safe.
pub trait ServerOutputSink: Send + Sync {
    /// Forward one line (without trailing newline).
    fn line(&self, stream: OutputStream, line: &str);
}
