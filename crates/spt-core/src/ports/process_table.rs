//! Process table port.
//!
//! A platform-neutral view of running processes, enough to find Sonic Pi's
//! processes by executable path and arguments and to signal them.

use std::io;
use std::path::PathBuf;

/// A running process as seen in one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,
    /// Resolved executable path; `None` when it could not be read
    /// (permission denied, process exiting).
    pub exe: Option<PathBuf>,
    pub args: Vec<String>,
}

/// How hard to ask a process to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    /// SIGTERM or the platform equivalent.
    Graceful,
    /// SIGKILL or the platform equivalent.
    Force,
}

/// Port for enumerating and signalling OS processes.
pub trait ProcessTablePort: Send {
    /// Take a snapshot of all processes visible to this user.
    ///
    /// Processes that cannot be inspected are still listed, with `exe: None`.
    fn snapshot(&mut self) -> Vec<ProcessEntry>;

    /// Send a termination signal.
    ///
    /// A process that no longer exists is not an error.
    fn signal(&mut self, pid: u32, signal: TerminationSignal) -> io::Result<()>;

    /// Whether the process still exists (zombies count as gone).
    fn is_running(&mut self, pid: u32) -> bool;
}
