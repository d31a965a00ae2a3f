//! `sysinfo`-backed process table.

use std::io;

use spt_core::{ProcessEntry, ProcessTablePort, TerminationSignal};
use sysinfo::{Pid, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System, UpdateKind};
use tracing::debug;

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{self, Signal};

/// Process table of the local machine.
pub struct SysinfoProcessTable {
    system: System,
}

impl Default for SysinfoProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoProcessTable {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }

    fn refresh_kind() -> ProcessRefreshKind {
        ProcessRefreshKind::nothing()
            .with_exe(UpdateKind::OnlyIfNotSet)
            .with_cmd(UpdateKind::OnlyIfNotSet)
    }
}

impl ProcessTablePort for SysinfoProcessTable {
    fn snapshot(&mut self) -> Vec<ProcessEntry> {
        self.system
            .refresh_processes_specifics(ProcessesToUpdate::All, true, Self::refresh_kind());

        self.system
            .processes()
            .iter()
            .map(|(pid, process)| ProcessEntry {
                pid: pid.as_u32(),
                exe: process.exe().map(ToOwned::to_owned),
                args: process
                    .cmd()
                    .iter()
                    .map(|arg| arg.to_string_lossy().into_owned())
                    .collect(),
            })
            .collect()
    }

    #[cfg(unix)]
    fn signal(&mut self, pid: u32, signal: TerminationSignal) -> io::Result<()> {
        let raw = i32::try_from(pid)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;
        let sig = match signal {
            TerminationSignal::Graceful => Signal::SIGTERM,
            TerminationSignal::Force => Signal::SIGKILL,
        };
        match signal::kill(nix::unistd::Pid::from_raw(raw), sig) {
            Ok(()) | Err(Errno::ESRCH) => Ok(()),
            Err(e) => Err(io::Error::other(e)),
        }
    }

    #[cfg(not(unix))]
    fn signal(&mut self, pid: u32, signal: TerminationSignal) -> io::Result<()> {
        let pid = Pid::from_u32(pid);
        self.system
            .refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        let Some(process) = self.system.process(pid) else {
            return Ok(());
        };
        let delivered = match signal {
            TerminationSignal::Graceful => process
                .kill_with(sysinfo::Signal::Term)
                .unwrap_or_else(|| process.kill()),
            TerminationSignal::Force => process.kill(),
        };
        if delivered {
            Ok(())
        } else {
            Err(io::Error::other(format!("could not signal process {pid}")))
        }
    }

    fn is_running(&mut self, pid: u32) -> bool {
        let pid = Pid::from_u32(pid);
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing(),
        );
        match self.system.process(pid) {
            Some(process) if process.status() == ProcessStatus::Zombie => {
                debug!(%pid, "Process is a zombie, treating as exited");
                false
            }
            Some(_) => true,
            None => false,
        }
    }
}
