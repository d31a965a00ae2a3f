//! Target matching and SIGTERM → SIGKILL escalation.

use std::time::Duration;

use spt_core::{
    ProcessEntry, ProcessTablePort, ShutdownReport, ShutdownTarget, TargetResult,
    TerminationSignal,
};
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

/// How long to wait at each escalation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownTimeouts {
    /// Wait after the graceful signal before escalating.
    pub graceful: Duration,
    /// Wait after the kill before giving up.
    pub force: Duration,
    /// Interval between liveness checks.
    pub poll: Duration,
}

impl Default for ShutdownTimeouts {
    fn default() -> Self {
        Self {
            graceful: Duration::from_secs(5),
            force: Duration::from_secs(2),
            poll: Duration::from_millis(100),
        }
    }
}

/// Stops the processes of a Sonic Pi installation.
///
/// Each target acts on its first matching process only; an installation is
/// assumed to run one of each.
pub struct ShutdownController<T: ProcessTablePort> {
    table: T,
    targets: Vec<ShutdownTarget>,
    timeouts: ShutdownTimeouts,
}

impl<T: ProcessTablePort> ShutdownController<T> {
    pub fn new(table: T, targets: Vec<ShutdownTarget>) -> Self {
        Self {
            table,
            targets,
            timeouts: ShutdownTimeouts::default(),
        }
    }

    #[must_use]
    pub fn with_timeouts(mut self, timeouts: ShutdownTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Stop every target in order and report what happened.
    ///
    /// The process table is read once up front. Stopping the GUI usually takes
    /// the server and its helpers down with it; a matched process that is
    /// already gone by the time we get to it counts as stopped.
    pub async fn shutdown(&mut self) -> ShutdownReport {
        let processes = self.table.snapshot();
        debug!(count = processes.len(), "Process snapshot taken");

        let mut report = ShutdownReport::default();
        for index in 0..self.targets.len() {
            let target = &self.targets[index];
            let result = match find_match(target, &processes) {
                Some(pid) => {
                    info!(target = %target.label, pid, "Stopping process");
                    let label = target.label.clone();
                    self.terminate(&label, pid).await
                }
                None => {
                    debug!(target = %target.label, "Not running");
                    TargetResult::NotRunning
                }
            };
            report.push(&self.targets[index], result);
        }

        info!(outcome = ?report.outcome(), "Shutdown finished");
        report
    }

    async fn terminate(&mut self, label: &str, pid: u32) -> TargetResult {
        if let Err(e) = self.table.signal(pid, TerminationSignal::Graceful) {
            warn!(target = %label, pid, error = %e, "Failed to signal process");
            return TargetResult::Failed {
                pid,
                reason: e.to_string(),
            };
        }
        if self.wait_gone(pid, self.timeouts.graceful).await {
            return TargetResult::Stopped { pid, forced: false };
        }

        warn!(target = %label, pid, "Process ignored termination, killing it");
        if let Err(e) = self.table.signal(pid, TerminationSignal::Force) {
            return TargetResult::Failed {
                pid,
                reason: e.to_string(),
            };
        }
        if self.wait_gone(pid, self.timeouts.force).await {
            return TargetResult::Stopped { pid, forced: true };
        }

        TargetResult::Failed {
            pid,
            reason: format!(
                "still running {}s after kill",
                self.timeouts.force.as_secs_f32()
            ),
        }
    }

    async fn wait_gone(&mut self, pid: u32, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        loop {
            if !self.table.is_running(pid) {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            sleep(self.timeouts.poll).await;
        }
    }
}

/// First process whose executable (and, if required, an argument) matches.
///
/// Processes with an unreadable executable never match.
fn find_match(target: &ShutdownTarget, processes: &[ProcessEntry]) -> Option<u32> {
    processes.iter().find_map(|entry| {
        let exe = entry.exe.as_deref()?;
        target.matches(exe, &entry.args).then_some(entry.pid)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use spt_core::{ShutdownOutcome, default_shutdown_targets};
    use std::collections::{HashMap, HashSet};
    use std::io;
    use std::path::PathBuf;

    /// How a fake process reacts to signals.
    #[derive(Clone, Copy)]
    enum Reaction {
        DiesOnTerm,
        DiesOnKill,
        Immortal,
    }

    #[derive(Default)]
    struct FakeTable {
        processes: Vec<ProcessEntry>,
        reactions: HashMap<u32, Reaction>,
        alive: HashSet<u32>,
        signals: Vec<(u32, TerminationSignal)>,
    }

    impl FakeTable {
        fn with(mut self, pid: u32, exe: Option<&str>, args: &[&str], reaction: Reaction) -> Self {
            self.processes.push(ProcessEntry {
                pid,
                exe: exe.map(PathBuf::from),
                args: args.iter().map(|a| (*a).to_string()).collect(),
            });
            self.reactions.insert(pid, reaction);
            self.alive.insert(pid);
            self
        }
    }

    impl ProcessTablePort for FakeTable {
        fn snapshot(&mut self) -> Vec<ProcessEntry> {
            self.processes.clone()
        }

        fn signal(&mut self, pid: u32, signal: TerminationSignal) -> io::Result<()> {
            self.signals.push((pid, signal));
            match (self.reactions.get(&pid), signal) {
                (Some(Reaction::DiesOnTerm), _)
                | (Some(Reaction::DiesOnKill), TerminationSignal::Force) => {
                    self.alive.remove(&pid);
                }
                _ => {}
            }
            Ok(())
        }

        fn is_running(&mut self, pid: u32) -> bool {
            self.alive.contains(&pid)
        }
    }

    fn fast() -> ShutdownTimeouts {
        ShutdownTimeouts {
            graceful: Duration::from_millis(30),
            force: Duration::from_millis(30),
            poll: Duration::from_millis(5),
        }
    }

    fn controller(table: FakeTable) -> ShutdownController<FakeTable> {
        ShutdownController::new(table, default_shutdown_targets().unwrap()).with_timeouts(fast())
    }

    fn result_for<'a>(report: &'a ShutdownReport, label: &str) -> &'a TargetResult {
        &report.results.iter().find(|(l, _, _)| l == label).unwrap().2
    }

    #[tokio::test]
    async fn only_synth_running_is_partial() {
        let table = FakeTable::default().with(
            40,
            Some("/opt/sonic-pi/app/server/native/scsynth"),
            &["-u", "4556"],
            Reaction::DiesOnTerm,
        );
        let report = controller(table).shutdown().await;

        assert_eq!(report.outcome(), ShutdownOutcome::Partial);
        assert_eq!(
            result_for(&report, "scsynth"),
            &TargetResult::Stopped { pid: 40, forced: false }
        );
        assert_eq!(result_for(&report, "GUI"), &TargetResult::NotRunning);
    }

    #[tokio::test]
    async fn gui_and_server_stopped_is_full() {
        let table = FakeTable::default()
            .with(10, Some("/usr/bin/sonic-pi"), &[], Reaction::DiesOnTerm)
            .with(
                11,
                Some("/usr/bin/ruby"),
                &["-E", "utf-8", "/usr/lib/sonic-pi/server/bin/sonic-pi-server.rb"],
                Reaction::DiesOnKill,
            );
        let mut ctl = controller(table);
        let report = ctl.shutdown().await;

        assert_eq!(report.outcome(), ShutdownOutcome::Full);
        assert_eq!(
            result_for(&report, "Server"),
            &TargetResult::Stopped { pid: 11, forced: true }
        );
        assert_eq!(
            ctl.table.signals,
            vec![
                (10, TerminationSignal::Graceful),
                (11, TerminationSignal::Graceful),
                (11, TerminationSignal::Force),
            ]
        );
    }

    #[tokio::test]
    async fn nothing_matching_is_none() {
        let table = FakeTable::default()
            .with(5, Some("/usr/bin/ruby"), &["irb"], Reaction::DiesOnTerm)
            .with(6, None, &["sonic-pi-server.rb"], Reaction::DiesOnTerm);
        let mut ctl = controller(table);
        let report = ctl.shutdown().await;

        assert_eq!(report.outcome(), ShutdownOutcome::None);
        assert!(ctl.table.signals.is_empty());
    }

    #[tokio::test]
    async fn survivor_is_reported_as_failed() {
        let table = FakeTable::default().with(
            77,
            Some("C:\\Program Files\\Sonic Pi\\app\\server\\native\\scsynth.exe"),
            &[],
            Reaction::Immortal,
        );
        let report = controller(table).shutdown().await;

        assert!(matches!(
            result_for(&report, "scsynth"),
            TargetResult::Failed { pid: 77, .. }
        ));
        assert_eq!(report.outcome(), ShutdownOutcome::None);
        assert_eq!(report.failures().count(), 1);
    }

    #[tokio::test]
    async fn only_first_match_per_target_is_signalled() {
        let table = FakeTable::default()
            .with(20, Some("/usr/bin/scsynth"), &[], Reaction::DiesOnTerm)
            .with(21, Some("/usr/bin/scsynth"), &[], Reaction::DiesOnTerm);
        let mut ctl = controller(table);
        ctl.shutdown().await;

        assert_eq!(ctl.table.signals, vec![(20, TerminationSignal::Graceful)]);
    }
}
