//! Shutdown targets and outcome classification.

use std::path::Path;

use regex::{Regex, RegexBuilder};

/// Whether stopping a target counts towards a full shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownRole {
    /// GUI and server: both must stop for a full shutdown.
    Primary,
    /// Worker processes the server spawns (synth engine, VM, bridges).
    Subordinate,
}

/// A process role to look for when shutting Sonic Pi down.
#[derive(Debug, Clone)]
pub struct ShutdownTarget {
    pub label: String,
    pub role: ShutdownRole,
    executable: Regex,
    argument: Option<Regex>,
}

impl ShutdownTarget {
    /// Build a target from case-insensitive patterns.
    ///
    /// `executable` is matched against the process executable path with
    /// backslashes normalised to `/`. When `argument` is set, at least one
    /// command-line argument must match it too.
    pub fn new(
        label: impl Into<String>,
        role: ShutdownRole,
        executable: &str,
        argument: Option<&str>,
    ) -> Result<Self, regex::Error> {
        let build = |pattern: &str| RegexBuilder::new(pattern).case_insensitive(true).build();
        Ok(Self {
            label: label.into(),
            role,
            executable: build(executable)?,
            argument: argument.map(build).transpose()?,
        })
    }

    pub fn matches(&self, exe: &Path, args: &[String]) -> bool {
        let exe = exe.to_string_lossy().replace('\\', "/");
        if !self.executable.is_match(&exe) {
            return false;
        }
        match &self.argument {
            Some(pattern) => args
                .iter()
                .any(|arg| pattern.is_match(&arg.replace('\\', "/"))),
            None => true,
        }
    }
}

/// The fixed, ordered list of processes a Sonic Pi installation runs.
pub fn default_shutdown_targets() -> Result<Vec<ShutdownTarget>, regex::Error> {
    use ShutdownRole::{Primary, Subordinate};

    Ok(vec![
        ShutdownTarget::new(
            "GUI",
            Primary,
            r"(^|/)sonic-pi(\.exe)?$|/sonic pi\.app/contents/macos/sonic pi$",
            None,
        )?,
        ShutdownTarget::new(
            "Server",
            Primary,
            r"(^|/)ruby(\.exe)?$",
            Some(r"sonic-pi-server\.rb$"),
        )?,
        ShutdownTarget::new("scsynth", Subordinate, r"(^|/)scsynth(\.exe)?$", None)?,
        ShutdownTarget::new(
            "Erlang VM",
            Subordinate,
            r"(^|/)(beam\.smp|beam|erl|werl)(\.exe)?$",
            Some(r"sonic.?pi|(^|/)tau(/|$)"),
        )?,
        ShutdownTarget::new("o2m", Subordinate, r"(^|/)o2m(\.exe)?$", None)?,
        ShutdownTarget::new("m2o", Subordinate, r"(^|/)m2o(\.exe)?$", None)?,
    ])
}

/// What happened to a single target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetResult {
    /// No running process matched.
    NotRunning,
    /// The matched process exited; `forced` when a kill was needed.
    Stopped { pid: u32, forced: bool },
    /// The matched process survived both termination and kill.
    Failed { pid: u32, reason: String },
}

/// Overall classification of a shutdown run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// GUI and server were both stopped.
    Full,
    /// Some processes were stopped, but not both primaries.
    Partial,
    /// Nothing was stopped.
    None,
}

/// Per-target results in target order.
#[derive(Debug, Clone, Default)]
pub struct ShutdownReport {
    pub results: Vec<(String, ShutdownRole, TargetResult)>,
}

impl ShutdownReport {
    pub fn push(&mut self, target: &ShutdownTarget, result: TargetResult) {
        self.results
            .push((target.label.clone(), target.role, result));
    }

    pub fn outcome(&self) -> ShutdownOutcome {
        let stopped = |(_, _, result): &&(String, ShutdownRole, TargetResult)| {
            matches!(result, TargetResult::Stopped { .. })
        };

        let primaries = self
            .results
            .iter()
            .filter(|(_, role, _)| *role == ShutdownRole::Primary)
            .collect::<Vec<_>>();
        if !primaries.is_empty() && primaries.iter().all(stopped) {
            return ShutdownOutcome::Full;
        }
        if self.results.iter().any(|entry| stopped(&entry)) {
            ShutdownOutcome::Partial
        } else {
            ShutdownOutcome::None
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, u32, &str)> {
        self.results.iter().filter_map(|(label, _, result)| match result {
            TargetResult::Failed { pid, reason } => Some((label.as_str(), *pid, reason.as_str())),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> Vec<ShutdownTarget> {
        default_shutdown_targets().expect("default patterns compile")
    }

    fn find<'a>(targets: &'a [ShutdownTarget], label: &str) -> &'a ShutdownTarget {
        targets.iter().find(|t| t.label == label).unwrap()
    }

    #[test]
    fn server_needs_matching_argument() {
        let targets = targets();
        let server = find(&targets, "Server");
        let exe = Path::new("/opt/sonic-pi/app/server/native/ruby/bin/ruby");
        assert!(server.matches(
            exe,
            &["-E".into(), "utf-8".into(), "/opt/sonic-pi/app/server/ruby/bin/sonic-pi-server.rb".into()]
        ));
        assert!(!server.matches(exe, &["irb".into()]));
    }

    #[test]
    fn executable_match_is_case_insensitive_and_normalised() {
        let targets = targets();
        let scsynth = find(&targets, "scsynth");
        assert!(scsynth.matches(Path::new(r"C:\Program Files\Sonic Pi\app\server\native\SCSYNTH.EXE"), &[]));
        assert!(!scsynth.matches(Path::new("/usr/bin/scsynth-helper"), &[]));
    }

    #[test]
    fn gui_matches_linux_and_macos_binaries() {
        let targets = targets();
        let gui = find(&targets, "GUI");
        assert!(gui.matches(Path::new("/usr/bin/sonic-pi"), &[]));
        assert!(gui.matches(
            Path::new("/Applications/Sonic Pi.app/Contents/MacOS/Sonic Pi"),
            &[]
        ));
        assert!(!gui.matches(Path::new("/usr/bin/sonic-pi-tool"), &[]));
    }

    fn report(results: &[(&str, TargetResult)]) -> ShutdownReport {
        let targets = targets();
        let mut report = ShutdownReport::default();
        for (label, result) in results {
            report.push(find(&targets, label), result.clone());
        }
        report
    }

    #[test]
    fn only_subordinate_stopped_is_partial() {
        let report = report(&[
            ("GUI", TargetResult::NotRunning),
            ("Server", TargetResult::NotRunning),
            ("scsynth", TargetResult::Stopped { pid: 10, forced: false }),
        ]);
        assert_eq!(report.outcome(), ShutdownOutcome::Partial);
    }

    #[test]
    fn both_primaries_stopped_is_full() {
        let report = report(&[
            ("GUI", TargetResult::Stopped { pid: 1, forced: false }),
            ("Server", TargetResult::Stopped { pid: 2, forced: true }),
            ("scsynth", TargetResult::NotRunning),
        ]);
        assert_eq!(report.outcome(), ShutdownOutcome::Full);
    }

    #[test]
    fn nothing_stopped_is_none() {
        let report = report(&[
            ("GUI", TargetResult::NotRunning),
            ("Server", TargetResult::Failed { pid: 2, reason: "still running".into() }),
        ]);
        assert_eq!(report.outcome(), ShutdownOutcome::None);
        assert_eq!(report.failures().count(), 1);
    }
}
