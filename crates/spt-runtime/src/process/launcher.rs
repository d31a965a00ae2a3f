//! Server launch state machine.
//!
//! ```text
//! NotStarted -> Launching -> BootConfirmed | BootTimedOut | LaunchFailed -> Detached | Exited
//! ```
//!
//! In the foreground the child's output is piped and teed into the launch
//! logs. In the background the child writes straight into the launch logs
//! from its own process group, so it keeps running after we exit.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use spt_core::{LaunchSpec, OutputStream, ServerOutputSink};
use thiserror::Error;
use tokio::process::{Child, Command};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use super::hook::PostBootHook;
use super::stream::{MarkerWatch, spawn_file_follower, spawn_pipe_tailer};

/// Line the server prints once it is ready for commands.
pub const BOOT_MARKER: &str = "Sonic Pi Server successfully booted.";

/// Upper bound on how long a tailer may take to drain after the child exits.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// How long to wait for the boot marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootBudget {
    pub polls: u32,
    pub interval: Duration,
}

impl Default for BootBudget {
    fn default() -> Self {
        Self {
            polls: 30,
            interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchMode {
    /// Stay attached and wait for the server to exit.
    #[default]
    Foreground,
    /// Return once boot is confirmed (or the budget runs out), leaving the
    /// server running.
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    NotStarted,
    Launching,
    BootConfirmed,
    BootTimedOut,
    LaunchFailed,
    Detached,
    Exited,
}

/// How a launch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Background mode returned with the server still running.
    Detached { pid: Option<u32>, booted: bool },
    /// The server process exited after boot, or ran out the boot budget
    /// in the foreground.
    Exited { code: Option<i32>, booted: bool },
    /// The server process exited before printing the boot marker.
    BootFailed { code: Option<i32> },
}

impl LaunchOutcome {
    /// Process exit code for the launching command.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Detached { booted: true, .. } | Self::Exited { code: Some(0), .. } => 0,
            _ => 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Failed to open launch log {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to start {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to wait for the server process: {0}")]
    Wait(#[source] io::Error),
}

/// Launches one server process and tracks it through boot.
pub struct ServerLauncher {
    spec: LaunchSpec,
    mode: LaunchMode,
    budget: BootBudget,
    stdout_log: PathBuf,
    stderr_log: PathBuf,
    sink: Arc<dyn ServerOutputSink>,
    hook: Option<Box<dyn PostBootHook>>,
    state: LaunchState,
}

impl ServerLauncher {
    pub fn new(
        spec: LaunchSpec,
        stdout_log: impl Into<PathBuf>,
        stderr_log: impl Into<PathBuf>,
        sink: Arc<dyn ServerOutputSink>,
    ) -> Self {
        Self {
            spec,
            mode: LaunchMode::default(),
            budget: BootBudget::default(),
            stdout_log: stdout_log.into(),
            stderr_log: stderr_log.into(),
            sink,
            hook: None,
            state: LaunchState::NotStarted,
        }
    }

    #[must_use]
    pub fn mode(mut self, mode: LaunchMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn budget(mut self, budget: BootBudget) -> Self {
        self.budget = budget;
        self
    }

    #[must_use]
    pub fn post_boot_hook(mut self, hook: impl PostBootHook + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn state(&self) -> LaunchState {
        self.state
    }

    fn transition(&mut self, next: LaunchState) {
        debug!(from = ?self.state, to = ?next, "Launch state");
        self.state = next;
    }

    /// Launch the server and drive it to a final state.
    ///
    /// Boot timeouts and early exits are reported through the outcome;
    /// only failures to start or observe the process are errors.
    pub async fn run(&mut self) -> Result<LaunchOutcome, LaunchError> {
        self.transition(LaunchState::Launching);

        let (boot_tx, mut boot_rx) = oneshot::channel();
        let watch = MarkerWatch::new(BOOT_MARKER, boot_tx);
        let (mut child, tailers) = match self.mode {
            LaunchMode::Foreground => self.spawn_piped(watch)?,
            LaunchMode::Background => self.spawn_detached(watch)?,
        };
        let pid = child.id();
        info!(pid, command = %self.spec, mode = ?self.mode, "Server launched");

        let booted = self.wait_for_boot(&mut child, &mut boot_rx).await?;
        if booted {
            self.run_hook().await;
        }

        let failed = self.state == LaunchState::LaunchFailed;
        if self.mode == LaunchMode::Background && !failed {
            self.transition(LaunchState::Detached);
            return Ok(LaunchOutcome::Detached { pid, booted });
        }

        let status = child.wait().await.map_err(LaunchError::Wait)?;
        if self.mode == LaunchMode::Foreground {
            drain(tailers).await;
        }
        self.transition(LaunchState::Exited);
        info!(%status, "Server exited");

        if failed {
            return Ok(LaunchOutcome::BootFailed {
                code: status.code(),
            });
        }
        Ok(LaunchOutcome::Exited {
            code: status.code(),
            booted,
        })
    }

    async fn wait_for_boot(
        &mut self,
        child: &mut Child,
        boot_rx: &mut oneshot::Receiver<()>,
    ) -> Result<bool, LaunchError> {
        for attempt in 0..self.budget.polls {
            if boot_rx.try_recv().is_ok() {
                self.transition(LaunchState::BootConfirmed);
                return Ok(true);
            }
            if let Some(status) = child.try_wait().map_err(LaunchError::Wait)? {
                warn!(%status, "Server exited before it finished booting");
                self.transition(LaunchState::LaunchFailed);
                return Ok(false);
            }
            debug!(attempt, "Waiting for boot marker");
            sleep(self.budget.interval).await;
        }

        if boot_rx.try_recv().is_ok() {
            self.transition(LaunchState::BootConfirmed);
            return Ok(true);
        }
        warn!(polls = self.budget.polls, "Boot marker not seen in time");
        self.transition(LaunchState::BootTimedOut);
        Ok(false)
    }

    async fn run_hook(&mut self) {
        if let Some(hook) = self.hook.as_mut()
            && let Err(e) = hook.after_boot().await
        {
            warn!(error = %e, "Post-boot hook failed");
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.spec.program);
        cmd.args(&self.spec.args).stdin(Stdio::null());
        cmd
    }

    fn spawn_piped(
        &self,
        watch: MarkerWatch,
    ) -> Result<(Child, Vec<JoinHandle<()>>), LaunchError> {
        let stdout_log = tokio::fs::File::from_std(create_log(&self.stdout_log)?);
        let stderr_log = tokio::fs::File::from_std(create_log(&self.stderr_log)?);

        let mut child = self
            .command()
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: self.spec.program.clone(),
                source,
            })?;

        let mut tailers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            tailers.push(spawn_pipe_tailer(
                stdout,
                stdout_log,
                OutputStream::Stdout,
                Arc::clone(&self.sink),
                Some(watch),
            ));
        }
        if let Some(stderr) = child.stderr.take() {
            tailers.push(spawn_pipe_tailer(
                stderr,
                stderr_log,
                OutputStream::Stderr,
                Arc::clone(&self.sink),
                None,
            ));
        }
        Ok((child, tailers))
    }

    fn spawn_detached(
        &self,
        watch: MarkerWatch,
    ) -> Result<(Child, Vec<JoinHandle<()>>), LaunchError> {
        let stdout_log = create_log(&self.stdout_log)?;
        let stderr_log = create_log(&self.stderr_log)?;

        let mut cmd = self.command();
        cmd.stdout(Stdio::from(stdout_log))
            .stderr(Stdio::from(stderr_log));
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn().map_err(|source| LaunchError::Spawn {
            program: self.spec.program.clone(),
            source,
        })?;

        let tailers = vec![
            spawn_file_follower(
                self.stdout_log.clone(),
                OutputStream::Stdout,
                Arc::clone(&self.sink),
                Some(watch),
            ),
            spawn_file_follower(
                self.stderr_log.clone(),
                OutputStream::Stderr,
                Arc::clone(&self.sink),
                None,
            ),
        ];
        Ok((child, tailers))
    }
}

fn create_log(path: &Path) -> Result<File, LaunchError> {
    let log_err = |source| LaunchError::LogFile {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(log_err)?;
    }
    File::create(path).map_err(log_err)
}

async fn drain(tailers: Vec<JoinHandle<()>>) {
    for tailer in tailers {
        if timeout(DRAIN_TIMEOUT, tailer).await.is_err() {
            debug!("Tailer still busy after server exit, abandoning it");
        }
    }
}
