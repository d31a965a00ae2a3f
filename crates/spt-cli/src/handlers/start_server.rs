//! `start-server`: find an installation, launch it and wait for boot.

use std::sync::Arc;

use async_trait::async_trait;
use spt_core::{server_stderr_log, server_stdout_log};
use spt_osc::CueServerMode;
use spt_runtime::{
    BootBudget, InstallationLocator, LaunchMode, LaunchOutcome, PostBootHook, ServerLauncher,
    fallback_interpreter,
};

use crate::bootstrap::{CliConfig, CliContext};
use crate::error::CliError;
use crate::presentation::TerminalServerOutput;

#[derive(Debug, Clone, Default)]
pub struct StartServerArgs {
    pub paths: Vec<String>,
    pub background: bool,
    pub cue_server: Option<CueServerMode>,
}

/// Configures the cue server once the server is up.
///
/// Builds its own context so the command port is read from the log the new
/// server has just written.
struct CueServerHook {
    config: CliConfig,
    mode: CueServerMode,
}

#[async_trait]
impl PostBootHook for CueServerHook {
    async fn after_boot(&mut self) -> anyhow::Result<()> {
        let ctx = CliContext::new(self.config.clone());
        ctx.control().set_cue_server_mode(self.mode).await?;
        println!("Cue server set to {}", self.mode);
        Ok(())
    }
}

pub async fn execute(ctx: &CliContext, args: StartServerArgs) -> Result<i32, CliError> {
    let locator = InstallationLocator::new(args.paths);
    let installation = locator.locate()?.ok_or(CliError::InstallationNotFound)?;
    println!("Found installation at: {}", installation.base.display());

    let spec = installation
        .launch_spec(&fallback_interpreter())
        .ok_or(CliError::InstallationNotFound)?;
    println!("Running: {spec}");

    let mode = if args.background {
        LaunchMode::Background
    } else {
        LaunchMode::Foreground
    };
    let mut launcher = ServerLauncher::new(
        spec,
        server_stdout_log()?,
        server_stderr_log()?,
        Arc::new(TerminalServerOutput),
    )
    .mode(mode)
    .budget(BootBudget::default());
    if let Some(cue_mode) = args.cue_server {
        launcher = launcher.post_boot_hook(CueServerHook {
            config: ctx.config.clone(),
            mode: cue_mode,
        });
    }

    let outcome = launcher.run().await?;
    if let Some(message) = outcome_message(&outcome) {
        eprintln!("{message}");
    }
    Ok(outcome.exit_code())
}

fn outcome_message(outcome: &LaunchOutcome) -> Option<String> {
    match *outcome {
        LaunchOutcome::Detached { booted: true, pid } => Some(match pid {
            Some(pid) => format!("Sonic Pi server booted and running in the background (pid {pid})"),
            None => "Sonic Pi server booted and running in the background".to_string(),
        }),
        LaunchOutcome::Detached { booted: false, .. } => {
            Some("Sonic Pi server didn't boot yet but left running".to_string())
        }
        LaunchOutcome::Exited { code: Some(0), .. } => None,
        LaunchOutcome::Exited { code: Some(code), booted } => Some(if booted {
            format!("Sonic Pi server exited with code {code}")
        } else {
            format!("Sonic Pi server failed to boot (exit code {code})")
        }),
        LaunchOutcome::Exited { code: None, .. } => {
            Some("Sonic Pi server was terminated by a signal".to_string())
        }
        LaunchOutcome::BootFailed { code: Some(code) } => Some(format!(
            "Sonic Pi server exited before it finished booting (exit code {code})"
        )),
        LaunchOutcome::BootFailed { code: None } => {
            Some("Sonic Pi server was terminated before it finished booting".to_string())
        }
    }
}
