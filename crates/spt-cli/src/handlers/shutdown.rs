//! `shutdown`: stop Sonic Pi and its helper processes.

use spt_core::{ShutdownOutcome, ShutdownReport, TargetResult, default_shutdown_targets};
use spt_runtime::{ShutdownController, SysinfoProcessTable};

use crate::error::CliError;

pub async fn execute() -> Result<i32, CliError> {
    let targets = default_shutdown_targets().map_err(|e| CliError::Shutdown(e.to_string()))?;
    let mut controller = ShutdownController::new(SysinfoProcessTable::new(), targets);
    let report = controller.shutdown().await;

    for line in report_lines(&report) {
        println!("{line}");
    }
    Ok(exit_code(report.outcome()))
}

fn report_lines(report: &ShutdownReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .results
        .iter()
        .filter_map(|(label, _, result)| match result {
            TargetResult::NotRunning => None,
            TargetResult::Stopped { pid, forced: false } => {
                Some(format!("Stopped {label} (pid {pid})"))
            }
            TargetResult::Stopped { pid, forced: true } => {
                Some(format!("Killed {label} (pid {pid})"))
            }
            TargetResult::Failed { pid, reason } => {
                Some(format!("Failed to stop {label} (pid {pid}): {reason}"))
            }
        })
        .collect();

    lines.push(
        match report.outcome() {
            ShutdownOutcome::Full => "Sonic Pi has been shut down",
            ShutdownOutcome::Partial => "Sonic Pi was only partially shut down",
            ShutdownOutcome::None => "Sonic Pi doesn't appear to be running",
        }
        .to_string(),
    );
    lines
}

fn exit_code(outcome: ShutdownOutcome) -> i32 {
    match outcome {
        ShutdownOutcome::Full => 0,
        ShutdownOutcome::Partial | ShutdownOutcome::None => 1,
    }
}
