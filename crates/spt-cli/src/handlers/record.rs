//! `record`: record the server's audio output until Enter is pressed.

use anyhow::Context;
use console::Term;

use crate::bootstrap::CliContext;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext, path: &str) -> Result<i32, CliError> {
    let mut control = ctx.control();
    control.start_recording().await?;
    println!("Recording started, saving to {path}");
    println!("Press Enter to stop the recording...");

    tokio::task::spawn_blocking(|| Term::stdout().read_line())
        .await
        .context("Input task failed")
        .and_then(|line| line.context("Failed to read from terminal"))
        .map_err(CliError::Input)?;

    control.stop_and_save_recording(path).await?;
    Ok(0)
}
