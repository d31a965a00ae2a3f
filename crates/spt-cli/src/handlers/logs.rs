//! `logs`: print log events from the server until interrupted.

use spt_osc::LogRelay;
use tracing::debug;

use crate::error::CliError;
use crate::presentation::TerminalLogPrinter;

pub async fn execute() -> Result<i32, CliError> {
    let relay = LogRelay::bind_default().await?;
    let mut printer = TerminalLogPrinter::new();

    tokio::select! {
        result = relay.run(&mut printer) => result?,
        _ = tokio::signal::ctrl_c() => debug!("Interrupted, stopping log relay"),
    }
    Ok(0)
}
