//! `osc`: send a cue to a running script.

use crate::bootstrap::CliContext;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext, address: &str, args: &[String]) -> Result<i32, CliError> {
    ctx.cue().send_cue(address, args).await?;
    Ok(0)
}
