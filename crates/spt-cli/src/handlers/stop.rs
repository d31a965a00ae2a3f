//! `stop`: stop all running jobs.

use crate::bootstrap::CliContext;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext) -> Result<i32, CliError> {
    ctx.control().stop_all_jobs().await?;
    Ok(0)
}
