//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<i32, CliError>`
//! - The returned integer is the process exit code on success
//! - Thin wrappers: read input, call a channel or runtime type, print results

pub mod check;
pub mod code;
pub mod logs;
pub mod osc;
pub mod record;
pub mod shutdown;
pub mod start_server;
pub mod stop;
