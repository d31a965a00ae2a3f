//! Canonical filesystem locations used by sonic-pi-tool.
//!
//! - The Sonic Pi user directory (`~/.sonic-pi`), overridable with
//!   `SONIC_PI_HOME`
//! - The server's own output log, scraped for the command port
//! - The two log files written when this tool launches the server

mod error;
mod home;

pub use error::PathError;
pub use home::{expand_home, server_output_log, server_stderr_log, server_stdout_log, sonic_pi_home};
