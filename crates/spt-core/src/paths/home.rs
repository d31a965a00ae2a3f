//! Sonic Pi user directory and the log files inside it.

use std::env;
use std::path::PathBuf;

use tracing::debug;

use super::error::PathError;

/// Environment variable overriding the Sonic Pi user directory.
pub const SONIC_PI_HOME_ENV: &str = "SONIC_PI_HOME";

/// Get the Sonic Pi user directory.
///
/// Resolution order:
/// 1. `SONIC_PI_HOME` environment variable
/// 2. `~/.sonic-pi`
pub fn sonic_pi_home() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var(SONIC_PI_HOME_ENV)
        && !path.trim().is_empty()
    {
        debug!(%path, "Using {SONIC_PI_HOME_ENV} override");
        return expand_home(&path);
    }

    let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
    Ok(home.join(".sonic-pi"))
}

/// The log the server writes on startup; it announces `Listen port: N`.
pub fn server_output_log() -> Result<PathBuf, PathError> {
    Ok(sonic_pi_home()?.join("log").join("server-output.log"))
}

/// Where stdout of a server launched by this tool is recorded.
pub fn server_stdout_log() -> Result<PathBuf, PathError> {
    Ok(sonic_pi_home()?.join("log").join("sonic-pi-tool-stdout.log"))
}

/// Where stderr of a server launched by this tool is recorded.
pub fn server_stderr_log() -> Result<PathBuf, PathError> {
    Ok(sonic_pi_home()?.join("log").join("sonic-pi-tool-stderr.log"))
}

/// Expand a leading `~` to the user's home directory.
///
/// Relative paths stay relative; glob metacharacters are left untouched so
/// the result can still be used as a pattern.
pub fn expand_home(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    if trimmed == "~" {
        return dirs::home_dir().ok_or(PathError::NoHomeDir);
    }
    if let Some(rest) = trimmed.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
        return Ok(home.join(rest));
    }

    Ok(PathBuf::from(trimmed))
}
