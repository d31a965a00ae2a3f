//! Command port resolution.
//!
//! The server picks its command port at boot and announces it in
//! `server-output.log`. A positive explicit port always wins; otherwise the
//! log is scraped, and the absolute value of the (negative) default is the
//! last resort.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, OnceLock};
use std::time::SystemTime;

use regex::Regex;
use tracing::{debug, info, warn};

static LISTEN_PORT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^Listen port: *([0-9]+)").ok());

/// Which branch produced the command port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSource {
    /// A positive port given on the command line or in the environment.
    Explicit,
    /// Scraped from the server's output log.
    ServerLog,
    /// Log missing or silent; the default was used.
    Fallback,
}

/// Result of command port resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortResolution {
    pub port: u16,
    pub source: PortSource,
}

/// Resolve the command port.
///
/// Never fails: a missing or unreadable log is the expected case when the
/// server has never run on this machine.
pub fn resolve_command_port(explicit: i32, log_path: &Path) -> PortResolution {
    if explicit > 0 {
        let port = clamp_port(explicit.unsigned_abs());
        info!(port, "Using explicit command port");
        return PortResolution {
            port,
            source: PortSource::Explicit,
        };
    }

    if let Some(port) = scrape_listen_port(log_path) {
        info!(port, log = %log_path.display(), "Found command port in server log");
        return PortResolution {
            port,
            source: PortSource::ServerLog,
        };
    }

    let port = clamp_port(explicit.unsigned_abs());
    warn!(port, log = %log_path.display(), "Couldn't find command port in server log, using default");
    PortResolution {
        port,
        source: PortSource::Fallback,
    }
}

fn scrape_listen_port(log_path: &Path) -> Option<u16> {
    let file = match File::open(log_path) {
        Ok(file) => file,
        Err(e) => {
            debug!(log = %log_path.display(), error = %e, "Server log not readable");
            return None;
        }
    };

    // The log may be left over from an earlier run; report its age so a
    // stale port is easy to spot in verbose output.
    if let Ok(modified) = file.metadata().and_then(|m| m.modified())
        && let Ok(age) = SystemTime::now().duration_since(modified)
    {
        debug!(log = %log_path.display(), age_secs = age.as_secs(), "Server log age");
    }

    let pattern = LISTEN_PORT.as_ref()?;

    for chunk in BufReader::new(file).split(b'\n') {
        let Ok(bytes) = chunk else {
            break;
        };
        let line = String::from_utf8_lossy(&bytes);
        let Some(caps) = pattern.captures(&line) else {
            continue;
        };
        match caps[1].parse::<u16>() {
            Ok(port) => return Some(port),
            Err(_) => debug!(line = %line, "Ignoring out-of-range listen port"),
        }
    }

    None
}

fn clamp_port(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Resolves the command port at most once per process run.
#[derive(Debug)]
pub struct CommandPortResolver {
    explicit: i32,
    log_path: PathBuf,
    resolved: OnceLock<PortResolution>,
}

impl CommandPortResolver {
    pub fn new(explicit: i32, log_path: impl Into<PathBuf>) -> Self {
        Self {
            explicit,
            log_path: log_path.into(),
            resolved: OnceLock::new(),
        }
    }

    /// Resolve on first call; later calls return the cached result.
    pub fn resolve(&self) -> PortResolution {
        *self
            .resolved
            .get_or_init(|| resolve_command_port(self.explicit, &self.log_path))
    }

    pub fn port(&self) -> u16 {
        self.resolve().port
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }
}
