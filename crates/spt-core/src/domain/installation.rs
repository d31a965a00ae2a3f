//! Sonic Pi installation and the command line that launches its server.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// A candidate Sonic Pi installation.
///
/// Paths are absolute (already joined onto `base`). An installation is only
/// usable when the server entry script was found; a missing interpreter falls
/// back to whatever `ruby` the system provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    pub base: PathBuf,
    pub interpreter: Option<PathBuf>,
    pub server_entry: Option<PathBuf>,
}

impl Installation {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            interpreter: None,
            server_entry: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.server_entry.is_some()
    }

    /// Build the server command line.
    ///
    /// `fallback_interpreter` is used when the installation ships no bundled
    /// Ruby. Returns `None` for an invalid installation.
    pub fn launch_spec(&self, fallback_interpreter: &Path) -> Option<LaunchSpec> {
        let entry = self.server_entry.as_ref()?;
        let program = self
            .interpreter
            .clone()
            .unwrap_or_else(|| fallback_interpreter.to_path_buf());

        let mut args: Vec<OsString> = vec!["-E".into(), "utf-8".into()];
        if cfg!(any(target_os = "macos", target_os = "windows")) {
            args.push("--enable-frozen-string-literal".into());
        }
        args.push(entry.clone().into_os_string());

        Some(LaunchSpec { program, args })
    }
}

/// Program and arguments of a process to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl LaunchSpec {
    pub fn new<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for LaunchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
