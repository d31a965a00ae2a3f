//! Glob-based search for a Sonic Pi installation.
//!
//! Candidates are visited in priority order: caller-supplied paths, then the
//! current directory, the user's home, and finally system-wide locations.
//! Within one pattern, matches are visited in reverse sorted order so that
//! `sonic-pi-3.2` beats `sonic-pi-3.1`.

use std::path::{Path, PathBuf};

use spt_core::{Installation, expand_home};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while searching for an installation.
#[derive(Debug, Error)]
pub enum LocateError {
    /// A caller-supplied path is not a valid glob pattern.
    #[error("Invalid installation path '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Built-in search locations, highest priority first.
pub fn default_patterns() -> Vec<&'static str> {
    let mut patterns = vec![
        // Current directory
        "./Sonic Pi.app/Contents/Resources/app",
        "./Sonic Pi.app",
        "./app",
        // Home directory
        "~/Applications/Sonic Pi.app/Contents/Resources/app",
        "~/Applications/Sonic Pi.app",
        // System-wide
        "/Applications/Sonic Pi.app/Contents/Resources/app",
        "/Applications/Sonic Pi.app",
        "/opt/sonic-pi/app",
        "/usr/bin/sonic-pi-*",
        "/usr/bin/sonic-pi",
        "/usr/lib/sonic-pi",
    ];
    if cfg!(windows) {
        patterns.push("C:/Program Files/Sonic Pi/app");
    }
    patterns
}

#[cfg(windows)]
const BUNDLED_RUBY: &str = "server/native/ruby/bin/ruby.exe";
#[cfg(not(windows))]
const BUNDLED_RUBY: &str = "server/native/ruby/bin/ruby";

const INTERPRETER_SUBPATHS: [&str; 2] = [BUNDLED_RUBY, "server/native/osx/ruby/bin/ruby"];

const SERVER_ENTRY_SUBPATHS: [&str; 2] = [
    "server/ruby/bin/sonic-pi-server.rb",
    "server/bin/sonic-pi-server.rb",
];

/// Interpreter used when an installation ships no bundled Ruby.
pub fn fallback_interpreter() -> PathBuf {
    which::which("ruby").unwrap_or_else(|e| {
        debug!(error = %e, "No ruby on PATH, relying on the OS to resolve it");
        PathBuf::from("ruby")
    })
}

/// Searches glob patterns for the first valid installation.
#[derive(Debug, Clone)]
pub struct InstallationLocator {
    patterns: Vec<String>,
    extra_count: usize,
}

impl Default for InstallationLocator {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl InstallationLocator {
    /// Search `extra_paths` first, then the built-in locations.
    pub fn new<I, S>(extra_paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut patterns: Vec<String> = extra_paths.into_iter().map(Into::into).collect();
        let extra_count = patterns.len();
        patterns.extend(default_patterns().into_iter().map(String::from));
        Self {
            patterns,
            extra_count,
        }
    }

    /// Search only `patterns`, ignoring the built-in locations.
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let extra_count = patterns.len();
        Self {
            patterns,
            extra_count,
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Return the first valid installation, or `None` once every pattern has
    /// been tried.
    ///
    /// Only caller-supplied patterns can fail; unusable built-in patterns
    /// (no home directory, say) are skipped.
    pub fn locate(&self) -> Result<Option<Installation>, LocateError> {
        for (index, raw) in self.patterns.iter().enumerate() {
            let explicit = index < self.extra_count;
            let pattern = match expand_home(raw) {
                Ok(path) => path.to_string_lossy().into_owned(),
                Err(e) => {
                    debug!(pattern = %raw, error = %e, "Skipping pattern");
                    continue;
                }
            };

            let matches = match glob::glob(&pattern) {
                Ok(paths) => paths,
                Err(source) if explicit => {
                    return Err(LocateError::Pattern {
                        pattern: raw.clone(),
                        source,
                    });
                }
                Err(e) => {
                    warn!(%pattern, error = %e, "Skipping invalid pattern");
                    continue;
                }
            };

            let mut bases: Vec<PathBuf> = matches.filter_map(Result::ok).collect();
            bases.sort();

            for base in bases.into_iter().rev() {
                let candidate = probe(&base);
                if candidate.is_valid() {
                    info!(base = %candidate.base.display(), "Found installation");
                    return Ok(Some(candidate));
                }
                debug!(base = %base.display(), "No server entry script, skipping");
            }
        }

        Ok(None)
    }
}

/// Look for the interpreter and server entry script under `base`.
pub fn probe(base: &Path) -> Installation {
    Installation {
        base: base.to_path_buf(),
        interpreter: first_file(base, &INTERPRETER_SUBPATHS),
        server_entry: first_file(base, &SERVER_ENTRY_SUBPATHS),
    }
}

fn first_file(base: &Path, subpaths: &[&str]) -> Option<PathBuf> {
    subpaths
        .iter()
        .map(|sub| base.join(sub))
        .find(|path| path.is_file())
}
