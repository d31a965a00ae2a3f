//! Process runtime for sonic-pi-tool.
//!
//! Everything here touches the OS: the filesystem search for an installation,
//! the server child process, and the process table used during shutdown.
//!
//! - [`InstallationLocator`] finds a Sonic Pi installation
//! - [`ServerLauncher`] launches the server and waits for it to boot
//! - [`ShutdownController`] stops a running Sonic Pi and its helpers

pub mod installation;
pub mod process;
pub mod shutdown;

pub use installation::{InstallationLocator, LocateError, default_patterns, fallback_interpreter};
pub use process::{
    BOOT_MARKER, BootBudget, LaunchError, LaunchMode, LaunchOutcome, LaunchState, PostBootHook,
    ServerLauncher,
};
pub use shutdown::{ShutdownController, ShutdownTimeouts, SysinfoProcessTable};
