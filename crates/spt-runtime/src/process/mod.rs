//! Launching the Sonic Pi server and following its output.

mod hook;
mod launcher;
mod stream;

pub use hook::PostBootHook;
pub use launcher::{
    BOOT_MARKER, BootBudget, LaunchError, LaunchMode, LaunchOutcome, LaunchState, ServerLauncher,
};
