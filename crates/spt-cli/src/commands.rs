//! Subcommands.
//!
//! Multi-word commands also accept their underscore spelling
//! (`eval_stdin`, `start_server`, ...).

use std::path::PathBuf;

use clap::Subcommand;
use spt_osc::CueServerMode;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check if the Sonic Pi server is running
    Check,

    /// Send code to the server to be played
    Eval {
        /// Code to run
        code: String,
    },

    /// Send code from stdin to be played
    #[command(alias = "eval_stdin")]
    EvalStdin,

    /// Send code from a file to be played
    #[command(alias = "eval_file")]
    EvalFile {
        /// File containing the code
        path: PathBuf,
    },

    /// Tell the server to play a file (for big files)
    #[command(alias = "run_file")]
    RunFile {
        /// File the server should load
        path: PathBuf,
    },

    /// Send an OSC cue to a running Sonic Pi script
    Osc {
        /// OSC address, e.g. /trigger/prophet
        address: String,
        /// Arguments; numbers are sent as numbers, "quoted" values as strings
        #[arg(num_args = 0.., allow_negative_numbers = true)]
        args: Vec<String>,
    },

    /// Try to locate the Sonic Pi server and start it
    #[command(alias = "start_server")]
    StartServer {
        /// Path to a Sonic Pi app to try before the defaults (repeatable)
        #[arg(long = "path")]
        paths: Vec<String>,
        /// Return once the server has booted, leaving it running
        #[arg(long)]
        background: bool,
        /// Configure the cue server after boot: off, internal or external
        #[arg(long = "cue-server")]
        cue_server: Option<CueServerMode>,
    },

    /// Shut down a running Sonic Pi and its helper processes
    Shutdown,

    /// Stop all jobs running on the server
    Stop,

    /// Print logs emitted by the Sonic Pi server
    Logs,

    /// Record audio output to a file on the server's machine
    Record {
        /// Where the server should save the recording
        path: String,
    },
}
