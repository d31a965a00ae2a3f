//! Root CLI parser and global options.
//!
//! Every global option can also come from the environment (or a `.env` file),
//! which is handy when the server runs on another machine.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface definition for sonic-pi-tool.
#[derive(Debug, Parser)]
#[command(name = "sonic-pi-tool")]
#[command(about = "Control a Sonic Pi server from the command line")]
#[command(version)]
pub struct Cli {
    /// IP or hostname of the Sonic Pi server
    #[arg(long, global = true, env = "SONIC_PI_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port of the command server (negative: read it from the server log if possible)
    #[arg(
        long = "cmd-port",
        global = true,
        env = "SONIC_PI_CMD_PORT",
        default_value_t = -4557,
        allow_negative_numbers = true
    )]
    pub cmd_port: i32,

    /// Port of the OSC cue server
    #[arg(long = "osc-port", global = true, env = "SONIC_PI_OSC_PORT", default_value_t = 4560)]
    pub osc_port: u16,

    /// Send code without the cue listener preamble
    #[arg(long = "no-preamble", global = true, env = "SONIC_PI_NO_PREAMBLE")]
    pub no_preamble: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_defaults() {
        let cli = Cli::try_parse_from(["sonic-pi-tool", "stop"]).unwrap();
        assert_eq!(cli.osc_port, 4560);
        assert!(!cli.no_preamble);
        assert!(matches!(cli.command, Commands::Stop));
    }

    #[test]
    fn test_negative_cmd_port() {
        let cli =
            Cli::try_parse_from(["sonic-pi-tool", "--cmd-port", "-4557", "check"]).unwrap();
        assert_eq!(cli.cmd_port, -4557);

        let cli = Cli::try_parse_from(["sonic-pi-tool", "check", "--cmd-port", "51235"]).unwrap();
        assert_eq!(cli.cmd_port, 51235);
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sonic-pi-tool",
            "eval",
            "play 60",
            "--host",
            "10.0.0.2",
            "--no-preamble",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.host, "10.0.0.2");
        assert!(cli.no_preamble);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Eval { ref code } if code == "play 60"));
    }
}
