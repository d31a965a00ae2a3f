//! CLI bootstrap: the composition root.
//!
//! Turns parsed global options into a [`CliContext`] that hands out the
//! channels command handlers need. The command port is resolved lazily, so
//! commands that never talk to the command server never read the server log.

use std::path::PathBuf;

use spt_core::{Endpoint, server_output_log};
use spt_osc::{CommandPortResolver, ControlChannel, CueChannel, PortResolution};

use crate::error::CliError;
use crate::parser::Cli;
use crate::presentation::print_port_source;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub host: String,
    /// Command port as given; zero or negative means "look it up".
    pub cmd_port: i32,
    pub osc_port: u16,
    /// Prepend the cue listener preamble to code.
    pub preamble: bool,
    /// Server log scraped for the command port.
    pub server_log: PathBuf,
}

impl CliConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        Ok(Self {
            host: cli.host.clone(),
            cmd_port: cli.cmd_port,
            osc_port: cli.osc_port,
            preamble: !cli.no_preamble,
            server_log: server_output_log()?,
        })
    }
}

/// Composed context for CLI commands.
#[derive(Debug)]
pub struct CliContext {
    pub config: CliConfig,
    resolver: CommandPortResolver,
}

impl CliContext {
    pub fn new(config: CliConfig) -> Self {
        let resolver = CommandPortResolver::new(config.cmd_port, config.server_log.clone());
        Self { config, resolver }
    }

    /// Resolve the command port, announcing where it came from the first time.
    pub fn command_port(&self) -> PortResolution {
        let first = !self.resolver.is_resolved();
        let resolution = self.resolver.resolve();
        if first {
            print_port_source(&resolution);
        }
        resolution
    }

    /// Channel to the command server.
    pub fn control(&self) -> ControlChannel {
        let port = self.command_port().port;
        let channel = ControlChannel::new(Endpoint::new(self.config.host.clone(), port));
        if self.config.preamble {
            channel.with_preamble(port)
        } else {
            channel
        }
    }

    /// Channel to the cue server.
    pub fn cue(&self) -> CueChannel {
        CueChannel::new(Endpoint::new(self.config.host.clone(), self.config.osc_port))
    }
}
