//! `check`: is a server listening?

use spt_osc::port_in_use;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// What the port probe says about the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    Running,
    NotRunning,
    /// Only one of the two ports is in use.
    Inconsistent,
}

impl ServerStatus {
    pub fn classify(cmd_in_use: bool, osc_in_use: bool) -> Self {
        match (cmd_in_use, osc_in_use) {
            (true, true) => Self::Running,
            (false, false) => Self::NotRunning,
            _ => Self::Inconsistent,
        }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            Self::Running => 0,
            Self::NotRunning => 1,
            Self::Inconsistent => 2,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Running => "Sonic Pi appears to be running",
            Self::NotRunning => "Sonic Pi is not running",
            Self::Inconsistent => {
                "Sonic Pi is not running properly, or there's an issue with the port numbers"
            }
        }
    }
}

fn port_line(name: &str, port: u16, in_use: bool) -> String {
    format!(
        "The {name} port ({port}) is {}in use",
        if in_use { "" } else { "not " }
    )
}

pub async fn execute(ctx: &CliContext) -> Result<i32, CliError> {
    let cmd_port = ctx.command_port().port;
    let cmd_in_use = port_in_use(cmd_port);
    println!("{}", port_line("command", cmd_port, cmd_in_use));

    let osc_port = ctx.config.osc_port;
    let osc_in_use = port_in_use(osc_port);
    println!("{}", port_line("OSC", osc_port, osc_in_use));

    let status = ServerStatus::classify(cmd_in_use, osc_in_use);
    println!("{}", status.message());
    Ok(status.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_and_exit_codes() {
        assert_eq!(ServerStatus::classify(true, true).exit_code(), 0);
        assert_eq!(ServerStatus::classify(false, false).exit_code(), 1);
        assert_eq!(ServerStatus::classify(true, false).exit_code(), 2);
        assert_eq!(ServerStatus::classify(false, true), ServerStatus::Inconsistent);
    }

    #[test]
    fn port_lines() {
        assert_eq!(port_line("command", 4557, true), "The command port (4557) is in use");
        assert_eq!(port_line("OSC", 4560, false), "The OSC port (4560) is not in use");
    }
}
