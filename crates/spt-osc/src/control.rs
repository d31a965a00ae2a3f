//! Control channel: client-identified commands to the server's command port.

use std::fmt;
use std::str::FromStr;

use spt_core::{CLIENT_NAME, Endpoint, Value};
use tracing::debug;

use crate::client::{OscClient, OscError};

/// Statement prepended to code so the server (re)creates its cue listener.
///
/// Some server versions drop the listener between runs; the `||=` makes this
/// a no-op when it is already there, and `#__nosave__` keeps the line out of
/// the saved buffer.
pub fn preamble(listener_port: u16) -> String {
    format!(
        "@osc_server||=SonicPi::OSC::UDPServer.new({listener_port},use_decoder_cache:true) #__nosave__\n"
    )
}

/// How the server's cue listener should be configured after boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueServerMode {
    /// Stop listening for cues.
    Off,
    /// Listen on localhost only.
    Internal,
    /// Listen on all interfaces.
    External,
}

impl CueServerMode {
    /// Command addresses that put the server in this mode, in order.
    pub fn commands(self) -> &'static [&'static str] {
        match self {
            Self::Off => &["/cue-port-stop"],
            Self::Internal => &["/cue-port-start", "/cue-port-internal"],
            Self::External => &["/cue-port-start", "/cue-port-external"],
        }
    }
}

impl FromStr for CueServerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "internal" => Ok(Self::Internal),
            "external" => Ok(Self::External),
            other => Err(format!(
                "unknown cue server mode '{other}' (expected off, internal or external)"
            )),
        }
    }
}

impl fmt::Display for CueServerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::Internal => "internal",
            Self::External => "external",
        })
    }
}

/// Sends commands to the server's command port.
///
/// Every message carries [`CLIENT_NAME`] as its first argument. Sends are
/// fire-and-forget: nothing is acknowledged and nothing is retried.
#[derive(Debug)]
pub struct ControlChannel {
    client: OscClient,
    preamble: Option<String>,
}

impl ControlChannel {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            client: OscClient::new(endpoint),
            preamble: None,
        }
    }

    /// Prepend the listener preamble for `listener_port` to every code payload.
    #[must_use]
    pub fn with_preamble(mut self, listener_port: u16) -> Self {
        self.preamble = Some(preamble(listener_port));
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        self.client.endpoint()
    }

    pub async fn send_command(&mut self, address: &str, args: Vec<Value>) -> Result<(), OscError> {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(Value::from(CLIENT_NAME));
        full.extend(args);
        self.client.send(address, &full).await
    }

    /// Send code for the server to run.
    pub async fn run_code(&mut self, source: &str) -> Result<(), OscError> {
        let payload = match &self.preamble {
            Some(preamble) => format!("{preamble}{source}"),
            None => source.to_string(),
        };
        debug!(bytes = payload.len(), "Running code");
        self.send_command("/run-code", vec![Value::Str(payload)])
            .await
    }

    pub async fn stop_all_jobs(&mut self) -> Result<(), OscError> {
        self.send_command("/stop-all-jobs", Vec::new()).await
    }

    pub async fn start_recording(&mut self) -> Result<(), OscError> {
        self.send_command("/start-recording", Vec::new()).await
    }

    pub async fn stop_and_save_recording(&mut self, path: &str) -> Result<(), OscError> {
        self.send_command("/stop-recording", Vec::new()).await?;
        self.send_command("/save-recording", vec![Value::from(path)])
            .await
    }

    pub async fn cue_port_start(&mut self) -> Result<(), OscError> {
        self.send_command("/cue-port-start", Vec::new()).await
    }

    pub async fn cue_port_stop(&mut self) -> Result<(), OscError> {
        self.send_command("/cue-port-stop", Vec::new()).await
    }

    pub async fn cue_port_internal(&mut self) -> Result<(), OscError> {
        self.send_command("/cue-port-internal", Vec::new()).await
    }

    pub async fn cue_port_external(&mut self) -> Result<(), OscError> {
        self.send_command("/cue-port-external", Vec::new()).await
    }

    /// Put the server's cue listener into `mode`.
    pub async fn set_cue_server_mode(&mut self, mode: CueServerMode) -> Result<(), OscError> {
        debug!(%mode, "Configuring cue server");
        for address in mode.commands() {
            self.send_command(address, Vec::new()).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preamble_is_a_single_nosave_line() {
        let line = preamble(4557);
        assert_eq!(
            line,
            "@osc_server||=SonicPi::OSC::UDPServer.new(4557,use_decoder_cache:true) #__nosave__\n"
        );
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn cue_server_modes_parse_case_insensitively() {
        assert_eq!("External".parse::<CueServerMode>(), Ok(CueServerMode::External));
        assert_eq!("off".parse::<CueServerMode>(), Ok(CueServerMode::Off));
        assert!("loud".parse::<CueServerMode>().is_err());
        assert_eq!(
            CueServerMode::Internal.commands(),
            &["/cue-port-start", "/cue-port-internal"]
        );
    }
}
