//! Cue channel: arbitrary OSC messages to the server's cue port.

use spt_core::{Endpoint, Value};

use crate::client::{OscClient, OscError};

/// Sends cues to scripts running on the server.
#[derive(Debug)]
pub struct CueChannel {
    client: OscClient,
}

impl CueChannel {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            client: OscClient::new(endpoint),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        self.client.endpoint()
    }

    /// Send `address` with each raw argument coerced to a typed value.
    pub async fn send_cue<S: AsRef<str>>(
        &mut self,
        address: &str,
        raw_args: &[S],
    ) -> Result<(), OscError> {
        let args: Vec<Value> = raw_args.iter().map(|s| Value::coerce(s.as_ref())).collect();
        self.client.send(address, &args).await
    }
}
