//! Lazily opened UDP client for outbound OSC messages.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use rosc::{OscMessage, OscPacket, OscType};
use spt_core::{Endpoint, Value};
use thiserror::Error;
use tokio::net::{UdpSocket, lookup_host};
use tracing::debug;

/// Errors raised while sending OSC messages.
#[derive(Debug, Error)]
pub enum OscError {
    /// The host name did not resolve to any address.
    #[error("Could not resolve host {host}")]
    Resolve { host: String },

    /// Socket creation or send failed.
    #[error("Failed to send to {endpoint}: {source}")]
    Io {
        endpoint: Endpoint,
        #[source]
        source: io::Error,
    },

    /// The message could not be encoded.
    #[error("Failed to encode OSC message {address}: {reason}")]
    Encode { address: String, reason: String },
}

#[derive(Debug)]
struct OpenSocket {
    socket: UdpSocket,
    target: SocketAddr,
}

/// A UDP client bound to one endpoint.
///
/// The socket is created on the first send and reused for every later send
/// through the same client.
#[derive(Debug)]
pub struct OscClient {
    endpoint: Endpoint,
    open: Option<OpenSocket>,
}

impl OscClient {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            open: None,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Encode and send a single message.
    pub async fn send(&mut self, address: &str, args: &[Value]) -> Result<(), OscError> {
        let packet = OscPacket::Message(OscMessage {
            addr: address.to_string(),
            args: args.iter().map(to_osc).collect(),
        });
        let bytes = rosc::encoder::encode(&packet).map_err(|e| OscError::Encode {
            address: address.to_string(),
            reason: format!("{e:?}"),
        })?;

        let open = match self.open.take() {
            Some(open) => open,
            None => self.connect().await?,
        };
        let open = self.open.insert(open);

        debug!(endpoint = %self.endpoint, %address, args = args.len(), "Sending OSC message");
        open.socket
            .send_to(&bytes, open.target)
            .await
            .map_err(|source| OscError::Io {
                endpoint: self.endpoint.clone(),
                source,
            })?;
        Ok(())
    }

    async fn connect(&self) -> Result<OpenSocket, OscError> {
        let io_err = |source: io::Error| OscError::Io {
            endpoint: self.endpoint.clone(),
            source,
        };

        let target = lookup_host((self.endpoint.host.as_str(), self.endpoint.port))
            .await
            .map_err(io_err)?
            .next()
            .ok_or_else(|| OscError::Resolve {
                host: self.endpoint.host.clone(),
            })?;

        let local: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await.map_err(io_err)?;
        debug!(endpoint = %self.endpoint, %target, "Opened OSC client socket");

        Ok(OpenSocket { socket, target })
    }
}

fn to_osc(value: &Value) -> OscType {
    match value {
        Value::Int(i) => OscType::Int(*i),
        Value::Long(i) => OscType::Long(*i),
        Value::Float(f) => OscType::Float(*f),
        Value::Str(s) => OscType::String(s.clone()),
    }
}
