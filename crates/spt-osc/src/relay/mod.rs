//! Log relay: receives the server's log events over UDP.
//!
//! The server's log transport is hard-wired to `127.0.0.1:4558`, so the relay
//! listens there. Only one process can hold that port; when the Sonic Pi GUI
//! is running it already does.

mod decode;
mod render;

use std::io;
use std::net::{Ipv4Addr, SocketAddr};

use rosc::OscPacket;
use spt_core::ports::LogEventSink;
use thiserror::Error;
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

pub use decode::{DecodeError, EventKind, decode_message, route};
pub use render::{RenderedLine, Span, render_event};

/// Port the server sends its log events to.
pub const LOG_RELAY_PORT: u16 = 4558;

/// Large enough for any UDP datagram; multi-messages can be long.
const RECV_BUFFER_SIZE: usize = 65_536;

/// Errors raised by the log relay.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Someone else is already listening on the log port.
    #[error("Address {addr} is already in use")]
    AddressInUse { addr: SocketAddr },

    /// Any other socket failure.
    #[error("Log relay socket error: {0}")]
    Io(#[from] io::Error),
}

/// A bound log listener.
#[derive(Debug)]
pub struct LogRelay {
    socket: UdpSocket,
}

impl LogRelay {
    /// Bind to the fixed log port on localhost.
    pub async fn bind_default() -> Result<Self, RelayError> {
        Self::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, LOG_RELAY_PORT))).await
    }

    pub async fn bind(addr: SocketAddr) -> Result<Self, RelayError> {
        let socket = UdpSocket::bind(addr).await.map_err(|e| {
            if e.kind() == io::ErrorKind::AddrInUse {
                RelayError::AddressInUse { addr }
            } else {
                RelayError::Io(e)
            }
        })?;
        info!(%addr, "Log relay listening");
        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, RelayError> {
        Ok(self.socket.local_addr()?)
    }

    /// Receive and dispatch datagrams until the socket fails.
    ///
    /// Each event is handed to `sink` before the next datagram is read, so
    /// output for one event never interleaves with another.
    pub async fn run<S>(&self, sink: &mut S) -> Result<(), RelayError>
    where
        S: LogEventSink + ?Sized,
    {
        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        loop {
            let (len, from) = self.socket.recv_from(&mut buf).await?;
            match rosc::decoder::decode_udp(&buf[..len]) {
                Ok((_, packet)) => dispatch(packet, sink),
                Err(e) => warn!(%from, error = ?e, "Dropping undecodable datagram"),
            }
        }
    }
}

fn dispatch<S>(packet: OscPacket, sink: &mut S)
where
    S: LogEventSink + ?Sized,
{
    match packet {
        OscPacket::Message(msg) => match decode_message(&msg) {
            Ok(event) => {
                debug!(kind = event.kind_name(), "Log event");
                sink.handle(event);
            }
            Err(DecodeError::UnknownAddress(addr)) => {
                debug!(%addr, "Ignoring message with no handler");
            }
            Err(e) => warn!(error = %e, "Dropping malformed log message"),
        },
        OscPacket::Bundle(bundle) => {
            for inner in bundle.content {
                dispatch(inner, sink);
            }
        }
    }
}
