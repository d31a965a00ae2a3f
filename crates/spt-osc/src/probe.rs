//! Port availability probing.

use std::net::UdpSocket;

use tracing::debug;

/// Check whether a local UDP port is taken by attempting to bind to it.
///
/// The probe socket is dropped immediately, releasing the port.
pub fn port_in_use(port: u16) -> bool {
    match UdpSocket::bind(("127.0.0.1", port)) {
        Ok(_) => false,
        Err(e) => {
            debug!(port, error = %e, "Port bind failed");
            true
        }
    }
}
