//! Network endpoint for outbound OSC channels.

use std::fmt;

/// Client identity sent as the first argument of every control command.
///
/// The server uses it to attribute commands; the value is kept identical to
/// the one older Sonic Pi builds already recognise.
pub const CLIENT_NAME: &str = "SONIC_PI_TOOL_PY";

/// Host and port of a UDP destination. Immutable once a channel owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_brackets_ipv6_hosts() {
        assert_eq!(Endpoint::new("127.0.0.1", 4557).to_string(), "127.0.0.1:4557");
        assert_eq!(Endpoint::new("::1", 4557).to_string(), "[::1]:4557");
    }
}
