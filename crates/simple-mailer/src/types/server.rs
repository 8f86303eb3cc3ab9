//! Relay address.

use std::fmt;

/// Host used when no relay is given.
pub const DEFAULT_HOST: &str = "localhost";

/// Standard SMTP port.
pub const DEFAULT_PORT: u16 = 25;

/// Mail relay to connect to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerAddress {
    /// Relay hostname or IP address.
    pub host: String,
    /// Relay port.
    pub port: u16,
}

impl ServerAddress {
    /// Creates a new server address.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for ServerAddress {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
