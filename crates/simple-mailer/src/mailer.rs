//! Entry points for sending one message.

use crate::connection::{Session, connect};
use crate::error::Result;
use crate::types::{DEFAULT_HOST, DEFAULT_PORT, Envelope, ServerAddress};
use std::time::Duration;

/// Sends messages through one relay, one connection per message.
#[derive(Debug, Clone, Default)]
pub struct Mailer {
    server: ServerAddress,
    connect_timeout: Option<Duration>,
    io_timeout: Option<Duration>,
}

impl Mailer {
    /// Creates a mailer for `server` with no timeouts.
    #[must_use]
    pub const fn new(server: ServerAddress) -> Self {
        Self {
            server,
            connect_timeout: None,
            io_timeout: None,
        }
    }

    /// Creates a mailer builder.
    #[must_use]
    pub fn builder() -> MailerBuilder {
        MailerBuilder::new()
    }

    /// Returns the relay this mailer connects to.
    #[must_use]
    pub const fn server(&self) -> &ServerAddress {
        &self.server
    }

    /// Returns the connection timeout, if any.
    #[must_use]
    pub const fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    /// Returns the read/write timeout, if any.
    #[must_use]
    pub const fn io_timeout(&self) -> Option<Duration> {
        self.io_timeout
    }

    /// Connects to the relay, delivers `envelope` and disconnects.
    ///
    /// Without an I/O timeout a relay that stops answering blocks this call
    /// forever.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`](crate::Error::Connection) if the relay
    /// cannot be reached or the connection fails, and
    /// [`Error::Protocol`](crate::Error::Protocol) on the first unexpected
    /// reply. The server may already have accepted part of the transaction.
    pub fn send(&self, envelope: &Envelope) -> Result<()> {
        let stream = connect(&self.server, self.connect_timeout, self.io_timeout)?;

        tracing::debug!(
            server = %self.server,
            recipients = envelope.recipients().len(),
            "Sending message"
        );
        Session::new(stream).deliver(&self.server.host, envelope)
    }
}

/// Builder for [`Mailer`].
#[derive(Debug, Clone)]
pub struct MailerBuilder {
    host: String,
    port: u16,
    connect_timeout: Option<Duration>,
    io_timeout: Option<Duration>,
}

impl Default for MailerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MailerBuilder {
    /// Creates a builder targeting the local relay on port 25.
    #[must_use]
    pub fn new() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            connect_timeout: None,
            io_timeout: None,
        }
    }

    /// Sets the relay host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the relay port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the read/write timeout applied to every reply.
    #[must_use]
    pub const fn io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = Some(timeout);
        self
    }

    /// Builds the mailer.
    #[must_use]
    pub fn build(self) -> Mailer {
        Mailer {
            server: ServerAddress::new(self.host, self.port),
            connect_timeout: self.connect_timeout,
            io_timeout: self.io_timeout,
        }
    }
}

/// Returns `<local-user>@<local-hostname>`.
///
/// Either part falls back to `localhost` when it cannot be determined.
#[must_use]
pub fn default_sender() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|user| !user.is_empty())
        .unwrap_or_else(|| DEFAULT_HOST.to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .ok()
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| DEFAULT_HOST.to_string());

    format!("{user}@{host}")
}

/// Sends a message from [`default_sender`] through the local relay on port 25.
///
/// # Errors
///
/// Returns an error if `recipients` is empty or delivery fails.
pub fn send<I, R>(recipients: I, subject: &str, body: &str) -> Result<()>
where
    I: IntoIterator<Item = R>,
    R: Into<String>,
{
    send_as(&default_sender(), recipients, subject, body)
}

/// Sends a message from `sender` through the local relay on port 25.
///
/// # Errors
///
/// Returns an error if `recipients` is empty or delivery fails.
pub fn send_as<I, R>(sender: &str, recipients: I, subject: &str, body: &str) -> Result<()>
where
    I: IntoIterator<Item = R>,
    R: Into<String>,
{
    let envelope = Envelope::new(sender, recipients, subject, body)?;
    Mailer::default().send(&envelope)
}

/// Sends a message from `sender` through the relay at `server:port`.
///
/// # Errors
///
/// Returns an error if `recipients` is empty or delivery fails.
pub fn send_via<I, R>(
    server: &str,
    port: u16,
    sender: &str,
    recipients: I,
    subject: &str,
    body: &str,
) -> Result<()>
where
    I: IntoIterator<Item = R>,
    R: Into<String>,
{
    let envelope = Envelope::new(sender, recipients, subject, body)?;
    Mailer::new(ServerAddress::new(server, port)).send(&envelope)
}
