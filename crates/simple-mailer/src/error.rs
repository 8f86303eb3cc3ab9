//! Error types for mail delivery.

use crate::parser::parse_reply_code;
use crate::types::ReplyCode;
use std::fmt;
use std::io;

/// Result type alias for mail delivery.
pub type Result<T> = std::result::Result<T, Error>;

/// Protocol step a reply belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Server greeting read right after connecting.
    Greeting,
    /// `HELO` command.
    Hello,
    /// `MAIL FROM` command.
    Sender,
    /// `RCPT TO` command (one per recipient).
    Recipient,
    /// `DATA` command.
    DataStart,
    /// Message payload terminated by `CRLF . CRLF`.
    Payload,
    /// `QUIT` command.
    Quit,
}

impl Step {
    /// Returns a short name for the step.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Hello => "HELO",
            Self::Sender => "MAIL FROM",
            Self::Recipient => "RCPT TO",
            Self::DataStart => "DATA",
            Self::Payload => "message payload",
            Self::Quit => "QUIT",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mail delivery error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The transport connection could not be established or failed mid-session.
    #[error("Connection error: {0}")]
    Connection(#[from] io::Error),

    /// The server answered a step with an unexpected reply.
    #[error("Protocol error at {step}: {line}")]
    Protocol {
        /// Step whose reply did not match.
        step: Step,
        /// Raw reply line from the server.
        line: String,
    },

    /// The envelope has no recipients.
    #[error("No recipients specified")]
    NoRecipients,
}

impl Error {
    /// Creates a protocol error from the offending server line.
    #[must_use]
    pub fn protocol(step: Step, line: impl Into<String>) -> Self {
        Self::Protocol {
            step,
            line: line.into(),
        }
    }

    /// Returns the raw server line for protocol errors.
    #[must_use]
    pub fn server_line(&self) -> Option<&str> {
        match self {
            Self::Protocol { line, .. } => Some(line),
            _ => None,
        }
    }

    /// Returns the step that failed for protocol errors.
    #[must_use]
    pub const fn step(&self) -> Option<Step> {
        match self {
            Self::Protocol { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// Returns the reply code of the offending server line, if it has one.
    #[must_use]
    pub fn reply_code(&self) -> Option<ReplyCode> {
        self.server_line().and_then(parse_reply_code)
    }

    /// Returns true if the server rejected the step permanently (5xx).
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        self.reply_code().is_some_and(ReplyCode::is_permanent)
    }

    /// Returns true if the server rejected the step transiently (4xx).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.reply_code().is_some_and(ReplyCode::is_transient)
    }
}
