//! SMTP command builder.

use crate::error::Step;
use crate::types::Expected;

/// Client command for one session step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// `HELO <hostname>`
    Helo {
        /// Name sent in the greeting (the relay host name).
        hostname: &'a str,
    },
    /// `MAIL FROM:<address>`
    MailFrom {
        /// Sender address.
        from: &'a str,
    },
    /// `RCPT TO:<address>`
    RcptTo {
        /// Recipient address.
        to: &'a str,
    },
    /// `DATA`
    Data,
    /// Composed message, already ending in `CRLF . CRLF`.
    Payload {
        /// Message text written as-is.
        message: &'a str,
    },
    /// `QUIT`
    Quit,
}

impl Command<'_> {
    /// Serializes the command to bytes.
    ///
    /// Commands end with CRLF. The payload is written unchanged since it
    /// already carries its own terminator.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        match self {
            Self::Helo { hostname } => {
                buf.extend_from_slice(b"HELO ");
                buf.extend_from_slice(hostname.as_bytes());
            }
            Self::MailFrom { from } => {
                buf.extend_from_slice(b"MAIL FROM:<");
                buf.extend_from_slice(from.as_bytes());
                buf.push(b'>');
            }
            Self::RcptTo { to } => {
                buf.extend_from_slice(b"RCPT TO:<");
                buf.extend_from_slice(to.as_bytes());
                buf.push(b'>');
            }
            Self::Data => {
                buf.extend_from_slice(b"DATA");
            }
            Self::Payload { message } => {
                buf.extend_from_slice(message.as_bytes());
                return buf;
            }
            Self::Quit => {
                buf.extend_from_slice(b"QUIT");
            }
        }

        buf.extend_from_slice(b"\r\n");
        buf
    }

    /// Returns the reply the server must send back.
    #[must_use]
    pub const fn expected(&self) -> Expected {
        match self {
            Self::Helo { .. }
            | Self::MailFrom { .. }
            | Self::RcptTo { .. }
            | Self::Payload { .. } => Expected::Ok,
            Self::Data => Expected::Data,
            Self::Quit => Expected::End,
        }
    }

    /// Returns the session step this command performs.
    #[must_use]
    pub const fn step(&self) -> Step {
        match self {
            Self::Helo { .. } => Step::Hello,
            Self::MailFrom { .. } => Step::Sender,
            Self::RcptTo { .. } => Step::Recipient,
            Self::Data => Step::DataStart,
            Self::Payload { .. } => Step::Payload,
            Self::Quit => Step::Quit,
        }
    }
}
