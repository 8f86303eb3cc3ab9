//! Message envelope and the DATA payload built from it.

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, Local};
use std::fmt::Write;

/// Line separator used between header lines and after the body.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";

/// Line separator used between header lines and after the body.
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// End-of-data marker closing the DATA payload.
pub const DATA_TERMINATOR: &str = "\r\n.\r\n";

/// Sender, recipients, subject and body of one outbound message.
///
/// Every field is used verbatim: addresses are not validated and header
/// values are neither folded nor encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    sender: String,
    recipients: Vec<String>,
    subject: String,
    body: String,
}

impl Envelope {
    /// Creates a new envelope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRecipients`] if `recipients` is empty.
    pub fn new<I, R>(
        sender: impl Into<String>,
        recipients: I,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        let recipients: Vec<String> = recipients.into_iter().map(Into::into).collect();
        if recipients.is_empty() {
            return Err(Error::NoRecipients);
        }

        Ok(Self {
            sender: sender.into(),
            recipients,
            subject: subject.into(),
            body: body.into(),
        })
    }

    /// Returns the sender address.
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the recipient addresses in delivery order. Never empty.
    #[must_use]
    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    /// Returns the subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the message body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Builds the DATA payload for `envelope`, dated now.
///
/// The clock is read on every call; compose right before sending.
#[must_use]
pub fn compose(envelope: &Envelope) -> String {
    compose_at(envelope, Local::now().fixed_offset())
}

/// Builds the DATA payload for `envelope` with the given `Date:` value.
///
/// Layout:
///
/// ```text
/// From: <sender>
/// To: <recipient>        (one line per recipient)
/// Date: <RFC 2822 date>
/// Subject: <subject>
/// <body>
/// ```
///
/// followed by [`DATA_TERMINATOR`]. Lines end with [`LINE_SEPARATOR`].
/// Body lines starting with `.` are not dot-stuffed, so a body line holding
/// a single `.` ends the message early on the server side.
#[must_use]
pub fn compose_at(envelope: &Envelope, date: DateTime<FixedOffset>) -> String {
    let mut payload = String::new();

    let _ = write!(payload, "From: {}{LINE_SEPARATOR}", envelope.sender);
    for recipient in &envelope.recipients {
        let _ = write!(payload, "To: {recipient}{LINE_SEPARATOR}");
    }
    let _ = write!(payload, "Date: {}{LINE_SEPARATOR}", date.to_rfc2822());
    let _ = write!(payload, "Subject: {}{LINE_SEPARATOR}", envelope.subject);
    let _ = write!(payload, "{}{LINE_SEPARATOR}", envelope.body);

    payload.push_str(DATA_TERMINATOR);
    payload
}
