//! # simple-mailer
//!
//! A minimal, synchronous SMTP client: one message, one connection.
//!
//! ## Features
//!
//! - **Plain SMTP session**: greeting, HELO, MAIL FROM, RCPT TO, DATA, QUIT
//! - **Single-shot errors**: the first unexpected reply aborts the session
//! - **Scoped connections**: the socket is closed on every exit path
//!
//! There is no AUTH, no TLS, no ESMTP and no retrying. Replies are read one
//! line per command, so multi-line replies fail the step they answer.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> simple_mailer::Result<()> {
//!     // Local relay on port 25, sender derived from the local user and host
//!     simple_mailer::send(["ops@example.com"], "Backup finished", "All good.")?;
//!
//!     // Explicit relay and sender
//!     simple_mailer::send_via(
//!         "smtp.example.com",
//!         25,
//!         "backup@example.com",
//!         ["ops@example.com", "oncall@example.com"],
//!         "Backup finished",
//!         "All good.",
//!     )?;
//!     Ok(())
//! }
//! ```
//!
//! ## Session
//!
//! ```text
//! connect ─→ 220 ─→ HELO ─→ 250 ─→ MAIL FROM ─→ 250 ─→ RCPT TO ─→ 250 (×N)
//!         ─→ DATA ─→ 354 ─→ payload ─→ 250 ─→ QUIT ─→ 221 ─→ close
//! ```
//!
//! ## Modules
//!
//! - [`command`]: SMTP command builders
//! - [`connection`]: Transport, line stream and session state machine
//! - [`parser`]: Reply line checks
//! - [`types`]: Envelope, relay address and reply codes

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
mod mailer;
pub mod parser;
pub mod types;

pub use connection::{Session, SmtpStream, Transport};
pub use error::{Error, Result, Step};
pub use mailer::{Mailer, MailerBuilder, default_sender, send, send_as, send_via};
pub use types::{Envelope, Expected, ReplyCode, ServerAddress, compose};
