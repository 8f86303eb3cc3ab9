//! Core mail types.

mod envelope;
mod reply;
mod server;

pub use envelope::{DATA_TERMINATOR, Envelope, LINE_SEPARATOR, compose, compose_at};
pub use reply::{Expected, ReplyCode};
pub use server::{DEFAULT_HOST, DEFAULT_PORT, ServerAddress};
