//! SMTP reply line checks.
//!
//! Replies are read one line at a time. Continuation lines of a multi-line
//! reply (`250-...`) are not joined; they simply fail the prefix check.

use crate::types::{Expected, ReplyCode};

/// Returns true if `line` begins with the exact prefix `expected` demands.
///
/// `"250 OK"` matches [`Expected::Ok`]; `"250-OK"`, `"250"` and `" 250 OK"`
/// do not.
#[must_use]
pub fn matches_expected(line: &str, expected: Expected) -> bool {
    line.starts_with(expected.prefix())
}

/// Extracts the leading three digit reply code from a server line.
#[must_use]
pub fn parse_reply_code(line: &str) -> Option<ReplyCode> {
    let code_str = line.get(0..3)?;
    if !code_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    code_str.parse::<u16>().ok().map(ReplyCode::new)
}

/// Returns true if `line` continues a multi-line reply.
#[must_use]
pub fn is_continuation_line(line: &str) -> bool {
    line.len() >= 4 && line.as_bytes()[3] == b'-'
}
