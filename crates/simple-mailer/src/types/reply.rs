//! SMTP reply codes and the replies each step expects.

/// SMTP reply code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReplyCode(u16);

impl ReplyCode {
    /// Creates a new reply code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns true if this is a transient error (4xx).
    #[must_use]
    pub const fn is_transient(self) -> bool {
        self.0 >= 400 && self.0 < 500
    }

    /// Returns true if this is a permanent error (5xx).
    #[must_use]
    pub const fn is_permanent(self) -> bool {
        self.0 >= 500 && self.0 < 600
    }
}

impl std::fmt::Display for ReplyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Codes the session expects
impl ReplyCode {
    /// 220 Service ready
    pub const SERVICE_READY: Self = Self(220);
    /// 221 Service closing transmission channel
    pub const CLOSING: Self = Self(221);
    /// 250 Requested mail action okay, completed
    pub const OK: Self = Self(250);
    /// 354 Start mail input
    pub const START_DATA: Self = Self(354);
}

/// Reply a session step must receive before the next step may run.
///
/// A server line satisfies an expectation only if it starts with the exact
/// [`prefix`](Self::prefix): the three digit code followed by a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expected {
    /// Greeting after connect (`220 `).
    Start,
    /// Accepted command (`250 `).
    Ok,
    /// Ready for message input (`354 `).
    Data,
    /// Closing after `QUIT` (`221 `).
    End,
}

impl Expected {
    /// Returns the literal prefix the reply line must begin with.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Start => "220 ",
            Self::Ok => "250 ",
            Self::Data => "354 ",
            Self::End => "221 ",
        }
    }
}
