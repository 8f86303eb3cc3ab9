//! SMTP session state machine.

use super::{SmtpStream, Transport};
use crate::command::Command;
use crate::error::{Error, Result, Step};
use crate::parser::{is_continuation_line, matches_expected};
use crate::types::{Envelope, Expected, compose};

/// One SMTP session over an exclusively owned transport.
///
/// The steps run strictly in order and each waits for its single reply line
/// before the next command is written. The first unexpected reply ends the
/// session. The transport is closed when the session is dropped, whether
/// delivery succeeded or not.
#[derive(Debug)]
pub struct Session<T: Transport> {
    stream: SmtpStream<T>,
}

impl<T: Transport> Session<T> {
    /// Creates a session over a freshly connected stream.
    pub const fn new(stream: SmtpStream<T>) -> Self {
        Self { stream }
    }

    /// Delivers `envelope`, greeting the relay as `hostname`.
    ///
    /// Runs greeting, `HELO`, `MAIL FROM`, one `RCPT TO` per recipient,
    /// `DATA`, the payload and `QUIT`. Commands already accepted are not
    /// undone when a later step fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] on the first reply that does not carry
    /// the expected prefix and [`Error::Connection`] if the transport fails.
    pub fn deliver(mut self, hostname: &str, envelope: &Envelope) -> Result<()> {
        self.expect(Step::Greeting, Expected::Start)?;

        self.execute(Command::Helo { hostname })?;
        self.execute(Command::MailFrom {
            from: envelope.sender(),
        })?;
        for to in envelope.recipients() {
            self.execute(Command::RcptTo { to })?;
        }
        self.execute(Command::Data)?;

        let message = compose(envelope);
        self.execute(Command::Payload { message: &message })?;

        self.execute(Command::Quit)?;
        Ok(())
    }

    /// Writes `cmd` and checks the reply line it gets back.
    fn execute(&mut self, cmd: Command<'_>) -> Result<String> {
        let data = cmd.serialize();
        if let Command::Payload { message } = cmd {
            tracing::trace!(bytes = message.len(), "C: <payload>");
        } else {
            let text = String::from_utf8_lossy(&data);
            tracing::trace!(command = %text.trim_end(), "C:");
        }

        self.stream.write_all(&data)?;
        self.expect(cmd.step(), cmd.expected())
    }

    fn expect(&mut self, step: Step, expected: Expected) -> Result<String> {
        let line = self.stream.read_line()?;
        tracing::trace!(%line, "S:");

        if matches_expected(&line, expected) {
            return Ok(line);
        }

        if is_continuation_line(&line) {
            tracing::warn!(%step, %line, "Multi-line reply is not supported");
        } else {
            tracing::warn!(%step, %line, expected = expected.prefix(), "Unexpected reply");
        }
        Err(Error::protocol(step, line))
    }
}

impl<T: Transport> Drop for Session<T> {
    fn drop(&mut self) {
        if let Err(e) = self.stream.close() {
            tracing::debug!(?e, "Failed to close connection");
        } else {
            tracing::debug!("Connection closed");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;
    use crate::types::LINE_SEPARATOR;
    use std::cell::{Cell, RefCell};
    use std::io::{self, Cursor, Read, Write};
    use std::rc::Rc;

    /// Mock transport that returns predefined replies.
    struct MockTransport {
        /// Replies to return (in order).
        replies: Cursor<Vec<u8>>,
        /// Captured bytes sent by the client.
        sent: Rc<RefCell<Vec<u8>>>,
        closed: Rc<Cell<bool>>,
        fail_close: bool,
    }

    struct Probe {
        sent: Rc<RefCell<Vec<u8>>>,
        closed: Rc<Cell<bool>>,
    }

    impl Probe {
        fn sent(&self) -> String {
            String::from_utf8(self.sent.borrow().clone()).unwrap()
        }

        fn commands(&self) -> Vec<String> {
            self.sent()
                .split("\r\n")
                .filter(|line| !line.is_empty())
                .map(ToString::to_string)
                .collect()
        }
    }

    fn mock(replies: &str) -> (MockTransport, Probe) {
        let sent = Rc::new(RefCell::new(Vec::new()));
        let closed = Rc::new(Cell::new(false));
        let transport = MockTransport {
            replies: Cursor::new(replies.as_bytes().to_vec()),
            sent: Rc::clone(&sent),
            closed: Rc::clone(&closed),
            fail_close: false,
        };
        (transport, Probe { sent, closed })
    }

    impl Read for MockTransport {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.replies.read(buf)
        }
    }

    impl Write for MockTransport {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.sent.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Transport for MockTransport {
        fn close(&mut self) -> io::Result<()> {
            self.closed.set(true);
            if self.fail_close {
                return Err(io::Error::new(io::ErrorKind::NotConnected, "already gone"));
            }
            Ok(())
        }
    }

    const HAPPY: &str = "220 relay ready\r\n\
                         250 hello\r\n\
                         250 sender ok\r\n\
                         250 rcpt ok\r\n\
                         250 rcpt ok\r\n\
                         354 go ahead\r\n\
                         250 queued\r\n\
                         221 bye\r\n";

    fn envelope() -> Envelope {
        Envelope::new("a@x.com", ["b@y.com", "c@z.com"], "Hi", "Hello").unwrap()
    }

    fn deliver(replies: &str) -> (Result<()>, Probe) {
        let (transport, probe) = mock(replies);
        let result = Session::new(SmtpStream::new(transport)).deliver("relay.example.com", &envelope());
        (result, probe)
    }

    #[test]
    fn test_full_session_command_order() {
        let (result, probe) = deliver(HAPPY);
        result.unwrap();

        let sent = probe.sent();
        assert!(sent.starts_with(
            "HELO relay.example.com\r\n\
             MAIL FROM:<a@x.com>\r\n\
             RCPT TO:<b@y.com>\r\n\
             RCPT TO:<c@z.com>\r\n\
             DATA\r\n\
             From: a@x.com"
        ));
        assert!(sent.ends_with(&format!("Hello{LINE_SEPARATOR}\r\n.\r\nQUIT\r\n")));
        assert!(probe.closed.get());
    }

    #[test]
    fn test_payload_has_no_trailing_line_ending() {
        let (result, probe) = deliver(HAPPY);
        result.unwrap();

        let sent = probe.sent();
        let payload_start = sent.find("From: ").unwrap();
        let quit = sent.rfind("QUIT\r\n").unwrap();
        assert!(sent[payload_start..quit].ends_with("\r\n.\r\n"));
        assert!(!sent[payload_start..quit].ends_with("\r\n.\r\n\r\n"));
    }

    #[test]
    fn test_rejected_recipient_aborts() {
        let replies = "220 relay ready\r\n\
                       250 hello\r\n\
                       250 sender ok\r\n\
                       550 rejected\r\n";
        let (result, probe) = deliver(replies);

        let err = result.unwrap_err();
        assert_eq!(err.server_line(), Some("550 rejected"));
        assert_eq!(err.step(), Some(Step::Recipient));
        assert!(err.is_permanent());

        let commands = probe.commands();
        assert_eq!(commands.last().unwrap(), "RCPT TO:<b@y.com>");
        assert!(!commands.iter().any(|c| c == "RCPT TO:<c@z.com>"));
        assert!(!commands.iter().any(|c| c == "DATA" || c == "QUIT"));
        assert!(probe.closed.get());
    }

    #[test]
    fn test_bad_greeting_sends_nothing() {
        let (result, probe) = deliver("554 go away\r\n");

        let err = result.unwrap_err();
        assert_eq!(err.step(), Some(Step::Greeting));
        assert_eq!(err.server_line(), Some("554 go away"));
        assert!(probe.sent().is_empty());
        assert!(probe.closed.get());
    }

    #[test]
    fn test_data_requires_354() {
        let replies = "220 relay ready\r\n\
                       250 hello\r\n\
                       250 sender ok\r\n\
                       250 rcpt ok\r\n\
                       250 rcpt ok\r\n\
                       250 not what you wanted\r\n";
        let (result, probe) = deliver(replies);

        assert_eq!(result.unwrap_err().step(), Some(Step::DataStart));
        assert!(!probe.sent().contains("From: "));
    }

    #[test]
    fn test_quit_requires_221() {
        let replies = HAPPY.replace("221 bye", "250 bye");
        let (result, _) = deliver(&replies);

        let err = result.unwrap_err();
        assert_eq!(err.step(), Some(Step::Quit));
        assert_eq!(err.server_line(), Some("250 bye"));
    }

    #[test]
    fn test_multi_line_reply_fails_step() {
        let replies = "220 relay ready\r\n\
                       250-relay.example.com\r\n\
                       250 HELP\r\n";
        let (result, probe) = deliver(replies);

        let err = result.unwrap_err();
        assert_eq!(err.step(), Some(Step::Hello));
        assert_eq!(err.server_line(), Some("250-relay.example.com"));
        assert_eq!(probe.commands(), ["HELO relay.example.com"]);
    }

    #[test]
    fn test_code_without_space_fails_step() {
        let (result, _) = deliver("220\r\n");
        assert_eq!(result.unwrap_err().server_line(), Some("220"));
    }

    #[test]
    fn test_eof_is_connection_error() {
        let (result, probe) = deliver("220 relay ready\r\n");
        assert!(matches!(result, Err(Error::Connection(_))));
        assert!(probe.closed.get());
    }

    #[test]
    fn test_lone_dot_body_line_is_not_stuffed() {
        let (transport, probe) = mock(HAPPY);
        let envelope = Envelope::new("a@x.com", ["b@y.com", "c@z.com"], "Hi", "one\r\n.\r\ntwo").unwrap();
        Session::new(SmtpStream::new(transport))
            .deliver("relay.example.com", &envelope)
            .unwrap();

        assert!(probe.sent().contains("one\r\n.\r\ntwo"));
        assert!(!probe.sent().contains("\r\n..\r\n"));
    }

    #[test]
    fn test_close_failure_does_not_mask_result() {
        let (mut transport, probe) = mock(HAPPY);
        transport.fail_close = true;

        Session::new(SmtpStream::new(transport))
            .deliver("relay.example.com", &envelope())
            .unwrap();
        assert!(probe.closed.get());
    }
}
