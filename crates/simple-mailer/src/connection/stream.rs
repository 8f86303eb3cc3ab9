//! Low-level SMTP stream handling.

use crate::error::{Error, Result};
use crate::types::ServerAddress;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Byte stream a session talks over.
pub trait Transport: Read + Write {
    /// Closes both directions of the transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying close fails.
    fn close(&mut self) -> io::Result<()>;
}

impl Transport for TcpStream {
    fn close(&mut self) -> io::Result<()> {
        self.shutdown(Shutdown::Both)
    }
}

/// Line-oriented SMTP stream.
#[derive(Debug)]
pub struct SmtpStream<T: Transport> {
    reader: BufReader<T>,
}

impl<T: Transport> SmtpStream<T> {
    /// Wraps a transport.
    pub fn new(transport: T) -> Self {
        Self {
            reader: BufReader::new(transport),
        }
    }

    /// Reads one reply line, without its line ending.
    ///
    /// Blocks until a full line arrives, the peer closes, or a configured
    /// read timeout elapses.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the peer closed the connection.
    pub fn read_line(&mut self) -> Result<String> {
        let mut buf = Vec::new();
        let read = self.reader.read_until(b'\n', &mut buf)?;
        if read == 0 {
            return Err(Error::Connection(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed before reply",
            )));
        }

        let line = String::from_utf8_lossy(&buf);
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Writes data to the stream and flushes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_all(&mut self, data: &[u8]) -> Result<()> {
        let transport = self.reader.get_mut();
        transport.write_all(data)?;
        transport.flush()?;
        Ok(())
    }

    /// Closes the underlying transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the close fails.
    pub fn close(&mut self) -> io::Result<()> {
        self.reader.get_mut().close()
    }
}

/// Connects to an SMTP relay over plain TCP.
///
/// With `connect_timeout` unset the OS default applies; with `io_timeout`
/// unset reads and writes block indefinitely.
///
/// # Errors
///
/// Returns an error if the address cannot be resolved or the connection fails.
pub fn connect(
    server: &ServerAddress,
    connect_timeout: Option<Duration>,
    io_timeout: Option<Duration>,
) -> Result<SmtpStream<TcpStream>> {
    let addr = (server.host.as_str(), server.port);
    let stream = match connect_timeout {
        None => TcpStream::connect(addr)?,
        Some(timeout) => connect_with_timeout(addr, timeout)?,
    };

    stream.set_read_timeout(io_timeout)?;
    stream.set_write_timeout(io_timeout)?;

    tracing::debug!(%server, "Connected");
    Ok(SmtpStream::new(stream))
}

/// Tries every resolved address in turn, returning the last failure.
fn connect_with_timeout(addr: impl ToSocketAddrs, timeout: Duration) -> io::Result<TcpStream> {
    let mut last_err = None;
    for socket_addr in addr.to_socket_addrs()? {
        match TcpStream::connect_timeout(&socket_addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!(%socket_addr, ?e, "Connection attempt failed");
                last_err = Some(e);
            }
        }
    }

    Err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "address resolved to nothing")
    }))
}
