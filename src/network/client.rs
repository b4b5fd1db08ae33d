//! Protocol Client
//!
//! Frames a command, sends it, reads the framed reply and validates it.

use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::{LifeError, Result};
use crate::protocol::{read_frame, write_frame, Command, Response};

use super::connection::{Deadline, Transport};

/// Client for one simulator address
///
/// Holds no connection between calls; every `send` opens a fresh one.
#[derive(Debug, Clone)]
pub struct Client {
    server_addr: String,
    timeout: Duration,
}

impl Client {
    pub fn new(server_addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            server_addr: server_addr.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.server_addr.clone(), config.timeout)
    }

    pub fn server_addr(&self) -> &str {
        &self.server_addr
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send a command over a new connection and return the response
    pub fn send(&self, command: &Command) -> Result<Response> {
        connect_and_send(&self.server_addr, command.as_bytes(), self.timeout)
    }

    /// Send a message over an existing connection and return the response
    pub fn send_over<T: Transport>(&self, conn: &mut T, message: &[u8]) -> Result<Response> {
        send_over_connection(conn, message, self.timeout)
    }
}

/// Open a connection to `server_addr`, perform one exchange, close it.
///
/// `timeout` is shared by connecting and the exchange: time spent trying
/// resolved addresses is charged against it. The connection is closed on
/// every exit path when the stream drops.
pub fn connect_and_send(server_addr: &str, message: &[u8], timeout: Duration) -> Result<Response> {
    let started = Instant::now();
    let mut stream = connect(server_addr, timeout, started)?;
    tracing::debug!("Connected to {} in {:?}", server_addr, started.elapsed());

    send_over_connection(&mut stream, message, timeout.saturating_sub(started.elapsed()))
}

/// Perform one exchange on a caller-supplied connection.
///
/// `timeout` bounds the whole exchange, not each step. The connection's
/// timeouts are left armed when this returns. Oversized messages are
/// rejected by the frame writer before any byte is sent.
pub fn send_over_connection<T: Transport>(
    conn: &mut T,
    message: &[u8],
    timeout: Duration,
) -> Result<Response> {
    let mut stream = Deadline::new(conn, timeout);

    write_frame(&mut stream, message)?;
    tracing::trace!("Sent {} byte command", message.len());

    let payload = read_frame(&mut stream)?;
    tracing::trace!(
        "Received {} byte response ({:?} left)",
        payload.len(),
        stream.remaining()
    );

    Response::from_payload(payload)
}

/// Connect to the first reachable resolved address before `timeout`
/// (measured from `started`) runs out
fn connect(server_addr: &str, timeout: Duration, started: Instant) -> Result<TcpStream> {
    let connect_err = |source| LifeError::Connect {
        addr: server_addr.to_string(),
        source,
    };

    let mut last_err = None;
    for addr in server_addr.to_socket_addrs().map_err(connect_err)? {
        let left = timeout.saturating_sub(started.elapsed());
        if left.is_zero() {
            last_err = Some(io::Error::new(io::ErrorKind::TimedOut, "connect deadline exceeded"));
            break;
        }
        match TcpStream::connect_timeout(&addr, left) {
            Ok(stream) => {
                // Commands are tiny; don't let Nagle hold them back.
                stream.set_nodelay(true).map_err(connect_err)?;
                return Ok(stream);
            }
            Err(e) => last_err = Some(e),
        }
    }

    Err(connect_err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::AddrNotAvailable, "address resolved to nothing")
    })))
}
