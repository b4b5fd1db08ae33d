//! Connection deadline handling
//!
//! The standard library only offers per-operation socket timeouts. An
//! exchange deadline is emulated by re-arming the socket timeout with the
//! time left before every read and write.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::{Duration, Instant};

/// A byte stream whose blocking operations can be bounded
pub trait Transport: Read + Write {
    /// Bound every subsequent read and write by `timeout` (`None` = block)
    fn set_io_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()>;
}

impl Transport for TcpStream {
    fn set_io_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.set_read_timeout(timeout)?;
        self.set_write_timeout(timeout)
    }
}

/// Borrowed stream with an absolute deadline covering every operation on it
pub struct Deadline<'a, T: Transport> {
    inner: &'a mut T,
    /// `None` when `now + timeout` is not representable, i.e. unbounded
    expires_at: Option<Instant>,
}

impl<'a, T: Transport> Deadline<'a, T> {
    /// Arm a deadline `timeout` from now
    pub fn new(inner: &'a mut T, timeout: Duration) -> Self {
        Self {
            inner,
            expires_at: Instant::now().checked_add(timeout),
        }
    }

    /// Time left before the deadline, `None` if unbounded
    pub fn remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    fn arm(&mut self) -> io::Result<()> {
        let Some(remaining) = self.remaining() else {
            return self.inner.set_io_timeout(None);
        };
        // A zero socket timeout is rejected by the OS layer, and means expired here anyway.
        if remaining.is_zero() {
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                "exchange deadline exceeded",
            ));
        }
        self.inner.set_io_timeout(Some(remaining))
    }
}

impl<T: Transport> Read for Deadline<'_, T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.arm()?;
        self.inner.read(buf)
    }
}

impl<T: Transport> Write for Deadline<'_, T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.arm()?;
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
