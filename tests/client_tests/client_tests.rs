//! Client Tests
//!
//! These tests verify, against loopback servers standing in for Digital:
//! - Command framing and success-marker handling
//! - Transport failures (connect, truncation)
//! - The single deadline bounding a whole exchange

use std::io::{self, ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use lifehack::network::{connect_and_send, send_over_connection, Client, Transport};
use lifehack::protocol::{read_frame, write_frame, Command, MAX_PAYLOAD_SIZE};
use lifehack::LifeError;

// =============================================================================
// Helper Functions
// =============================================================================

/// Serve one connection with `handler`, returning what it reports
fn serve_once<T, F>(handler: F) -> (SocketAddr, JoinHandle<T>)
where
    T: Send + 'static,
    F: FnOnce(TcpStream) -> T + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        handler(stream)
    });
    (addr, handle)
}

/// Answer one request with `reply`, returning the request payload
fn reply_with(reply: &'static [u8]) -> (SocketAddr, JoinHandle<Vec<u8>>) {
    serve_once(move |mut stream| {
        let request = read_frame(&mut stream).unwrap();
        write_frame(&mut stream, reply).unwrap();
        request
    })
}

fn timeout() -> Duration {
    Duration::from_secs(2)
}

/// Transport that accepts `budget` bytes, then fails every write
struct BrokenWrites {
    budget: usize,
    written: Vec<u8>,
}

impl BrokenWrites {
    fn after(budget: usize) -> Self {
        Self {
            budget,
            written: Vec::new(),
        }
    }
}

impl Read for BrokenWrites {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Ok(0)
    }
}

impl Write for BrokenWrites {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.budget == 0 {
            return Err(io::Error::new(ErrorKind::BrokenPipe, "peer went away"));
        }
        let n = buf.len().min(self.budget);
        self.budget -= n;
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for BrokenWrites {
    fn set_io_timeout(&mut self, _timeout: Option<Duration>) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// Exchange Tests
// =============================================================================

#[test]
fn test_send_ok() {
    let (addr, server) = reply_with(b"ok");
    let client = Client::new(addr.to_string(), timeout());

    let response = client.send(&Command::start("/tmp/Conway32.hex")).unwrap();

    assert_eq!(response.as_bytes(), b"ok");
    assert_eq!(server.join().unwrap(), b"start:/tmp/Conway32.hex");
}

#[test]
fn test_marker_anywhere_in_reply() {
    let (addr, server) = reply_with(b"status=ok done");

    let response = connect_and_send(&addr.to_string(), b"output:0:3", timeout()).unwrap();

    assert_eq!(response.text(), "status=ok done");
    assert_eq!(server.join().unwrap(), b"output:0:3");
}

#[test]
fn test_remote_error() {
    let (addr, server) = reply_with(b"error: bad address");
    let client = Client::new(addr.to_string(), timeout());

    match client.send(&Command::output(1, 0)) {
        Err(LifeError::Remote(detail)) => assert_eq!(detail, "error: bad address"),
        other => panic!("Expected remote error, got {:?}", other),
    }
    server.join().unwrap();
}

#[test]
fn test_reuse_caller_connection() {
    let (addr, server) = serve_once(|mut stream| {
        for reply in [&b"ok first"[..], &b"ok second"[..]] {
            read_frame(&mut stream).unwrap();
            write_frame(&mut stream, reply).unwrap();
        }
    });
    let client = Client::new(addr.to_string(), timeout());
    let mut conn = TcpStream::connect(addr).unwrap();

    let first = client.send_over(&mut conn, b"output:0:0").unwrap();
    let second = client.send_over(&mut conn, b"output:1:1").unwrap();

    assert_eq!(first.as_bytes(), b"ok first");
    assert_eq!(second.as_bytes(), b"ok second");
    server.join().unwrap();
}

// =============================================================================
// Transport Failure Tests
// =============================================================================

#[test]
fn test_connect_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let err = connect_and_send(&addr.to_string(), b"ok?", timeout()).unwrap_err();
    assert!(matches!(err, LifeError::Connect { .. }), "got {:?}", err);
    assert!(err.is_transport());
}

#[test]
fn test_truncated_reply_is_read_error() {
    let (addr, server) = serve_once(|mut stream| {
        read_frame(&mut stream).unwrap();
        // Declares 10 bytes, sends 2, then closes
        stream.write_all(&[0x00, 0x0A, b'o', b'k']).unwrap();
    });

    let err = connect_and_send(&addr.to_string(), b"output:0:3", timeout()).unwrap_err();
    match err {
        LifeError::Read { stage, ref source } => {
            assert_eq!(stage, "response");
            assert_eq!(source.kind(), std::io::ErrorKind::UnexpectedEof);
        }
        ref other => panic!("Expected read error, got {:?}", other),
    }
    assert!(!err.is_timeout());
    server.join().unwrap();
}

#[test]
fn test_oversized_message_fails_fast() {
    let (addr, server) = serve_once(|mut stream| {
        // The client must close without sending anything
        read_frame(&mut stream).is_err()
    });
    let mut conn = TcpStream::connect(addr).unwrap();

    let message = vec![b'x'; MAX_PAYLOAD_SIZE + 1];
    let err = send_over_connection(&mut conn, &message, timeout()).unwrap_err();

    assert!(matches!(err, LifeError::MessageTooLarge { .. }));
    drop(conn);
    assert!(server.join().unwrap());
}

#[test]
fn test_length_write_failure() {
    let mut conn = BrokenWrites::after(0);

    let err = send_over_connection(&mut conn, b"output:0:3", timeout()).unwrap_err();
    match err {
        LifeError::Write { stage, ref source } => {
            assert_eq!(stage, "length");
            assert_eq!(source.kind(), ErrorKind::BrokenPipe);
        }
        ref other => panic!("Expected write error, got {:?}", other),
    }
    assert!(err.is_transport());
    assert!(!err.is_timeout());
    assert!(conn.written.is_empty());
}

#[test]
fn test_message_write_failure() {
    // Length prefix goes out, the command body does not
    let mut conn = BrokenWrites::after(2);

    let err = send_over_connection(&mut conn, b"output:0:3", timeout()).unwrap_err();
    match err {
        LifeError::Write { stage, ref source } => {
            assert_eq!(stage, "message");
            assert_eq!(source.kind(), ErrorKind::BrokenPipe);
        }
        ref other => panic!("Expected write error, got {:?}", other),
    }
    assert_eq!(conn.written, vec![0x00, 0x0A]);
}

#[test]
fn test_partial_message_write_failure() {
    let mut conn = BrokenWrites::after(5);

    let err = send_over_connection(&mut conn, b"output:0:3", timeout()).unwrap_err();
    assert!(matches!(err, LifeError::Write { stage: "message", .. }), "got {:?}", err);
    assert_eq!(conn.written, b"\x00\x0Aout");
}

// =============================================================================
// Deadline Tests
// =============================================================================

#[test]
fn test_unbounded_timeout() {
    let (addr, server) = reply_with(b"ok");
    let mut conn = TcpStream::connect(addr).unwrap();

    let response = send_over_connection(&mut conn, b"output:0:3", Duration::MAX).unwrap();
    assert_eq!(response.as_bytes(), b"ok");
    assert_eq!(server.join().unwrap(), b"output:0:3");
}

#[test]
fn test_unbounded_timeout_through_client() {
    let (addr, server) = reply_with(b"ok");
    let client = Client::new(addr.to_string(), Duration::MAX);

    let response = client.send(&Command::output(0, 3)).unwrap();
    assert_eq!(response.as_bytes(), b"ok");
    server.join().unwrap();
}

#[test]
fn test_connect_time_counts_against_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let err = connect_and_send(&addr.to_string(), b"output:0:3", Duration::ZERO).unwrap_err();
    assert!(err.is_timeout());
    match err {
        LifeError::Connect { ref source, .. } => assert_eq!(source.kind(), ErrorKind::TimedOut),
        ref other => panic!("Expected connect error, got {:?}", other),
    }
}

#[test]
fn test_silent_server_times_out() {
    let (addr, server) = serve_once(|mut stream| {
        read_frame(&mut stream).unwrap();
        thread::sleep(Duration::from_millis(1500));
    });

    let started = Instant::now();
    let err = connect_and_send(&addr.to_string(), b"output:0:3", Duration::from_millis(200))
        .unwrap_err();

    assert!(err.is_timeout(), "got {:?}", err);
    assert!(matches!(err, LifeError::Read { stage: "response length", .. }));
    assert!(started.elapsed() < Duration::from_millis(1200));
    server.join().unwrap();
}

#[test]
fn test_deadline_covers_whole_exchange() {
    // Each step alone fits in the timeout; together they do not.
    let (addr, server) = serve_once(|mut stream| {
        read_frame(&mut stream).unwrap();
        thread::sleep(Duration::from_millis(300));
        let _ = stream.write_all(&[0x00, 0x02]);
        thread::sleep(Duration::from_millis(400));
        let _ = stream.write_all(b"ok");
        thread::sleep(Duration::from_millis(500));
    });

    let started = Instant::now();
    let err = connect_and_send(&addr.to_string(), b"output:0:3", Duration::from_millis(450))
        .unwrap_err();

    assert!(err.is_timeout(), "got {:?}", err);
    assert!(matches!(err, LifeError::Read { stage: "response", .. }));
    assert!(started.elapsed() < Duration::from_millis(650));
    server.join().unwrap();
}
