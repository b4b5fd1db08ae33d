//! Frame codec
//!
//! Encoding and decoding of the length-prefixed envelope.
//!
//! ## Wire Format
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Len (2)  │         Payload             │
//! └──────────┴─────────────────────────────┘
//! ```

use std::io::{self, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{LifeError, Result};

/// Length prefix size: unsigned 16-bit, big-endian
pub const LENGTH_PREFIX_SIZE: usize = 2;

/// Largest payload the length prefix can describe
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

// =============================================================================
// Buffer Encoding/Decoding
// =============================================================================

/// Encode a payload into a frame
///
/// Payloads over `MAX_PAYLOAD_SIZE` are rejected rather than truncated.
pub fn encode_frame(payload: &[u8]) -> Result<Bytes> {
    let len = frame_length(payload)?;

    let mut frame = BytesMut::with_capacity(LENGTH_PREFIX_SIZE + payload.len());
    frame.put_u16(len);
    frame.put_slice(payload);

    Ok(frame.freeze())
}

/// Decode one frame from the front of `bytes`
///
/// Returns the payload and the number of bytes consumed. A buffer that ends
/// before the declared length is a read error, never a short payload.
pub fn decode_frame(bytes: &[u8]) -> Result<(&[u8], usize)> {
    if bytes.len() < LENGTH_PREFIX_SIZE {
        return Err(truncated("response length", LENGTH_PREFIX_SIZE, bytes.len()));
    }

    let payload_len = u16::from_be_bytes([bytes[0], bytes[1]]) as usize;
    let total_len = LENGTH_PREFIX_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(truncated("response", payload_len, bytes.len() - LENGTH_PREFIX_SIZE));
    }

    Ok((&bytes[LENGTH_PREFIX_SIZE..total_len], total_len))
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write one frame to a stream
///
/// The length and the payload are written as two steps so a failure names
/// the step that broke.
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<()> {
    let len = frame_length(payload)?;

    writer
        .write_all(&len.to_be_bytes())
        .map_err(|source| LifeError::Write { stage: "length", source })?;

    writer
        .write_all(payload)
        .and_then(|_| writer.flush())
        .map_err(|source| LifeError::Write { stage: "message", source })?;

    Ok(())
}

/// Read one complete frame from a stream
///
/// Blocks until the declared number of bytes arrived or the stream fails.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut header = [0u8; LENGTH_PREFIX_SIZE];
    reader
        .read_exact(&mut header)
        .map_err(|source| LifeError::Read { stage: "response length", source })?;

    let payload_len = u16::from_be_bytes(header) as usize;

    let mut payload = vec![0u8; payload_len];
    if payload_len > 0 {
        reader
            .read_exact(&mut payload)
            .map_err(|source| LifeError::Read { stage: "response", source })?;
    }

    Ok(payload)
}

fn frame_length(payload: &[u8]) -> Result<u16> {
    u16::try_from(payload.len()).map_err(|_| LifeError::MessageTooLarge {
        size: payload.len(),
        max: MAX_PAYLOAD_SIZE,
    })
}

fn truncated(stage: &'static str, expected: usize, got: usize) -> LifeError {
    LifeError::Read {
        stage,
        source: io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {} bytes, got {}", expected, got),
        ),
    }
}
