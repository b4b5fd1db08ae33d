//! Response definitions
//!
//! A response is accepted only when its payload carries the success marker.

use std::borrow::Cow;
use std::fmt;

use crate::error::{LifeError, Result};

/// Substring whose presence marks a successful response (case-sensitive)
pub const SUCCESS_MARKER: &[u8] = b"ok";

/// A successful response from the simulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    payload: Vec<u8>,
}

impl Response {
    /// Accept a payload as a successful response.
    ///
    /// Fails with `LifeError::Remote` carrying the full payload text when the
    /// success marker is absent.
    pub fn from_payload(payload: Vec<u8>) -> Result<Self> {
        if contains_marker(&payload) {
            Ok(Self { payload })
        } else {
            Err(LifeError::Remote(
                String::from_utf8_lossy(&payload).into_owned(),
            ))
        }
    }

    /// Raw payload bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.payload
    }

    /// Payload as text (lossy for non-UTF-8 bytes)
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.payload
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

fn contains_marker(payload: &[u8]) -> bool {
    payload
        .windows(SUCCESS_MARKER.len())
        .any(|window| window == SUCCESS_MARKER)
}
