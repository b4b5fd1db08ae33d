//! Error types for lifehack
//!
//! Provides a unified error type for the protocol client, the grid decoder
//! and the glue around them.

use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using LifeError
pub type Result<T> = std::result::Result<T, LifeError>;

/// Unified error type for lifehack operations
#[derive(Debug, Error)]
pub enum LifeError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("error writing {stage}: {source}")]
    Write {
        stage: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("error reading {stage}: {source}")]
    Read {
        stage: &'static str,
        #[source]
        source: io::Error,
    },

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    /// Well-framed response that lacks the success marker
    #[error("error from remote server: {0}")]
    Remote(String),

    #[error("message too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },

    // -------------------------------------------------------------------------
    // Decode Errors
    // -------------------------------------------------------------------------
    #[error("error converting value {token:?} to int: {source}")]
    Decode {
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("grid payload too short: {len} bytes (min {min})")]
    PayloadTooShort { len: usize, min: usize },

    // -------------------------------------------------------------------------
    // Process / Configuration Errors
    // -------------------------------------------------------------------------
    #[error("failed to start simulator {}: {source}", .program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl LifeError {
    /// Returns true when the error is a transport failure caused by the
    /// call's deadline expiring.
    pub fn is_timeout(&self) -> bool {
        match self {
            LifeError::Connect { source, .. }
            | LifeError::Write { source, .. }
            | LifeError::Read { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }

    /// Returns true for connect, write and read failures.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            LifeError::Connect { .. } | LifeError::Write { .. } | LifeError::Read { .. }
        )
    }
}
