//! Command definitions
//!
//! Commands are opaque text; the simulator defines the grammar. The
//! constructors below only spell the shapes this tool sends.

use std::fmt;
use std::path::Path;

/// A text instruction for the simulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command(String);

impl Command {
    /// Load and run the program at `path`
    pub fn start(path: impl AsRef<Path>) -> Self {
        Self(format!("start:{}", path.as_ref().display()))
    }

    /// Dump memory from `start` to `end` (both inclusive)
    pub fn output(start: u32, end: u32) -> Self {
        Self(format!("output:{}:{}", start, end))
    }

    /// Any other command text, sent verbatim
    pub fn raw(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Byte length on the wire
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Command {
    fn from(text: &str) -> Self {
        Self::raw(text)
    }
}

impl From<String> for Command {
    fn from(text: String) -> Self {
        Self::raw(text)
    }
}
