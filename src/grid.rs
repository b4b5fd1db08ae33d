//! Grid Decoder
//!
//! Turns a memory-dump response into cell states, and maps those states onto
//! a fixed-size board.
//!
//! ## Reply Format
//! ```text
//! ┌────────────┬──────────────────────────────────┬────────────┐
//! │ Prefix (4) │ "0","1",... (comma separated)    │ Suffix (1) │
//! └────────────┴──────────────────────────────────┴────────────┘
//! ```
//! Prefix and suffix are fixed-width framing emitted by the simulator and
//! are never parsed. Values may be wrapped in double quotes.

use crate::config::Config;
use crate::error::{LifeError, Result};

/// Bytes dropped from the front of a dump reply
pub const PREFIX_LEN: usize = 4;

/// Bytes dropped from the end of a dump reply
pub const SUFFIX_LEN: usize = 1;

/// Shortest payload that still has a (possibly empty) data region
pub const MIN_PAYLOAD_LEN: usize = PREFIX_LEN + SUFFIX_LEN;

const SEPARATOR: u8 = b',';
const QUOTE: u8 = b'"';

// =============================================================================
// Decoding
// =============================================================================

/// Slice the data region out of a dump reply
pub fn data_region(payload: &[u8]) -> Result<&[u8]> {
    if payload.len() < MIN_PAYLOAD_LEN {
        return Err(LifeError::PayloadTooShort {
            len: payload.len(),
            min: MIN_PAYLOAD_LEN,
        });
    }
    Ok(&payload[PREFIX_LEN..payload.len() - SUFFIX_LEN])
}

/// Parse a dump reply into cell states, in cell order (row-major)
///
/// All or nothing: the first token that is not a base-10 integer aborts the
/// decode. The number of states is not checked against any grid size.
pub fn parse_grid(payload: &[u8]) -> Result<Vec<i64>> {
    data_region(payload)?
        .split(|&b| b == SEPARATOR)
        .map(parse_token)
        .collect()
}

fn parse_token(raw: &[u8]) -> Result<i64> {
    let trimmed = trim_quotes(raw);
    let parsed = match std::str::from_utf8(trimmed) {
        Ok(text) => text.parse::<i64>().map_err(|e| (text.to_string(), e)),
        // Never a number; parse the lossy form only to get the error,
        // but report the bytes as they arrived.
        Err(_) => String::from_utf8_lossy(trimmed)
            .parse::<i64>()
            .map_err(|e| (trimmed.escape_ascii().to_string(), e)),
    };
    parsed.map_err(|(token, source)| LifeError::Decode { token, source })
}

/// Strip leading and trailing double quotes
fn trim_quotes(raw: &[u8]) -> &[u8] {
    let start = raw.iter().position(|&b| b != QUOTE).unwrap_or(raw.len());
    let end = raw.iter().rposition(|&b| b != QUOTE).map_or(start, |i| i + 1);
    &raw[start..end]
}

// =============================================================================
// Board
// =============================================================================

/// State of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Dead,
    Alive,
}

impl Cell {
    /// Only a state of exactly 1 is alive
    pub fn from_state(state: i64) -> Self {
        if state == 1 {
            Cell::Alive
        } else {
            Cell::Dead
        }
    }

    pub fn is_alive(self) -> bool {
        self == Cell::Alive
    }
}

/// Fixed-size board of cells, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an all-dead board
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Dead; width * height],
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.grid_width, config.grid_height)
    }

    /// Overwrite cells positionally from decoded states
    ///
    /// Extra states are ignored; cells past the end of a short sequence keep
    /// their previous value. Returns how many cells were written.
    pub fn apply(&mut self, states: &[i64]) -> usize {
        let count = states.len().min(self.cells.len());
        for (cell, &state) in self.cells.iter_mut().zip(states) {
            *cell = Cell::from_state(state);
        }
        count
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.cells.get(row * self.width + col).copied()
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1))
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }
}
