//! Configuration for lifehack
//!
//! Centralized configuration with sensible defaults. Every component takes
//! its settings from an explicit `Config` value; nothing is process-global.

use std::time::Duration;

use crate::error::{LifeError, Result};
use crate::protocol::Command;

/// First memory address of the reference board's cell region
pub const DEFAULT_READOUT_START: u32 = 0x2000;

/// Main configuration for a lifehack session
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Address of the simulator's remote interface (host:port)
    pub server_addr: String,

    /// Bound on one whole call: connect, write and read
    pub timeout: Duration,

    // -------------------------------------------------------------------------
    // Grid Configuration
    // -------------------------------------------------------------------------
    /// Cells per row
    pub grid_width: usize,

    /// Number of rows
    pub grid_height: usize,

    /// First memory address of the cell region (inclusive)
    pub readout_start: u32,

    /// Last memory address of the cell region (inclusive)
    pub readout_end: u32,

    // -------------------------------------------------------------------------
    // Timing Configuration
    // -------------------------------------------------------------------------
    /// Delay between polling iterations, also used after a failed one
    pub poll_interval: Duration,

    /// Time given to the simulator to open its port after launch
    pub startup_delay: Duration,

    /// Pause after the start command before polling begins
    pub settle_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "localhost:41114".to_string(),
            timeout: Duration::from_secs(5),
            grid_width: 32,
            grid_height: 32,
            readout_start: DEFAULT_READOUT_START,
            readout_end: DEFAULT_READOUT_START + 0x3FF,
            poll_interval: Duration::from_millis(10),
            startup_delay: Duration::from_secs(3),
            settle_delay: Duration::from_secs(1),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Number of cells in the grid
    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// The memory dump command covering the cell region
    pub fn readout_command(&self) -> Command {
        Command::output(self.readout_start, self.readout_end)
    }
}

/// Inclusive address range holding `cells` consecutive cells from `start`
///
/// Fails for an empty board or when the range does not fit in 32 bits.
pub fn readout_span(start: u32, cells: usize) -> Result<(u32, u32)> {
    let end = u32::try_from(cells)
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|last| start.checked_add(last))
        .ok_or_else(|| {
            LifeError::Config(format!(
                "cannot map {} cells from address {:#x}",
                cells, start
            ))
        })?;
    Ok((start, end))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the simulator address
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.server_addr = addr.into();
        self
    }

    /// Set the per-exchange timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set a square grid of `size` x `size` cells
    pub fn grid_size(mut self, size: usize) -> Self {
        self.config.grid_width = size;
        self.config.grid_height = size;
        self
    }

    /// Set the grid dimensions
    pub fn grid_dimensions(mut self, width: usize, height: usize) -> Self {
        self.config.grid_width = width;
        self.config.grid_height = height;
        self
    }

    /// Set the memory range dumped on every poll (both ends inclusive)
    pub fn readout_range(mut self, start: u32, end: u32) -> Self {
        self.config.readout_start = start;
        self.config.readout_end = end;
        self
    }

    /// Set the polling interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Set the delay waited after launching the simulator
    pub fn startup_delay(mut self, delay: Duration) -> Self {
        self.config.startup_delay = delay;
        self
    }

    /// Set the delay waited after the start command
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay = delay;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
