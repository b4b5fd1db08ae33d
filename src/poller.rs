//! Polling loop
//!
//! Repeatedly dumps the cell region, decodes it and hands the board to the
//! rendering side over a channel. Rendering never happens on this thread.
//!
//! Every failure inside the loop is treated as transient: it is logged and
//! the next iteration starts after the usual interval.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, Sender, TrySendError};

use crate::config::Config;
use crate::error::Result;
use crate::grid::{parse_grid, Grid};
use crate::network::Client;
use crate::protocol::Command;

/// Longest stretch a wait goes without looking at the shutdown flag
const SHUTDOWN_CHECK: Duration = Duration::from_millis(50);

/// Sleep for `delay`, waking early if `shutdown` gets set
///
/// Returns true when shutdown was requested (before or during the wait).
pub fn wait_or_shutdown(delay: Duration, shutdown: &AtomicBool) -> bool {
    let started = Instant::now();
    loop {
        if shutdown.load(Ordering::Relaxed) {
            return true;
        }
        let left = delay.saturating_sub(started.elapsed());
        if left.is_zero() {
            return false;
        }
        thread::sleep(left.min(SHUTDOWN_CHECK));
    }
}

/// Counters for one poller run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    /// Iterations that produced a board
    pub successes: u64,

    /// Iterations that failed in the client or the decoder
    pub failures: u64,

    /// Boards skipped because the renderer had not taken the previous one
    pub skipped: u64,
}

/// Background readout loop
pub struct Poller {
    client: Client,
    command: Command,
    grid: Grid,
    interval: Duration,
    stats: PollStats,
}

impl Poller {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            command: config.readout_command(),
            grid: Grid::from_config(config),
            interval: config.poll_interval,
            stats: PollStats::default(),
        }
    }

    /// Run one readout: send, decode, apply to the board
    pub fn poll_once(&mut self) -> Result<&Grid> {
        let outcome = self
            .client
            .send(&self.command)
            .and_then(|response| parse_grid(response.as_bytes()));

        let states = match outcome {
            Ok(states) => states,
            Err(e) => {
                self.stats.failures += 1;
                return Err(e);
            }
        };

        let applied = self.grid.apply(&states);
        if states.len() != self.grid.cell_count() {
            tracing::debug!(
                "Readout returned {} values for {} cells, applied {}",
                states.len(),
                self.grid.cell_count(),
                applied
            );
        }

        self.stats.successes += 1;
        Ok(&self.grid)
    }

    pub fn stats(&self) -> PollStats {
        self.stats
    }

    /// Loop until `shutdown` is set or the receiving side goes away
    pub fn run(mut self, shutdown: &AtomicBool, tx: &Sender<Grid>) -> PollStats {
        tracing::debug!("Polling {} every {:?}", self.command, self.interval);

        while !shutdown.load(Ordering::Relaxed) {
            let snapshot = self.poll_once().map(Grid::clone);
            match snapshot {
                Ok(grid) => match tx.try_send(grid) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => self.stats.skipped += 1,
                    Err(TrySendError::Disconnected(_)) => {
                        tracing::debug!("Renderer gone, stopping poller");
                        break;
                    }
                },
                Err(e) => tracing::warn!("Error: {}", e),
            }

            if wait_or_shutdown(self.interval, shutdown) {
                break;
            }
        }

        tracing::debug!("Poller stopped: {:?}", self.stats);
        self.stats
    }

    /// Start the loop on a named background thread
    ///
    /// The returned receiver holds at most one undelivered board.
    pub fn spawn(self, shutdown: Arc<AtomicBool>) -> Result<(JoinHandle<PollStats>, Receiver<Grid>)> {
        let (tx, rx) = channel::bounded(1);
        let handle = thread::Builder::new()
            .name("lifehack-poller".to_string())
            .spawn(move || self.run(&shutdown, &tx))?;
        Ok((handle, rx))
    }
}
