//! # lifehack
//!
//! Runs a Game of Life program inside the Digital circuit simulator and
//! shows the simulated memory as a live board:
//! - Length-prefixed request/response client for Digital's remote interface
//! - Decoder for memory-dump replies into cell states
//! - Background polling loop with a channel hand-off to the renderer
//! - Simulator process launcher
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐   start:/output:   ┌──────────────────────────┐
//! │   Poller     │ ─────────────────▶ │  Digital (TCP :41114)    │
//! │  (thread)    │ ◀───────────────── │  launched by Simulator   │
//! └──────┬───────┘   framed replies   └──────────────────────────┘
//!        │ parse_grid + Grid::apply
//!        ▼
//! ┌──────────────┐
//! │   channel    │  (bounded, one board in flight)
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │   Renderer   │  (display thread only)
//! └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod grid;
pub mod poller;
pub mod render;
pub mod simulator;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{LifeError, Result};
pub use config::Config;
pub use network::Client;
pub use grid::{parse_grid, Cell, Grid};
pub use poller::{PollStats, Poller};
pub use simulator::Simulator;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of lifehack
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
