//! Network Module
//!
//! Blocking TCP client for the simulator's remote interface.
//!
//! ## Model
//! - One request/response exchange per call
//! - Each exchange bounded by a single deadline (write + read)
//! - No retries; the caller owns the retry policy

mod client;
mod connection;

pub use client::{connect_and_send, send_over_connection, Client};
pub use connection::{Deadline, Transport};
