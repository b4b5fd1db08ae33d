//! Protocol Module
//!
//! Wire protocol spoken by the simulator's remote interface.
//!
//! ## Frame Format
//! Requests and responses share one envelope:
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Len (2)  │     Payload (Len bytes)     │
//! └──────────┴─────────────────────────────┘
//! ```
//! `Len` is an unsigned 16-bit big-endian integer, so a payload holds at
//! most 65535 bytes.
//!
//! ### Commands (text, simulator-defined)
//! - `start:<path>`          - load and run a program
//! - `output:<start>:<end>`  - dump a memory range
//!
//! ### Responses
//! Any payload containing `ok` is a success; anything else is the remote
//! error message.

mod command;
mod response;
mod codec;

pub use command::Command;
pub use response::{Response, SUCCESS_MARKER};
pub use codec::{
    encode_frame, decode_frame, read_frame, write_frame, LENGTH_PREFIX_SIZE, MAX_PAYLOAD_SIZE,
};
