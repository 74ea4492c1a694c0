//! Line-oriented wire format between the referee, players and viewer.
//!
//! Players receive plain text lines and answer with exactly one line:
//!
//! ```text
//! ACCEPT-DEFEAT [message]
//! MOVE&BUILD|PUSH&BUILD <index> <direction> <direction> [message]
//! ```
//!
//! The viewer receives per-frame data lines and per-round summary lines.

mod command;
mod render;

pub use command::{parse_command, Command, ParseError, ACCEPT_DEFEAT};
pub use render::{init_input, summary_lines, turn_input, view_frame, view_init, HIDDEN_POSITION};
