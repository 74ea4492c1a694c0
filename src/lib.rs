// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Wondev: a deterministic referee for a two-player move-and-build game.
//!
//! Units move on a grid of stackable cells and raise a neighbouring cell
//! after every move. Reaching the last buildable level wins or scores,
//! depending on the rule version. This crate provides:
//! - The rules engine with exhaustive legal action enumeration
//! - Seeded map generation with connectivity checks
//! - A generic turn-based referee driving external player processes
//! - The line-based player and viewer protocol
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Tournament / Replay / CLI         │
//! ├─────────────────────────────────────┤
//! │   Referee (TurnBasedGame, agents)   │
//! ├─────────────────────────────────────┤
//! │   Session + Protocol                │
//! ├─────────────────────────────────────┤
//! │   Game rules, board, map generation │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod protocol;
pub mod referee;
pub mod replay;
pub mod session;
pub mod tournament;

pub use config::MatchSettings;
pub use error::{EliminationCause, RuleFailure};

// Re-export key game types at crate root for convenience
pub use game::{Action, ActionKind, Board, Direction, GameState, Player, PlayerId, Point, Ruleset};
pub use referee::{MatchConfig, MatchResult, MatchRunner, Outcome, TurnBasedGame};
pub use session::{run_match, GameSession};
