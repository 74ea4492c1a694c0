//! Rule failures and elimination causes.
//!
//! Every cause has a reason code, a full reason and a short tooltip. The
//! message text is produced by pure functions over the failure data.

use std::fmt;

use crate::game::{ActionKind, Direction, Point};

/// Why a syntactically valid action was rejected by the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFailure {
    /// Move target is off the map.
    BadCoords {
        /// Requested target.
        at: Point,
    },
    /// Move target is more than one level above the mover.
    InvalidMove {
        /// Height of the current cell.
        from: u8,
        /// Height of the target cell.
        to: u8,
    },
    /// Move target is a complete pillar.
    MoveTooHigh {
        /// Requested target.
        at: Point,
    },
    /// Move target is occupied.
    MoveOnUnit {
        /// Requested target.
        at: Point,
    },
    /// Build target is off the map.
    InvalidPlace {
        /// Requested build cell.
        at: Point,
    },
    /// Build target is already complete.
    PlaceTooHigh {
        /// Requested build cell.
        at: Point,
        /// Its height.
        height: u8,
    },
    /// Build target holds a visible unit.
    PlaceOnUnit {
        /// Requested build cell.
        at: Point,
    },
    /// Landing direction does not follow the push, or the landing cell is unusable.
    PushInvalid {
        /// Push direction.
        push: Direction,
        /// Landing direction.
        land: Direction,
    },
    /// Nobody stands in the push direction.
    PushVoid {
        /// Pushed cell.
        at: Point,
    },
    /// Pushed unit belongs to the pusher.
    FriendlyFire {
        /// Pushing unit index.
        unit: usize,
        /// Pushed unit index.
        target: usize,
    },
    /// Landing cell holds a visible unit.
    PushOnUnit {
        /// Push direction.
        push: Direction,
        /// Landing direction.
        land: Direction,
    },
    /// The command is not enabled by the ruleset.
    InvalidCommand(ActionKind),
}

impl fmt::Display for RuleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RuleFailure::BadCoords { at } | RuleFailure::MoveTooHigh { at } => {
                write!(f, "Cannot move to position ({},{}).", at.x, at.y)
            }
            RuleFailure::InvalidMove { from, to } => write!(f, "Cannot move from height {from} to {to}."),
            RuleFailure::MoveOnUnit { at } => {
                write!(f, "Trying to move onto an occupied cell at ({},{}).", at.x, at.y)
            }
            RuleFailure::InvalidPlace { at } => write!(f, "Cannot build on position ({},{}).", at.x, at.y),
            RuleFailure::PlaceTooHigh { height, .. } => write!(f, "Cannot build at height {height}."),
            RuleFailure::PlaceOnUnit { at } => {
                write!(f, "Trying to build on a unit at position ({},{}).", at.x, at.y)
            }
            RuleFailure::PushInvalid { push, land } => write!(f, "Not a valid push: {push} + {land}."),
            RuleFailure::PushVoid { at } => write!(f, "Nobody to push at position ({}, {}).", at.x, at.y),
            RuleFailure::FriendlyFire { unit, target } => {
                write!(f, "Unit {unit} tried to push friendly unit {target}.")
            }
            RuleFailure::PushOnUnit { push, land } => {
                write!(f, "Trying to push onto another unit: {push} + {land}.")
            }
            RuleFailure::InvalidCommand(kind) => write!(f, "Command {kind} is not available."),
        }
    }
}

impl std::error::Error for RuleFailure {}

impl RuleFailure {
    /// Stable reason code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            RuleFailure::BadCoords { .. } => "BadCoords",
            RuleFailure::InvalidMove { .. } => "InvalidMove",
            RuleFailure::MoveTooHigh { .. } => "MoveTooHigh",
            RuleFailure::MoveOnUnit { .. } => "MoveOnUnit",
            RuleFailure::InvalidPlace { .. } => "InvalidPlace",
            RuleFailure::PlaceTooHigh { .. } => "PlaceTooHigh",
            RuleFailure::PlaceOnUnit { .. } => "PlaceOnUnit",
            RuleFailure::PushInvalid { .. } => "PushInvalid",
            RuleFailure::PushVoid { .. } => "PushVoid",
            RuleFailure::FriendlyFire { .. } => "FriendlyFire",
            RuleFailure::PushOnUnit { .. } => "PushOnUnit",
            RuleFailure::InvalidCommand(_) => "InvalidCommand",
        }
    }

    /// Full human-readable reason.
    #[must_use]
    pub fn reason(&self) -> String {
        self.to_string()
    }

    /// Short reason for the viewer tooltip.
    #[must_use]
    pub fn tooltip(&self) -> String {
        match *self {
            RuleFailure::BadCoords { at }
            | RuleFailure::MoveTooHigh { at }
            | RuleFailure::MoveOnUnit { at } => format!("Invalid move ({},{})", at.x, at.y),
            RuleFailure::InvalidMove { from, to } => format!("Invalid move ({from} to {to})"),
            RuleFailure::InvalidPlace { at }
            | RuleFailure::PlaceTooHigh { at, .. }
            | RuleFailure::PlaceOnUnit { at } => format!("Invalid build ({},{})", at.x, at.y),
            RuleFailure::PushInvalid { push, land } | RuleFailure::PushOnUnit { push, land } => {
                format!("Invalid push ({push} + {land})")
            }
            RuleFailure::PushVoid { at } => format!("Invalid push ({}, {})", at.x, at.y),
            RuleFailure::FriendlyFire { .. } => "Friendly fire!".to_string(),
            RuleFailure::InvalidCommand(kind) => format!("Invalid command ({kind})"),
        }
    }
}

/// Why a player left the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EliminationCause {
    /// The submitted action broke a rule.
    Rule(RuleFailure),
    /// The response line did not match the protocol.
    InvalidInput {
        /// Description of the expected form.
        expected: String,
        /// The line actually received.
        found: String,
    },
    /// The player conceded.
    AcceptedDefeat {
        /// Conceding player.
        player: usize,
    },
    /// The player did not answer in time.
    Timeout {
        /// Silent player.
        player: usize,
    },
}

impl EliminationCause {
    /// Stable reason code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            EliminationCause::Rule(failure) => failure.code(),
            EliminationCause::InvalidInput { .. } => "InvalidInput",
            EliminationCause::AcceptedDefeat { .. } => "selfDestruct",
            EliminationCause::Timeout { .. } => "Timeout",
        }
    }

    /// Full human-readable reason.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            EliminationCause::Rule(failure) => failure.reason(),
            EliminationCause::InvalidInput { expected, found } => {
                format!("Invalid input. Expected '{expected}' but found '{found}'.")
            }
            EliminationCause::AcceptedDefeat { player } => format!("${player} accepts defeat!"),
            EliminationCause::Timeout { player } => format!("${player} has not provided an action in time."),
        }
    }

    /// Short reason for the viewer tooltip.
    #[must_use]
    pub fn tooltip(&self) -> String {
        match self {
            EliminationCause::Rule(failure) => failure.tooltip(),
            EliminationCause::InvalidInput { .. } => "Invalid input".to_string(),
            EliminationCause::AcceptedDefeat { .. } => "accepted defeat!".to_string(),
            EliminationCause::Timeout { .. } => "Timeout!".to_string(),
        }
    }
}

impl From<RuleFailure> for EliminationCause {
    fn from(failure: RuleFailure) -> Self {
        EliminationCause::Rule(failure)
    }
}
