//! Action descriptors and their resolved outcomes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::{Direction, Point, UnitRef};

/// Which half-command an action performs before building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionKind {
    /// Move to an adjacent cell, then build next to it.
    Move,
    /// Push an adjacent enemy, then build where it stood.
    Push,
}

impl ActionKind {
    /// Wire token for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ActionKind::Move => "MOVE&BUILD",
            ActionKind::Push => "PUSH&BUILD",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(ActionKind::Move.as_str()) {
            Ok(ActionKind::Move)
        } else if s.eq_ignore_ascii_case(ActionKind::Push.as_str()) {
            Ok(ActionKind::Push)
        } else {
            Err(ParseActionError::UnknownKind(s.to_string()))
        }
    }
}

/// A command as issued by a player: which unit, where to go, where to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    /// Move or push.
    pub kind: ActionKind,
    /// Index of the acting unit within its owner.
    pub unit: usize,
    /// Move direction, or push direction.
    pub move_dir: Direction,
    /// Build direction, or landing direction of the pushed unit.
    pub build_dir: Direction,
}

impl Action {
    /// Create a new action.
    #[must_use]
    pub const fn new(kind: ActionKind, unit: usize, move_dir: Direction, build_dir: Direction) -> Self {
        Self {
            kind,
            unit,
            move_dir,
            build_dir,
        }
    }

    /// Build an action from its four wire tokens.
    ///
    /// The unit index must be a single digit.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first token that does not parse.
    pub fn from_tokens(kind: &str, unit: &str, move_dir: &str, build_dir: &str) -> Result<Self, ParseActionError> {
        let kind = kind.parse()?;
        let unit = match unit.as_bytes() {
            [digit] if digit.is_ascii_digit() => usize::from(digit - b'0'),
            _ => return Err(ParseActionError::BadIndex(unit.to_string())),
        };
        let move_dir = move_dir
            .parse()
            .map_err(|_| ParseActionError::BadDirection(move_dir.to_string()))?;
        let build_dir = build_dir
            .parse()
            .map_err(|_| ParseActionError::BadDirection(build_dir.to_string()))?;
        Ok(Self::new(kind, unit, move_dir, build_dir))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.kind, self.unit, self.move_dir, self.build_dir)
    }
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        match tokens.as_slice() {
            [kind, unit, move_dir, build_dir] => Action::from_tokens(kind, unit, move_dir, build_dir),
            _ => Err(ParseActionError::TokenCount(tokens.len())),
        }
    }
}

/// Error from parsing an action's wire form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseActionError {
    /// Expected exactly four tokens.
    #[error("expected 4 tokens, found {0}")]
    TokenCount(usize),
    /// First token is not a known command.
    #[error("unknown command: {0}")]
    UnknownKind(String),
    /// Unit index is not a single digit.
    #[error("bad unit index: {0}")]
    BadIndex(String),
    /// Direction token not recognised.
    #[error("bad direction: {0}")]
    BadDirection(String),
}

/// Outcome of validating an action against the current state.
///
/// For a push, `unit` is the pushed unit, `move_target` is where it lands and
/// `build_target` is the cell it vacated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionResult {
    /// Move or push.
    pub kind: ActionKind,
    /// Cell the moving unit ends up on.
    pub move_target: Point,
    /// Cell that is raised.
    pub build_target: Point,
    /// Whether the move half takes effect.
    pub move_valid: bool,
    /// Whether the build half takes effect.
    pub build_valid: bool,
    /// Whether the mover steps onto the last buildable level.
    pub scored: bool,
    /// The unit whose position changes.
    pub unit: UnitRef,
}
