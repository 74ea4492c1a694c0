//! Player and unit state.

use crate::game::{ActionKind, ActionResult, Point};

/// Index of a player in seating order (0-based).
pub type PlayerId = usize;

/// Messages longer than this are truncated.
pub const MAX_MESSAGE_LEN: usize = 48;

/// Length a truncated message is cut down to before the ellipsis.
const TRUNCATED_LEN: usize = 46;

/// Stable reference to a unit: owner and index within the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitRef {
    /// Owning player.
    pub player: PlayerId,
    /// Index within the owner's units.
    pub index: usize,
}

impl UnitRef {
    /// Create a new unit reference.
    #[must_use]
    pub const fn new(player: PlayerId, index: usize) -> Self {
        Self { player, index }
    }
}

/// What a unit took part in this round, as shown to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PushState {
    /// Nothing push related.
    None = 0,
    /// This unit pushed someone.
    DidPush = 1,
    /// This unit was pushed.
    WasPushed = 2,
}

/// A single piece on the board.
#[derive(Debug, Clone)]
pub struct Unit {
    /// Owner and index.
    pub id: UnitRef,
    /// Current cell.
    pub position: Point,
    /// Outcome of the action this unit issued this round.
    pub did: Option<ActionResult>,
    /// Whether this unit was displaced by a push this round.
    pub got_pushed: bool,
}

impl Unit {
    /// Create a unit at the given position.
    #[must_use]
    pub const fn new(id: UnitRef, position: Point) -> Self {
        Self {
            id,
            position,
            did: None,
            got_pushed: false,
        }
    }

    /// Clear the per-round outcome.
    pub fn reset(&mut self) {
        self.did = None;
        self.got_pushed = false;
    }

    /// Whether this unit issued a move this round.
    #[must_use]
    pub fn moved(&self) -> bool {
        self.did.as_ref().is_some_and(|r| r.kind == ActionKind::Move)
    }

    /// Whether this unit issued a push this round.
    #[must_use]
    pub fn pushed(&self) -> bool {
        self.did.as_ref().is_some_and(|r| r.kind == ActionKind::Push)
    }

    /// Push code for the viewer.
    #[must_use]
    pub fn push_state(&self) -> PushState {
        if self.pushed() {
            PushState::DidPush
        } else if self.got_pushed {
            PushState::WasPushed
        } else {
            PushState::None
        }
    }
}

/// State for one seat at the table.
#[derive(Debug, Clone)]
pub struct Player {
    /// Seat index.
    pub index: PlayerId,
    /// Points scored by stepping onto the last buildable level.
    pub score: u32,
    /// Eliminated. Never cleared once set.
    pub dead: bool,
    /// Reached the winning level. Never cleared once set.
    pub won: bool,
    /// Units ordered by their index.
    pub units: Vec<Unit>,
    message: Option<String>,
}

impl Player {
    /// Create a player whose units all start at the given positions.
    #[must_use]
    pub fn new(index: PlayerId, positions: &[Point]) -> Self {
        let units = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| Unit::new(UnitRef::new(index, i), p))
            .collect();
        Self {
            index,
            score: 0,
            dead: false,
            won: false,
            units,
            message: None,
        }
    }

    /// Mark the player as eliminated.
    pub fn die(&mut self) {
        self.dead = true;
    }

    /// Mark the player as winner.
    pub fn win(&mut self) {
        self.won = true;
    }

    /// Clear message and unit outcomes at the start of a round.
    pub fn reset(&mut self) {
        self.message = None;
        for unit in &mut self.units {
            unit.reset();
        }
    }

    /// The message attached to this round's output, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Store a message, truncating long ones.
    pub fn set_message(&mut self, message: Option<&str>) {
        self.message = message.map(|m| {
            if m.chars().count() > MAX_MESSAGE_LEN {
                let mut cut: String = m.chars().take(TRUNCATED_LEN).collect();
                cut.push_str("...");
                cut
            } else {
                m.to_string()
            }
        });
    }
}
