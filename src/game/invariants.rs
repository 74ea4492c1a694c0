//! Game invariants - sanity checks that detect bugs.
//!
//! A correct resolver never produces these. When one fires the turn still
//! proceeds with whatever was computed; the violation is only reported.

use crate::game::{ActionKind, ActionResult, GameState};

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invariant violation: {message}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl InvariantViolation {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Check that a resolved action is internally consistent.
///
/// A move always moves; a push moves and builds together or not at all;
/// nothing scores unless the move half happens.
#[must_use]
pub fn check_action_result(result: &ActionResult) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    match result.kind {
        ActionKind::Move if !result.move_valid => {
            violations.push(InvariantViolation::new(format!(
                "move by {:?} resolved with an invalid move half",
                result.unit
            )));
        }
        ActionKind::Push if result.move_valid != result.build_valid => {
            violations.push(InvariantViolation::new(format!(
                "push of {:?} resolved with mismatched halves",
                result.unit
            )));
        }
        _ => {}
    }

    if result.scored && !result.move_valid {
        violations.push(InvariantViolation::new(format!(
            "{:?} scored without moving",
            result.unit
        )));
    }

    violations
}

/// Check board and unit invariants after a completed turn.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for (point, height) in state.board.iter() {
        if height > state.ruleset.final_height {
            violations.push(InvariantViolation::new(format!(
                "cell {point} has height {height} above {}",
                state.ruleset.final_height
            )));
        }
    }

    let units: Vec<_> = state.units().collect();
    for (i, unit) in units.iter().enumerate() {
        if !state.board.contains(unit.position) {
            violations.push(InvariantViolation::new(format!(
                "{:?} stands off the map at {}",
                unit.id, unit.position
            )));
        }
        for other in &units[i + 1..] {
            if other.position == unit.position {
                violations.push(InvariantViolation::new(format!(
                    "{:?} and {:?} share cell {}",
                    unit.id, other.id, unit.position
                )));
            }
        }
    }

    violations
}
