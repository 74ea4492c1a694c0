//! Move validation and legal action enumeration.

use serde::{Deserialize, Serialize};

use crate::error::RuleFailure;
use crate::game::{
    Action, ActionKind, ActionResult, Direction, GameState, PlayerId, Unit, FINAL_HEIGHT,
};

/// Rule version used when none is configured.
pub const DEFAULT_RULES_VERSION: u8 = 3;

/// Rule variant flags, fixed for the duration of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruleset {
    /// Version these flags were derived from, reported to the viewer.
    pub version: u8,
    /// Stepping onto the last buildable level wins outright.
    pub win_on_max_height: bool,
    /// Enemy units are only visible near friendly units.
    pub fog_of_war: bool,
    /// `PUSH&BUILD` is allowed.
    pub can_push: bool,
    /// Units per player.
    pub units_per_player: usize,
    /// Height of a complete pillar.
    pub final_height: u8,
    /// Chebyshev radius of unit vision.
    pub view_distance: i32,
    /// Rounds before the match is stopped.
    pub max_rounds: u32,
}

impl Ruleset {
    /// Flags for a numbered rule version.
    ///
    /// Version 0 is the base game; 1 switches to scoring; 2 adds pushing and
    /// a second unit; 3 adds fog of war.
    #[must_use]
    pub const fn for_version(version: u8) -> Self {
        Self {
            version,
            win_on_max_height: version < 1,
            fog_of_war: version >= 3,
            can_push: version >= 2,
            units_per_player: if version >= 2 { 2 } else { 1 },
            final_height: FINAL_HEIGHT,
            view_distance: 1,
            max_rounds: 200,
        }
    }

    /// One-line description of the accepted command form.
    #[must_use]
    pub fn expected_command(&self) -> String {
        let mut expected = ActionKind::Move.as_str().to_string();
        if self.can_push {
            expected.push_str(" | ");
            expected.push_str(ActionKind::Push.as_str());
        }
        expected.push_str(" <index> <direction> <direction>");
        expected
    }
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::for_version(DEFAULT_RULES_VERSION)
    }
}

impl GameState {
    /// Validate a move of `unit` followed by a build.
    ///
    /// A build on a cell holding an enemy the mover cannot see is skipped
    /// without error.
    ///
    /// # Errors
    ///
    /// Returns the first rule the move breaks.
    pub fn resolve_move(
        &self,
        unit: &Unit,
        move_dir: Direction,
        build_dir: Direction,
    ) -> Result<ActionResult, RuleFailure> {
        let final_height = self.ruleset.final_height;
        let target = unit.position.neighbor(move_dir);
        let Some(target_height) = self.board.height(target) else {
            return Err(RuleFailure::BadCoords { at: target });
        };
        let current_height = self.board.height(unit.position).unwrap_or(0);
        if target_height > current_height + 1 {
            return Err(RuleFailure::InvalidMove {
                from: current_height,
                to: target_height,
            });
        }
        if target_height >= final_height {
            return Err(RuleFailure::MoveTooHigh { at: target });
        }
        if self.unit_at(target).is_some() {
            return Err(RuleFailure::MoveOnUnit { at: target });
        }

        let build_target = target.neighbor(build_dir);
        let Some(build_height) = self.board.height(build_target) else {
            return Err(RuleFailure::InvalidPlace { at: build_target });
        };
        if build_height >= final_height {
            return Err(RuleFailure::PlaceTooHigh {
                at: build_target,
                height: build_height,
            });
        }

        // The mover's own cell is vacated by the move.
        let occupant = self
            .units()
            .find(|u| u.position == build_target && u.id != unit.id);
        let build_valid = match occupant {
            None => true,
            Some(other) if !self.is_visible_to(other.position, unit.id.player) => false,
            Some(_) => return Err(RuleFailure::PlaceOnUnit { at: build_target }),
        };

        Ok(ActionResult {
            kind: ActionKind::Move,
            move_target: target,
            build_target,
            move_valid: true,
            build_valid,
            scored: target_height == final_height - 1,
            unit: unit.id,
        })
    }

    /// Validate a push by `unit` of the enemy in `push_dir`, landing it in
    /// `land_dir`.
    ///
    /// A landing cell holding an enemy the pusher cannot see cancels the
    /// whole push without error.
    ///
    /// # Errors
    ///
    /// Returns the first rule the push breaks.
    pub fn resolve_push(
        &self,
        unit: &Unit,
        push_dir: Direction,
        land_dir: Direction,
    ) -> Result<ActionResult, RuleFailure> {
        let invalid = RuleFailure::PushInvalid {
            push: push_dir,
            land: land_dir,
        };
        if !push_dir.can_land(land_dir) {
            return Err(invalid);
        }
        let target = unit.position.neighbor(push_dir);
        let Some(pushed) = self.unit_at(target) else {
            return Err(RuleFailure::PushVoid { at: target });
        };
        if pushed.id.player == unit.id.player {
            return Err(RuleFailure::FriendlyFire {
                unit: unit.id.index,
                target: pushed.id.index,
            });
        }

        let landing = pushed.position.neighbor(land_dir);
        let from_height = self.board.height(target).unwrap_or(0);
        match self.board.height(landing) {
            Some(h) if h < self.ruleset.final_height && h <= from_height + 1 => {}
            _ => return Err(invalid),
        }

        let valid = match self.unit_at(landing) {
            None => true,
            Some(other) if !self.is_visible_to(other.position, unit.id.player) => false,
            Some(_) => {
                return Err(RuleFailure::PushOnUnit {
                    push: push_dir,
                    land: land_dir,
                });
            }
        };

        Ok(ActionResult {
            kind: ActionKind::Push,
            move_target: landing,
            build_target: target,
            move_valid: valid,
            build_valid: valid,
            scored: false,
            unit: pushed.id,
        })
    }

    /// Validate any action issued by `unit`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleFailure::InvalidCommand`] for a push when pushing is
    /// disabled, otherwise whatever the specific resolver reports.
    pub fn resolve(&self, unit: &Unit, action: &Action) -> Result<ActionResult, RuleFailure> {
        match action.kind {
            ActionKind::Move => self.resolve_move(unit, action.move_dir, action.build_dir),
            ActionKind::Push if self.ruleset.can_push => {
                self.resolve_push(unit, action.move_dir, action.build_dir)
            }
            ActionKind::Push => Err(RuleFailure::InvalidCommand(ActionKind::Push)),
        }
    }

    /// Every action `player` may legally issue, sorted by wire encoding.
    ///
    /// Tries each unit with every direction pair and every enabled command,
    /// keeping the candidates whose resolver succeeds.
    #[must_use]
    pub fn legal_actions(&self, player: PlayerId) -> Vec<Action> {
        let Some(owner) = self.player(player) else {
            return Vec::new();
        };
        let kinds: &[ActionKind] = if self.ruleset.can_push {
            &[ActionKind::Move, ActionKind::Push]
        } else {
            &[ActionKind::Move]
        };

        let mut actions = Vec::new();
        for unit in &owner.units {
            for move_dir in Direction::ALL {
                for build_dir in Direction::ALL {
                    for &kind in kinds {
                        let action = Action::new(kind, unit.id.index, move_dir, build_dir);
                        if self.resolve(unit, &action).is_ok() {
                            actions.push(action);
                        }
                    }
                }
            }
        }
        actions.sort_by_cached_key(ToString::to_string);
        actions
    }
}
