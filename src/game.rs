//! Game layer for Wondev.
//!
//! Implements the move-and-build rules:
//! - Square grid with stackable cells and holes
//! - Players with units, scores and messages
//! - Move and push resolution against a versioned ruleset
//! - Map catalog, procedural maps and spawn placement

mod action;
mod board;
mod geometry;
mod invariants;
mod mapgen;
mod player;
mod rules;
mod state;

pub use action::{Action, ActionKind, ActionResult, ParseActionError};
pub use board::{Board, FINAL_HEIGHT};
pub use geometry::{Direction, Point, UnknownDirection};
pub use invariants::{check_action_result, check_invariants, InvariantViolation};
pub use mapgen::{
    diamond_map, generate_map, generate_random_map, match_rng, place_units, select_map,
    square_map, GeneratedMap, MapGenError, MatchRng, GENERATED_MAP_SIZE, MAP_COUNT,
    MAX_GENERATION_ITERATIONS,
};
pub use player::{Player, PlayerId, PushState, Unit, UnitRef, MAX_MESSAGE_LEN};
pub use rules::{Ruleset, DEFAULT_RULES_VERSION};
pub use state::GameState;
