//! Deterministic map generation and spawn placement.

use std::collections::VecDeque;

use log::{info, warn};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::game::{Board, Player, Point, Ruleset};

/// Seeded generator driving every random choice of a match.
pub type MatchRng = ChaCha8Rng;

/// Side of the bounding square used by the procedural generator.
pub const GENERATED_MAP_SIZE: i32 = 6;

/// Attempts before the procedural generator settles for what it has.
pub const MAX_GENERATION_ITERATIONS: u32 = 1_000;

/// Number of selectable maps: square, diamond, generated.
pub const MAP_COUNT: usize = 3;

/// Error type for map generation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapGenError {
    /// Not enough free cells for every unit.
    #[error("Not enough spawn cells: need {need}, have {have}")]
    NotEnoughCells {
        /// Units to place.
        need: usize,
        /// Cells on the board.
        have: usize,
    },
    /// Symmetric placement ran out of mirrored pairs.
    #[error("No mirrored spawn pair left for unit {unit}")]
    NoSymmetricPair {
        /// Unit index being placed.
        unit: usize,
    },
    /// Symmetric placement only works for two players.
    #[error("Symmetric spawns need exactly 2 players, got {0}")]
    SymmetricPlayerCount(usize),
}

/// A board with units placed on it.
#[derive(Debug, Clone)]
pub struct GeneratedMap {
    /// The board.
    pub board: Board,
    /// Players with their starting positions.
    pub players: Vec<Player>,
    /// Index of the map actually used.
    pub map_index: usize,
}

/// Create the match RNG from a configured seed.
#[must_use]
pub fn match_rng(seed: i64) -> MatchRng {
    ChaCha8Rng::seed_from_u64(u64::from_ne_bytes(seed.to_ne_bytes()))
}

/// The 5×5 square.
#[must_use]
pub fn square_map() -> Board {
    Board::from_points((0..5).flat_map(|y| (0..5).map(move |x| Point::new(x, y))))
}

/// The diamond of radius 3 centred on (3, 3).
#[must_use]
pub fn diamond_map() -> Board {
    let centre = 3;
    Board::from_points(
        (0..7)
            .flat_map(|y| (0..7).map(move |x| Point::new(x, y)))
            .filter(|p| (p.x - centre).abs() + (p.y - centre).abs() <= centre),
    )
}

/// Grow a horizontally symmetric map until it is large enough and in one piece.
///
/// Cells are added in mirrored pairs inside a
/// [`GENERATED_MAP_SIZE`]-wide square. Gives up after
/// [`MAX_GENERATION_ITERATIONS`] pairs and returns what it has.
pub fn generate_random_map(rng: &mut MatchRng) -> Board {
    let size = GENERATED_MAP_SIZE;
    let cells = 25 + rng.gen_range(0..10);
    let mut board = Board::new();
    let mut islands = 0;
    let mut iterations = 0;

    while (board.len() < cells || islands > 1) && iterations < MAX_GENERATION_ITERATIONS {
        let point = Point::new(rng.gen_range(0..size), rng.gen_range(0..size));
        board.create(point);
        board.create(point.mirrored(size));
        islands = board.count_islands();
        iterations += 1;
    }

    if islands > 1 || board.len() < cells {
        warn!(
            "map generation stopped after {iterations} iterations with {} cells in {islands} islands",
            board.len()
        );
    }

    board
}

/// Build the map catalog and pick one.
///
/// The procedural map is always generated and the random pick always drawn,
/// so the RNG stream does not depend on `map_index`. A negative or
/// out-of-range index selects the random pick.
pub fn select_map(map_index: i32, rng: &mut MatchRng) -> (usize, Board) {
    let generated = generate_random_map(rng);
    let random_index = rng.gen_range(0..MAP_COUNT);
    let index = usize::try_from(map_index)
        .ok()
        .filter(|&i| i < MAP_COUNT)
        .unwrap_or(random_index);

    let board = match index {
        0 => square_map(),
        1 => diamond_map(),
        _ => generated,
    };
    (index, board)
}

/// Place every unit of `player_count` players on distinct cells.
///
/// Cells are sorted, then shuffled with the match RNG. In symmetric mode each
/// unit of player 0 gets a cell whose mirror is still free, and player 1's
/// unit of the same index gets the mirror.
///
/// # Errors
///
/// Returns an error if the board runs out of cells or mirrored pairs.
pub fn place_units(
    board: &Board,
    ruleset: &Ruleset,
    player_count: usize,
    symmetric: bool,
    rng: &mut MatchRng,
) -> Result<Vec<Player>, MapGenError> {
    let units = ruleset.units_per_player;
    let need = units * player_count;
    if board.len() < need {
        return Err(MapGenError::NotEnoughCells {
            need,
            have: board.len(),
        });
    }

    let mut points = board.sorted_points();
    points.shuffle(rng);
    let mut queue = VecDeque::from(points);

    let positions: Vec<Vec<Point>> = if symmetric {
        if player_count != 2 {
            return Err(MapGenError::SymmetricPlayerCount(player_count));
        }
        let mut first = Vec::with_capacity(units);
        let mut second = Vec::with_capacity(units);
        for unit in 0..units {
            loop {
                let a = queue.pop_front().ok_or(MapGenError::NoSymmetricPair { unit })?;
                let b = a.mirrored(board.size());
                if let Some(at) = queue.iter().position(|&p| p == b) {
                    queue.remove(at);
                    first.push(a);
                    second.push(b);
                    break;
                }
            }
        }
        vec![first, second]
    } else {
        (0..player_count)
            .map(|_| queue.drain(..units).collect())
            .collect()
    };

    Ok(positions
        .iter()
        .enumerate()
        .map(|(i, p)| Player::new(i, p))
        .collect())
}

/// Select a map and place units for a new match.
///
/// # Errors
///
/// Returns an error if units cannot be placed.
pub fn generate_map(
    rng: &mut MatchRng,
    map_index: i32,
    symmetric: bool,
    ruleset: &Ruleset,
    player_count: usize,
) -> Result<GeneratedMap, MapGenError> {
    let (map_index, board) = select_map(map_index, rng);
    info!("using map {map_index} ({} cells, size {})", board.len(), board.size());
    let players = place_units(&board, ruleset, player_count, symmetric, rng)?;
    Ok(GeneratedMap {
        board,
        players,
        map_index,
    })
}
