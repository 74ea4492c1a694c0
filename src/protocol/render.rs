//! Rendering of player input, viewer frames and round summaries.

use log::error;

use crate::game::{ActionKind, GameState, PlayerId, Unit};

/// Position sent for an enemy unit the player cannot see.
pub const HIDDEN_POSITION: &str = "-1 -1";

/// Lines sent once, before a player's first turn: grid size and units per player.
#[must_use]
pub fn init_input(state: &GameState) -> Vec<String> {
    vec![
        state.board.size().to_string(),
        state.ruleset.units_per_player.to_string(),
    ]
}

/// Lines sent to `player` at the start of each of its turns.
///
/// The board rows, the player's own units, every opponent's units in seat
/// order after the player (hidden ones as [`HIDDEN_POSITION`]), then the
/// number of legal actions followed by one action per line.
#[must_use]
pub fn turn_input(state: &GameState, player: PlayerId) -> Vec<String> {
    let mut lines = state.board.render_rows();

    let count = state.players.len();
    for seat in (0..count).map(|offset| (player + offset) % count) {
        for unit in &state.players[seat].units {
            lines.push(match state.visible_position(unit, player) {
                Some(p) => p.to_string(),
                None => HIDDEN_POSITION.to_string(),
            });
        }
    }

    let actions = state.legal_actions(player);
    lines.push(actions.len().to_string());
    lines.extend(actions.iter().map(ToString::to_string));
    lines
}

/// Viewer header: own line count, grid size, rule version, units per player.
#[must_use]
pub fn view_init(state: &GameState) -> Vec<String> {
    let mut lines = vec![
        state.board.size().to_string(),
        state.ruleset.version.to_string(),
        state.ruleset.units_per_player.to_string(),
    ];
    lines.insert(0, (lines.len() + 1).to_string());
    lines
}

/// Viewer data for one frame.
///
/// One `x y push-code` line per unit, the board rows, a `score;alive;message`
/// line per player and finally the player who just acted.
#[must_use]
pub fn view_frame(state: &GameState) -> Vec<String> {
    let mut lines: Vec<String> = state
        .units()
        .map(|u| format!("{} {}", u.position, u.push_state() as u8))
        .collect();
    lines.extend(state.board.render_rows());
    for player in &state.players {
        lines.push(format!(
            "{};{};{}",
            state.ranking_score(player.index),
            u8::from(!player.dead),
            player.message().unwrap_or_default()
        ));
    }
    lines.push(state.who_just_played().to_string());
    lines
}

fn unit_summary(state: &GameState, unit: &Unit, lines: &mut Vec<String>) {
    let Some(did) = unit.did else {
        return;
    };
    let (player, index) = (unit.id.player, unit.id.index);
    match did.kind {
        ActionKind::Move => {
            if did.move_valid {
                lines.push(format!(
                    "${player} moved unit {index} to ({},{}).",
                    did.move_target.x, did.move_target.y
                ));
            } else {
                error!("unit {index} of player {player} moved with an invalid move half");
            }
            let build = did.build_target;
            lines.push(if did.build_valid {
                format!("...and builds on ({},{}).", build.x, build.y)
            } else {
                format!("...and cannot build on ({},{})!", build.x, build.y)
            });
            if did.scored {
                lines.push(if state.ruleset.win_on_max_height {
                    "...and wins the game!".to_string()
                } else {
                    "...and scores a point!".to_string()
                });
            }
        }
        ActionKind::Push => {
            let (to, from) = (did.move_target, did.build_target);
            match (did.move_valid, did.build_valid) {
                (true, true) => lines.push(format!(
                    "${player} made unit {index} push a unit to ({},{}) and builds on ({},{}).",
                    to.x, to.y, from.x, from.y
                )),
                (false, false) => lines.push(format!(
                    "${player} attempted to make unit {index} push the unit on ({}, {}), but could not.",
                    from.x, from.y
                )),
                _ => error!("push by unit {index} of player {player} resolved with mismatched halves"),
            }
        }
    }
}

/// Human-readable account of what every unit did this round.
#[must_use]
pub fn summary_lines(state: &GameState) -> Vec<String> {
    let mut lines = Vec::new();
    for unit in state.units() {
        unit_summary(state, unit, &mut lines);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        ActionResult, Board, Direction, Player, Point, Ruleset, UnitRef,
    };

    fn small_game(ruleset: Ruleset) -> GameState {
        let board = Board::from_points((0..3).flat_map(|y| (0..3).map(move |x| Point::new(x, y))));
        let players = vec![
            Player::new(0, &[Point::new(0, 0)]),
            Player::new(1, &[Point::new(2, 2)]),
        ];
        GameState::new(board, players, ruleset)
    }

    #[test]
    fn test_init_input() {
        let game = small_game(Ruleset::for_version(0));
        assert_eq!(init_input(&game), vec!["3", "1"]);
        assert_eq!(view_init(&game), vec!["4", "3", "0", "1"]);
    }

    #[test]
    fn test_turn_input_layout() {
        let game = small_game(Ruleset::for_version(0));
        let lines = turn_input(&game, 1);
        assert_eq!(&lines[..3], &["000", "000", "000"]);
        assert_eq!(lines[3], "2 2");
        assert_eq!(lines[4], "0 0");
        let count: usize = lines[5].parse().unwrap();
        assert_eq!(count, lines.len() - 6);
        assert_eq!(count, game.legal_actions(1).len());
        assert!(lines[6].starts_with("MOVE&BUILD 0 "));
    }

    #[test]
    fn test_turn_input_hides_enemy_in_fog() {
        let ruleset = Ruleset {
            fog_of_war: true,
            ..Ruleset::for_version(0)
        };
        let game = small_game(ruleset);
        let lines = turn_input(&game, 0);
        assert_eq!(lines[3], "0 0");
        assert_eq!(lines[4], HIDDEN_POSITION);
    }

    #[test]
    fn test_view_frame() {
        let mut game = small_game(Ruleset::for_version(1));
        game.players[0].set_message(Some("hello"));
        game.players[1].die();
        let lines = view_frame(&game);
        assert_eq!(
            lines,
            vec!["0 0 0", "2 2 0", "000", "000", "000", "0;1;hello", "0;0;", "0"]
        );
    }

    #[test]
    fn test_summary_move_and_push() {
        let mut game = small_game(Ruleset::for_version(0));
        let actor = UnitRef::new(0, 0);
        game.apply(
            actor,
            ActionResult {
                kind: ActionKind::Move,
                move_target: Point::new(1, 1),
                build_target: Point::new(1, 2),
                move_valid: true,
                build_valid: false,
                scored: true,
                unit: actor,
            },
        );
        assert_eq!(
            summary_lines(&game),
            vec![
                "$0 moved unit 0 to (1,1).",
                "...and cannot build on (1,2)!",
                "...and wins the game!"
            ]
        );

        game.reset_round();
        let pusher = UnitRef::new(1, 0);
        let pushed = Point::new(1, 1).neighbor(Direction::N);
        game.apply(
            pusher,
            ActionResult {
                kind: ActionKind::Push,
                move_target: pushed,
                build_target: Point::new(1, 1),
                move_valid: true,
                build_valid: true,
                scored: false,
                unit: actor,
            },
        );
        assert_eq!(
            summary_lines(&game),
            vec!["$1 made unit 0 push a unit to (1,0) and builds on (1,1)."]
        );
        let frame = view_frame(&game);
        assert_eq!(frame[0], "1 0 2");
        assert_eq!(frame[1], "2 2 1");
        assert_eq!(frame.last().map(String::as_str), Some("1"));
    }

    #[test]
    fn test_summary_cancelled_push() {
        let mut game = small_game(Ruleset::for_version(2));
        let pusher = UnitRef::new(0, 0);
        game.apply(
            pusher,
            ActionResult {
                kind: ActionKind::Push,
                move_target: Point::new(2, 2),
                build_target: Point::new(1, 1),
                move_valid: false,
                build_valid: false,
                scored: false,
                unit: UnitRef::new(1, 0),
            },
        );
        assert_eq!(
            summary_lines(&game),
            vec!["$0 attempted to make unit 0 push the unit on (1, 1), but could not."]
        );
    }
}
