//! Game state management.

use crate::game::{
    ActionKind, ActionResult, Board, Player, PlayerId, Point, Ruleset, Unit, UnitRef,
};

/// Complete game state: the board, the seats and the rules in force.
#[derive(Debug, Clone)]
pub struct GameState {
    /// The board.
    pub board: Board,
    /// All players, in seating order.
    pub players: Vec<Player>,
    /// Rules in force for the whole match.
    pub ruleset: Ruleset,
    /// Player whose turn was played last, 0 before any turn.
    pub last_player: PlayerId,
}

impl GameState {
    /// Create a new game state.
    ///
    /// Units should already sit on existing, distinct cells.
    #[must_use]
    pub fn new(board: Board, players: Vec<Player>, ruleset: Ruleset) -> Self {
        Self {
            board,
            players,
            ruleset,
            last_player: 0,
        }
    }

    /// Get a player by index.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// Get a unit by reference.
    #[must_use]
    pub fn unit(&self, id: UnitRef) -> Option<&Unit> {
        self.players.get(id.player)?.units.get(id.index)
    }

    /// Get a mutable unit by reference.
    #[must_use]
    pub fn unit_mut(&mut self, id: UnitRef) -> Option<&mut Unit> {
        self.players.get_mut(id.player)?.units.get_mut(id.index)
    }

    /// All units, grouped by player in seating order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.players.iter().flat_map(|p| p.units.iter())
    }

    /// The first unit standing on `point`.
    #[must_use]
    pub fn unit_at(&self, point: Point) -> Option<&Unit> {
        self.units().find(|u| u.position == point)
    }

    /// Whether `viewer` can see a unit standing on `point`.
    ///
    /// Without fog of war everything is visible. Otherwise one of the
    /// viewer's units must be within view distance.
    #[must_use]
    pub fn is_visible_to(&self, point: Point, viewer: PlayerId) -> bool {
        if !self.ruleset.fog_of_war {
            return true;
        }
        self.player(viewer).is_some_and(|p| {
            p.units
                .iter()
                .any(|u| u.position.distance(point) <= self.ruleset.view_distance)
        })
    }

    /// Position of a unit as seen by `viewer`, or `None` if hidden.
    #[must_use]
    pub fn visible_position(&self, unit: &Unit, viewer: PlayerId) -> Option<Point> {
        if unit.id.player == viewer || self.is_visible_to(unit.position, viewer) {
            Some(unit.position)
        } else {
            None
        }
    }

    /// Start a new round: clear messages and per-unit outcomes.
    ///
    /// In win-on-max-height games, any unit standing on the last buildable
    /// level also wins for its owner here.
    pub fn reset_round(&mut self) {
        for player in &mut self.players {
            player.reset();
        }
        if self.ruleset.win_on_max_height {
            let top = self.ruleset.final_height - 1;
            let winners: Vec<PlayerId> = self
                .units()
                .filter(|u| self.board.height(u.position) == Some(top))
                .map(|u| u.id.player)
                .collect();
            for id in winners {
                self.players[id].win();
            }
        }
    }

    /// Apply a resolved action issued by `actor`.
    ///
    /// Records the outcome on the issuing unit, then moves, builds and scores
    /// according to the validity flags.
    pub fn apply(&mut self, actor: UnitRef, result: ActionResult) {
        self.last_player = actor.player;
        if let Some(unit) = self.unit_mut(actor) {
            unit.did = Some(result);
        }
        if result.move_valid
            && let Some(moved) = self.unit_mut(result.unit)
        {
            moved.position = result.move_target;
        }
        if result.build_valid {
            self.board.raise(result.build_target);
        }
        if result.kind == ActionKind::Push
            && let Some(pushed) = self.unit_mut(result.unit)
        {
            pushed.got_pushed = true;
        }
        if result.scored
            && let Some(player) = self.players.get_mut(actor.player)
        {
            player.score += 1;
            if self.ruleset.win_on_max_height {
                player.win();
            }
        }
    }

    /// Score used to rank players at the end of the match.
    ///
    /// Win-on-max-height games rank won above alive above dead; otherwise
    /// the points scored are compared.
    #[must_use]
    pub fn ranking_score(&self, id: PlayerId) -> i64 {
        let Some(player) = self.player(id) else {
            return 0;
        };
        if self.ruleset.win_on_max_height {
            if player.dead {
                -1
            } else if player.won {
                1
            } else {
                0
            }
        } else {
            i64::from(player.score)
        }
    }

    /// Player who acted last, whether the turn was applied or eliminated them.
    #[must_use]
    pub const fn who_just_played(&self) -> PlayerId {
        self.last_player
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;

    fn create_test_game(ruleset: Ruleset) -> GameState {
        let board = Board::from_points((0..5).flat_map(|y| (0..5).map(move |x| Point::new(x, y))));
        let players = vec![
            Player::new(0, &[Point::new(0, 0)]),
            Player::new(1, &[Point::new(4, 4)]),
        ];
        GameState::new(board, players, ruleset)
    }

    #[test]
    fn test_unit_lookup() {
        let game = create_test_game(Ruleset::for_version(0));
        assert_eq!(game.unit_at(Point::new(4, 4)).map(|u| u.id), Some(UnitRef::new(1, 0)));
        assert!(game.unit_at(Point::new(2, 2)).is_none());
        assert!(game.unit(UnitRef::new(2, 0)).is_none());
        assert_eq!(game.units().count(), 2);
    }

    #[test]
    fn test_fog_of_war() {
        let mut game = create_test_game(Ruleset {
            fog_of_war: true,
            ..Ruleset::for_version(0)
        });
        assert!(game.is_visible_to(Point::new(1, 1), 0));
        assert!(!game.is_visible_to(Point::new(4, 4), 0));

        let enemy = game.players[1].units[0].clone();
        assert_eq!(game.visible_position(&enemy, 0), None);
        assert_eq!(game.visible_position(&enemy, 1), Some(Point::new(4, 4)));

        game.players[0].units[0].position = Point::new(3, 3);
        assert!(game.is_visible_to(Point::new(4, 4), 0));

        game.ruleset.fog_of_war = false;
        game.players[0].units[0].position = Point::new(0, 0);
        assert!(game.is_visible_to(Point::new(4, 4), 0));
    }

    #[test]
    fn test_apply_move_and_build() {
        let mut game = create_test_game(Ruleset::for_version(0));
        let actor = UnitRef::new(0, 0);
        let result = ActionResult {
            kind: ActionKind::Move,
            move_target: Point::new(1, 1),
            build_target: Point::new(2, 2),
            move_valid: true,
            build_valid: true,
            scored: false,
            unit: actor,
        };
        game.apply(actor, result);
        assert_eq!(game.players[0].units[0].position, Point::new(1, 1));
        assert_eq!(game.board.height(Point::new(2, 2)), Some(1));
        assert!(game.players[0].units[0].moved());
        assert_eq!(game.who_just_played(), 0);
        assert_eq!(game.players[0].score, 0);
    }

    #[test]
    fn test_apply_scored_wins_in_height_mode() {
        let mut game = create_test_game(Ruleset::for_version(0));
        let actor = UnitRef::new(1, 0);
        let result = ActionResult {
            kind: ActionKind::Move,
            move_target: Point::new(3, 3),
            build_target: Point::new(3, 4),
            move_valid: true,
            build_valid: false,
            scored: true,
            unit: actor,
        };
        game.apply(actor, result);
        assert!(game.players[1].won);
        assert_eq!(game.players[1].score, 1);
        assert_eq!(game.board.height(Point::new(3, 4)), Some(0));
        assert_eq!(game.who_just_played(), 1);
        assert_eq!(game.ranking_score(1), 1);
        assert_eq!(game.ranking_score(0), 0);
        game.players[0].die();
        assert_eq!(game.ranking_score(0), -1);
    }

    #[test]
    fn test_apply_scored_only_counts_in_score_mode() {
        let mut game = create_test_game(Ruleset::for_version(1));
        let actor = UnitRef::new(0, 0);
        let result = ActionResult {
            kind: ActionKind::Move,
            move_target: Point::new(0, 1),
            build_target: Point::new(0, 2),
            move_valid: true,
            build_valid: true,
            scored: true,
            unit: actor,
        };
        game.apply(actor, result);
        assert!(!game.players[0].won);
        assert_eq!(game.players[0].score, 1);
    }

    #[test]
    fn test_reset_round_clears_outcomes() {
        let mut game = create_test_game(Ruleset::for_version(1));
        game.players[0].units[0].got_pushed = true;
        game.players[0].set_message(Some("hi"));
        game.reset_round();
        assert!(!game.players[0].units[0].got_pushed);
        assert_eq!(game.players[0].message(), None);
    }

    #[test]
    fn test_reset_round_awards_height_wins() {
        let mut game = create_test_game(Ruleset::for_version(0));
        let spot = Point::new(4, 4).neighbor(Direction::NW);
        for _ in 0..3 {
            game.board.raise(spot);
        }
        game.players[1].units[0].position = spot;
        game.reset_round();
        assert!(game.players[1].won);
        assert!(!game.players[0].won);
    }
}
