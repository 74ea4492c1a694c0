//! End-to-end match scenarios through the referee.
//!
//! Each test builds a small position by hand, plays scripted responses
//! through [`MatchRunner`] and checks the final state and result.
//!
//! Run with: cargo test --release match_scenarios

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use wondev::game::{Board, GameState, Player, Point, Ruleset};
use wondev::referee::{AgentError, EndReason, MatchConfig, MatchRunner, Outcome, PlayerAgent, ScriptedAgent};
use wondev::replay::Recording;
use wondev::{run_match, GameSession, MatchSettings};

fn init_logging() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

fn square() -> Board {
    Board::from_points((0..5).flat_map(|y| (0..5).map(move |x| Point::new(x, y))))
}

fn session(board: Board, ruleset: Ruleset, p0: &[Point], p1: &[Point]) -> GameSession {
    GameSession::from_state(
        GameState::new(board, vec![Player::new(0, p0), Player::new(1, p1)], ruleset),
        MatchSettings::with_seed(0),
    )
}

/// Plays the first legal action offered, or concedes when none is.
#[derive(Debug, Default)]
struct FirstLegalAgent;

impl PlayerAgent for FirstLegalAgent {
    fn exchange(&mut self, input: &[String], _timeout: Duration) -> Result<String, AgentError> {
        Ok(input
            .iter()
            .find(|line| line.starts_with("MOVE&BUILD") || line.starts_with("PUSH&BUILD"))
            .map_or_else(|| "ACCEPT-DEFEAT no moves".to_string(), |a| format!("{a} hi")))
    }
}

fn first_legal_pair() -> Vec<Box<dyn PlayerAgent>> {
    vec![Box::new(FirstLegalAgent), Box::new(FirstLegalAgent)]
}

#[test]
fn test_win_on_max_height() {
    init_logging();
    let mut board = square();
    for _ in 0..2 {
        board.raise(Point::new(0, 0));
    }
    for _ in 0..3 {
        board.raise(Point::new(1, 0));
    }
    let game = session(board, Ruleset::for_version(0), &[Point::new(0, 0)], &[Point::new(4, 4)]);
    let agents: Vec<Box<dyn PlayerAgent>> = vec![
        Box::new(ScriptedAgent::new(["MOVE&BUILD 0 E E"])),
        Box::new(ScriptedAgent::default()),
    ];

    let (result, game) = MatchRunner::new(game, agents, MatchConfig::default())
        .unwrap()
        .run();

    assert_eq!(result.outcome, Outcome::Win { winner: 0, loser: 1 });
    assert_eq!(result.end_reason, EndReason::GameOver);
    assert_eq!(result.scores, vec![1, 0]);
    assert_eq!(result.rounds, 1);
    // Player 1 never got a turn.
    assert!(result.turns.iter().all(|t| t.player == 0));

    let state = game.state();
    assert!(state.players[0].won);
    assert_eq!(state.players[0].units[0].position, Point::new(1, 0));
    assert_eq!(state.board.height(Point::new(2, 0)), Some(1));
}

#[test]
fn test_win_by_climbing_own_builds() {
    init_logging();
    let game = session(square(), Ruleset::for_version(0), &[Point::new(0, 0)], &[Point::new(4, 4)]);
    // Staircase on (1,0) and (1,1): each move builds the cell just left.
    let climber = ScriptedAgent::new([
        "MOVE&BUILD 0 S E",
        "MOVE&BUILD 0 E N",
        "MOVE&BUILD 0 N S",
        "MOVE&BUILD 0 S N",
        "MOVE&BUILD 0 N S",
        "MOVE&BUILD 0 S S",
    ]);
    let shuttle = ScriptedAgent::new([
        "MOVE&BUILD 0 N S",
        "MOVE&BUILD 0 S N",
        "MOVE&BUILD 0 N S",
        "MOVE&BUILD 0 S N",
        "MOVE&BUILD 0 N S",
    ]);
    let agents: Vec<Box<dyn PlayerAgent>> = vec![Box::new(climber), Box::new(shuttle)];

    let (result, game) = MatchRunner::new(game, agents, MatchConfig::default())
        .unwrap()
        .run();

    assert!(result.eliminations.is_empty(), "{:?}", result.eliminations);
    assert_eq!(result.outcome, Outcome::Win { winner: 0, loser: 1 });
    assert_eq!(result.end_reason, EndReason::GameOver);
    assert_eq!(result.rounds, 6);
    assert_eq!(result.responses_of(0).len(), 6);
    assert_eq!(result.responses_of(1).len(), 5);

    let state = game.state();
    assert!(state.players[0].won);
    assert_eq!(state.players[0].units[0].position, Point::new(1, 1));
    assert_eq!(state.board.height(Point::new(1, 1)), Some(3));
    assert_eq!(state.board.height(Point::new(1, 0)), Some(2));
    let last = result.frames.last().unwrap();
    assert!(last.summary.iter().any(|l| l == "...and wins the game!"), "{:?}", last.summary);
}

#[test]
fn test_frames_report_who_just_played() {
    let game = session(square(), Ruleset::for_version(1), &[Point::new(0, 0)], &[Point::new(4, 4)]);
    let agents: Vec<Box<dyn PlayerAgent>> = vec![
        Box::new(ScriptedAgent::new(["MOVE&BUILD 0 E E", "MOVE&BUILD 0 E E"])),
        Box::new(ScriptedAgent::new(["MOVE&BUILD 0 W W", "MOVE&BUILD 0 W W"])),
    ];

    let (result, _) = MatchRunner::new(game, agents, MatchConfig::default())
        .unwrap()
        .run();

    // Initial frame, four played turns, then both players time out.
    let order: Vec<&str> = result
        .frames
        .iter()
        .map(|f| f.view.last().unwrap().as_str())
        .collect();
    assert_eq!(order, vec!["0", "0", "1", "0", "1", "0", "1"]);
    assert_eq!(result.frames[2].round, 0);
}

#[test]
fn test_push_off_the_edge_eliminates() {
    init_logging();
    let game = session(
        square(),
        Ruleset::for_version(2),
        &[Point::new(1, 0), Point::new(3, 3)],
        &[Point::new(0, 0), Point::new(4, 4)],
    );
    let agents: Vec<Box<dyn PlayerAgent>> = vec![
        Box::new(ScriptedAgent::new(["PUSH&BUILD 0 W W"])),
        Box::new(ScriptedAgent::default()),
    ];

    let (result, game) = MatchRunner::new(game, agents, MatchConfig::default())
        .unwrap()
        .run();

    let codes: Vec<&str> = result
        .eliminations
        .iter()
        .map(|e| e.defeat.code.as_str())
        .collect();
    assert_eq!(codes, vec!["PushInvalid", "Timeout"]);
    assert_eq!(result.eliminations[0].defeat.reason, "Not a valid push: W + W.");
    assert_eq!(result.end_reason, EndReason::GameOver);
    assert_eq!(result.outcome, Outcome::Tie);

    let elimination_frame = result
        .frames
        .iter()
        .find(|f| f.reason_code.as_deref() == Some("PushInvalid"))
        .unwrap();
    assert_eq!(elimination_frame.tooltips[0].player, 0);

    // Nothing moved.
    let state = game.state();
    assert_eq!(state.players[1].units[0].position, Point::new(0, 0));
    assert!(state.board.iter().all(|(_, h)| h == 0));
}

#[test]
fn test_fog_hides_enemies_and_skips_blind_build() {
    init_logging();
    let game = session(
        square(),
        Ruleset::for_version(3),
        &[Point::new(0, 0), Point::new(0, 4)],
        &[Point::new(2, 2), Point::new(4, 0)],
    );
    let mut p0 = ScriptedAgent::new(["MOVE&BUILD 0 SE SE"]);
    let mut p1 = ScriptedAgent::default();
    let agents = vec![
        Box::new(&mut p0) as Box<dyn PlayerAgent + '_>,
        Box::new(&mut p1) as Box<dyn PlayerAgent + '_>,
    ];

    let (result, game) = MatchRunner::new(game, agents, MatchConfig::default())
        .unwrap()
        .run();

    let first_input = &p0.received()[0];
    assert_eq!(&first_input[..2], ["5", "2"]);
    assert_eq!(&first_input[2..7], ["00000"; 5]);
    assert_eq!(&first_input[7..11], ["0 0", "0 4", "-1 -1", "-1 -1"]);
    // The second turn carries no init lines.
    assert_eq!(p0.received()[1][0], "00000");

    let state = game.state();
    assert_eq!(state.players[0].units[0].position, Point::new(1, 1));
    assert_eq!(state.board.height(Point::new(2, 2)), Some(0));
    assert_eq!(result.eliminations.len(), 2);
    assert_eq!(result.eliminations[0].defeat.code, "Timeout");
    assert_eq!(result.eliminations[0].player, 1);
}

#[test]
fn test_invalid_input_reports_expected_form() {
    let game = session(square(), Ruleset::for_version(1), &[Point::new(2, 2)], &[Point::new(4, 4)]);
    let agents: Vec<Box<dyn PlayerAgent>> = vec![
        Box::new(ScriptedAgent::new(["MOVE 0 N"])),
        Box::new(ScriptedAgent::default()),
    ];

    let (result, _) = MatchRunner::new(game, agents, MatchConfig::default())
        .unwrap()
        .run();

    let defeat = &result.eliminations[0].defeat;
    assert_eq!(defeat.code, "InvalidInput");
    assert_eq!(
        defeat.reason,
        "Invalid input. Expected 'MOVE&BUILD <index> <direction> <direction>' but found 'MOVE 0 N'."
    );
}

#[test]
fn test_full_match_is_deterministic() {
    init_logging();
    for version in 0..=3 {
        let settings = MatchSettings::with_seed(1234 + i64::from(version));
        let ruleset = Ruleset::for_version(version);
        let (first, first_session) =
            run_match(settings, ruleset, first_legal_pair(), MatchConfig::default()).unwrap();
        let (second, _) =
            run_match(settings, ruleset, first_legal_pair(), MatchConfig::default()).unwrap();

        assert_eq!(first, second, "rules v{version}");
        assert!(first.rounds <= ruleset.max_rounds);
        // A player answering from the legal list never breaks a rule.
        assert!(
            first
                .eliminations
                .iter()
                .all(|e| e.defeat.code == "selfDestruct"),
            "rules v{version}: {:?}",
            first.eliminations
        );

        let recording = Recording::from_match(&first_session, &first);
        assert_eq!(recording.verify().unwrap().frames, first.frames);
    }
}

#[test]
fn test_rejects_wrong_agent_count() {
    let agents: Vec<Box<dyn PlayerAgent>> = vec![Box::new(FirstLegalAgent)];
    assert!(
        run_match(
            MatchSettings::with_seed(1),
            Ruleset::default(),
            agents,
            MatchConfig::default()
        )
        .is_err()
    );
}
