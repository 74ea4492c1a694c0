//! Generic turn-based match orchestration.
//!
//! The [`MatchRunner`] owns the turn loop: it asks the game for input,
//! exchanges it with the active player's agent, hands the response back to
//! the game and records a [`Frame`] per turn. Everything game specific sits
//! behind [`TurnBasedGame`].
//!
//! Play is round-robin starting with player 0, skipping eliminated players.
//! A round ends once every remaining player has acted. The match ends when
//! the game says so, when nobody is left to play, or after the round cap.

mod agent;

pub use agent::{AgentError, PlayerAgent, ProcessAgent, ScriptedAgent};

use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::EliminationCause;
use crate::game::PlayerId;

/// Default time allowed for a player's first turn.
pub const FIRST_TURN_TIMEOUT: Duration = Duration::from_millis(1000);

/// Default time allowed for every later turn.
pub const TURN_TIMEOUT: Duration = Duration::from_millis(150);

/// Why a player was removed from the match, as reported by the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defeat {
    /// Stable reason code.
    pub code: String,
    /// Full human-readable reason.
    pub reason: String,
    /// Short reason for the viewer.
    pub tooltip: String,
}

impl From<EliminationCause> for Defeat {
    fn from(cause: EliminationCause) -> Self {
        Self {
            code: cause.code().to_string(),
            reason: cause.reason(),
            tooltip: cause.tooltip(),
        }
    }
}

/// Game-specific behavior driven by the [`MatchRunner`].
pub trait TurnBasedGame {
    /// Number of seats.
    fn player_count(&self) -> usize;

    /// Round cap.
    fn max_rounds(&self) -> u32;

    /// Reset per-round state before the first turn of `round`.
    fn prepare_round(&mut self, round: u32);

    /// Lines sent to `player` once, ahead of its first turn input.
    fn init_input(&self, player: PlayerId) -> Vec<String>;

    /// Lines sent to `player` at the start of its turn.
    fn turn_input(&self, player: PlayerId) -> Vec<String>;

    /// Handle `player`'s response line.
    ///
    /// # Errors
    ///
    /// Returns the defeat if the response eliminates the player. The game
    /// must already have marked the player as eliminated.
    fn apply_output(&mut self, player: PlayerId, line: &str) -> Result<(), Defeat>;

    /// Eliminate `player` for not answering and describe why.
    fn timeout(&mut self, player: PlayerId) -> Defeat;

    /// Whether the game has reached a terminal state.
    fn is_over(&self) -> bool;

    /// Final ranking score of `player`; higher is better.
    fn score(&self, player: PlayerId) -> i64;

    /// Viewer header lines, sent with the first frame.
    fn view_init(&self) -> Vec<String>;

    /// Viewer data for the current frame.
    fn view_frame(&self) -> Vec<String>;

    /// Summary of the round in progress.
    fn summary(&self) -> Vec<String>;
}

/// Match timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    /// Time allowed for a player's first turn.
    pub first_turn_timeout: Duration,
    /// Time allowed for every later turn.
    pub turn_timeout: Duration,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            first_turn_timeout: FIRST_TURN_TIMEOUT,
            turn_timeout: TURN_TIMEOUT,
        }
    }
}

/// Final verdict of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// One player ranked strictly highest.
    Win {
        /// Best ranked player.
        winner: PlayerId,
        /// Worst ranked player.
        loser: PlayerId,
    },
    /// The best score is shared.
    Tie,
}

impl Outcome {
    /// Decide the outcome from final scores.
    #[must_use]
    pub fn from_scores(scores: &[i64]) -> Self {
        let Some(&best) = scores.iter().max() else {
            return Outcome::Tie;
        };
        if scores.iter().filter(|&&s| s == best).count() != 1 {
            return Outcome::Tie;
        }
        let winner = scores.iter().position(|&s| s == best).unwrap_or(0);
        let loser = scores
            .iter()
            .enumerate()
            .min_by_key(|&(_, &s)| s)
            .map_or(0, |(i, _)| i);
        Outcome::Win { winner, loser }
    }

    /// The winning player, if any.
    #[must_use]
    pub const fn winner(&self) -> Option<PlayerId> {
        match self {
            Outcome::Win { winner, .. } => Some(*winner),
            Outcome::Tie => None,
        }
    }
}

/// Why the turn loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// The game reached a terminal state.
    GameOver,
    /// Every player was eliminated.
    NoPlayersLeft,
    /// The round cap was reached.
    MaxRounds,
}

/// A short message attached to a player in a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tooltip {
    /// Player concerned.
    pub player: PlayerId,
    /// Text to show.
    pub text: String,
}

/// Viewer data for one step of the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Sequential frame number, 0 for the initial state.
    pub number: u32,
    /// Round the frame belongs to.
    pub round: u32,
    /// First frame of a round.
    pub key_frame: bool,
    /// Reason code if the acting player was eliminated.
    pub reason_code: Option<String>,
    /// Viewer data lines.
    pub view: Vec<String>,
    /// Round summary, on the last frame of each round.
    pub summary: Vec<String>,
    /// Tooltips raised during this frame.
    pub tooltips: Vec<Tooltip>,
}

/// One exchange with a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnLog {
    /// Round of the turn.
    pub round: u32,
    /// Acting player.
    pub player: PlayerId,
    /// Response line, `None` if the player did not answer.
    pub response: Option<String>,
}

/// A player's removal from the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elimination {
    /// Eliminated player.
    pub player: PlayerId,
    /// Round of the elimination.
    pub round: u32,
    /// Why.
    pub defeat: Defeat,
}

/// Everything observed during a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Final verdict.
    pub outcome: Outcome,
    /// Final ranking score per player.
    pub scores: Vec<i64>,
    /// Rounds started.
    pub rounds: u32,
    /// Why play stopped.
    pub end_reason: EndReason,
    /// Viewer frames.
    pub frames: Vec<Frame>,
    /// Every exchange, in order.
    pub turns: Vec<TurnLog>,
    /// Eliminations in order.
    pub eliminations: Vec<Elimination>,
}

impl MatchResult {
    /// Responses of `player` in order, `None` for timeouts.
    #[must_use]
    pub fn responses_of(&self, player: PlayerId) -> Vec<Option<String>> {
        self.turns
            .iter()
            .filter(|t| t.player == player)
            .map(|t| t.response.clone())
            .collect()
    }
}

/// Error type for referee operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefereeError {
    /// The number of agents does not match the number of seats.
    #[error("expected {expected} player agents, got {found}")]
    PlayerCount {
        /// Seats in the game.
        expected: usize,
        /// Agents supplied.
        found: usize,
    },
}

/// Drives a [`TurnBasedGame`] against a set of player agents.
pub struct MatchRunner<'a, G> {
    game: G,
    agents: Vec<Box<dyn PlayerAgent + 'a>>,
    config: MatchConfig,
    eliminated: Vec<bool>,
    has_played: Vec<bool>,
    frames: Vec<Frame>,
    turns: Vec<TurnLog>,
    eliminations: Vec<Elimination>,
}

impl<G: std::fmt::Debug> std::fmt::Debug for MatchRunner<'_, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchRunner")
            .field("game", &self.game)
            .field("agents", &self.agents.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a, G: TurnBasedGame> MatchRunner<'a, G> {
    /// Create a runner with one agent per seat, in seat order.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent count does not match the game.
    pub fn new(
        game: G,
        agents: Vec<Box<dyn PlayerAgent + 'a>>,
        config: MatchConfig,
    ) -> Result<Self, RefereeError> {
        let expected = game.player_count();
        if agents.len() != expected {
            return Err(RefereeError::PlayerCount {
                expected,
                found: agents.len(),
            });
        }
        Ok(Self {
            game,
            agents,
            config,
            eliminated: vec![false; expected],
            has_played: vec![false; expected],
            frames: Vec::new(),
            turns: Vec::new(),
            eliminations: Vec::new(),
        })
    }

    /// The game being played.
    #[must_use]
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Play the match to the end and give back the game in its final state.
    pub fn run(mut self) -> (MatchResult, G) {
        let max_rounds = self.game.max_rounds();
        let mut round = 0;
        let mut end_reason = EndReason::MaxRounds;

        self.game.prepare_round(round);
        let mut view = self.game.view_init();
        view.extend(self.game.view_frame());
        self.frames.push(Frame {
            number: 0,
            round,
            key_frame: true,
            reason_code: None,
            view,
            summary: Vec::new(),
            tooltips: Vec::new(),
        });

        let mut mid_round = false;
        'rounds: while round < max_rounds {
            // Preparing a round can decide the game on its own.
            if self.game.is_over() {
                end_reason = EndReason::GameOver;
                break;
            }
            let mut key_frame = true;
            for player in 0..self.agents.len() {
                if self.eliminated[player] {
                    continue;
                }
                self.play_turn(round, player, key_frame);
                key_frame = false;

                if self.game.is_over() {
                    end_reason = EndReason::GameOver;
                    mid_round = true;
                    break 'rounds;
                }
                if self.eliminated.iter().all(|&e| e) {
                    end_reason = EndReason::NoPlayersLeft;
                    mid_round = true;
                    break 'rounds;
                }
            }
            self.close_round();
            round += 1;
            if round < max_rounds {
                self.game.prepare_round(round);
            }
        }
        if mid_round {
            self.close_round();
            round += 1;
        }

        let scores: Vec<i64> = (0..self.agents.len()).map(|p| self.game.score(p)).collect();
        let outcome = Outcome::from_scores(&scores);
        info!("match over after {round} rounds ({end_reason:?}): {outcome:?}, scores {scores:?}");

        let result = MatchResult {
            outcome,
            scores,
            rounds: round,
            end_reason,
            frames: self.frames,
            turns: self.turns,
            eliminations: self.eliminations,
        };
        (result, self.game)
    }

    /// Exchange one turn with `player` and record the resulting frame.
    fn play_turn(&mut self, round: u32, player: PlayerId, key_frame: bool) {
        let mut input = if self.has_played[player] {
            Vec::new()
        } else {
            self.game.init_input(player)
        };
        input.extend(self.game.turn_input(player));

        let timeout = if self.has_played[player] {
            self.config.turn_timeout
        } else {
            self.config.first_turn_timeout
        };
        self.has_played[player] = true;

        let outcome = match self.agents[player].exchange(&input, timeout) {
            Ok(line) => {
                debug!("round {round}: player {player} answered {line:?}");
                self.turns.push(TurnLog {
                    round,
                    player,
                    response: Some(line.clone()),
                });
                self.game.apply_output(player, &line)
            }
            Err(e) => {
                debug!("round {round}: player {player} gave no answer: {e}");
                self.turns.push(TurnLog {
                    round,
                    player,
                    response: None,
                });
                Err(self.game.timeout(player))
            }
        };

        let mut frame = Frame {
            number: u32::try_from(self.frames.len()).unwrap_or(u32::MAX),
            round,
            key_frame,
            reason_code: None,
            view: Vec::new(),
            summary: Vec::new(),
            tooltips: Vec::new(),
        };
        if let Err(defeat) = outcome {
            debug!("round {round}: player {player} eliminated: {}", defeat.reason);
            self.eliminated[player] = true;
            frame.reason_code = Some(defeat.code.clone());
            frame.tooltips.push(Tooltip {
                player,
                text: defeat.tooltip.clone(),
            });
            self.eliminations.push(Elimination {
                player,
                round,
                defeat,
            });
        }
        frame.view = self.game.view_frame();
        self.frames.push(frame);
    }

    /// Attach the round summary to the last frame.
    fn close_round(&mut self) {
        let summary = self.game.summary();
        if let Some(frame) = self.frames.last_mut() {
            frame.summary = summary;
        }
    }
}
