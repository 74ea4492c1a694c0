//! Match recording and replay.
//!
//! Because matches are deterministic, a recording only needs:
//! - the settings (seed, map index, symmetric spawns)
//! - the ruleset
//! - every player's response lines, with `None` for timeouts
//!
//! Replaying feeds the recorded lines back through scripted agents and
//! reproduces the same frames and outcome.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::MatchSettings;
use crate::game::Ruleset;
use crate::referee::{MatchConfig, MatchResult, Outcome, PlayerAgent, ScriptedAgent};
use crate::session::{run_match, GameSession, SessionError, PLAYER_COUNT};

/// Minimal recording: settings, rules and responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    /// Settings with the map index actually played.
    pub settings: MatchSettings,
    /// Rules in force.
    pub ruleset: Ruleset,
    /// Responses per player, in turn order.
    pub responses: Vec<Vec<Option<String>>>,
    /// Outcome observed when the match was recorded.
    pub outcome: Outcome,
    /// Final scores observed when the match was recorded.
    pub scores: Vec<i64>,
}

/// Error type for replay operations.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// Reading or writing the recording failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The recording is not valid JSON.
    #[error("Malformed recording: {0}")]
    Format(#[from] serde_json::Error),
    /// The match could not be set up again.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// The replay diverged from the recorded result.
    #[error("Replay diverged: recorded {recorded:?} with scores {recorded_scores:?}, replayed {replayed:?} with scores {replayed_scores:?}")]
    Diverged {
        /// Recorded outcome.
        recorded: Outcome,
        /// Recorded scores.
        recorded_scores: Vec<i64>,
        /// Replayed outcome.
        replayed: Outcome,
        /// Replayed scores.
        replayed_scores: Vec<i64>,
    },
}

impl Recording {
    /// Capture a finished match.
    #[must_use]
    pub fn from_match(session: &GameSession, result: &MatchResult) -> Self {
        let players = session.state().players.len();
        Self {
            settings: session.settings(),
            ruleset: session.state().ruleset,
            responses: (0..players).map(|p| result.responses_of(p)).collect(),
            outcome: result.outcome,
            scores: result.scores.clone(),
        }
    }

    /// Save the recording as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if file operations fail.
    pub fn save(&self, path: &Path) -> Result<(), ReplayError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Load a recording from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a recording.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Play the match again from the recorded responses.
    ///
    /// # Errors
    ///
    /// Returns an error if the map cannot be regenerated.
    pub fn replay(&self) -> Result<(MatchResult, GameSession), ReplayError> {
        let agents: Vec<Box<dyn PlayerAgent>> = (0..PLAYER_COUNT)
            .map(|p| {
                let log = self.responses.get(p).cloned().unwrap_or_default();
                Box::new(ScriptedAgent::from_log(log)) as Box<dyn PlayerAgent>
            })
            .collect();
        Ok(run_match(
            self.settings,
            self.ruleset,
            agents,
            MatchConfig::default(),
        )?)
    }

    /// Replay and check the result matches the recording.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Diverged`] if outcome or scores differ.
    pub fn verify(&self) -> Result<MatchResult, ReplayError> {
        let (result, _) = self.replay()?;
        if result.outcome != self.outcome || result.scores != self.scores {
            return Err(ReplayError::Diverged {
                recorded: self.outcome,
                recorded_scores: self.scores.clone(),
                replayed: result.outcome,
                replayed_scores: result.scores,
            });
        }
        Ok(result)
    }
}
