//! Series of matches over consecutive seeds.
//!
//! Every match is independent, so a series runs in parallel with rayon:
//! each worker folds results into its own [`TournamentStats`] and the
//! partial stats are merged at the end.

// Averages over game counts are intentionally lossy.
#![allow(clippy::cast_precision_loss)]

use log::warn;
use rayon::prelude::*;

use crate::config::MatchSettings;
use crate::game::Ruleset;
use crate::referee::{AgentError, MatchConfig, MatchResult, PlayerAgent};
use crate::session::{run_match, PLAYER_COUNT};

/// Parameters shared by every match of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesConfig {
    /// Seed of the first match; match `i` uses `base_seed + i`.
    pub base_seed: i64,
    /// Number of matches.
    pub games: u64,
    /// Map index for every match, negative for random.
    pub map_index: i32,
    /// Mirror spawns.
    pub symmetric: bool,
    /// Rules in force.
    pub ruleset: Ruleset,
    /// Turn timeouts.
    pub match_config: MatchConfig,
}

impl SeriesConfig {
    /// Settings of the `index`-th match.
    #[must_use]
    pub fn settings_for(&self, index: u64) -> MatchSettings {
        MatchSettings {
            seed: self.base_seed.wrapping_add_unsigned(index),
            map_index: self.map_index,
            symmetric: self.symmetric,
        }
    }
}

/// Aggregated results of a series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TournamentStats {
    /// Matches that ran to completion.
    pub games_played: u64,
    /// Matches that could not be set up.
    pub games_failed: u64,
    /// Win count per seat.
    pub wins: Vec<u64>,
    /// Tied matches.
    pub ties: u64,
    total_scores: Vec<f64>,
    score_sq_sums: Vec<f64>,
    total_rounds: u64,
}

impl TournamentStats {
    /// Empty stats for `players` seats.
    #[must_use]
    pub fn new(players: usize) -> Self {
        Self {
            wins: vec![0; players],
            total_scores: vec![0.0; players],
            score_sq_sums: vec![0.0; players],
            ..Self::default()
        }
    }

    /// Fold one match result into the stats.
    pub fn add_result(&mut self, result: &MatchResult) {
        self.games_played += 1;
        self.total_rounds += u64::from(result.rounds);

        match result.outcome.winner() {
            Some(winner) => {
                if let Some(w) = self.wins.get_mut(winner) {
                    *w += 1;
                }
            }
            None => self.ties += 1,
        }

        for (i, &score) in result.scores.iter().enumerate() {
            if i < self.total_scores.len() {
                let score = score as f64;
                self.total_scores[i] += score;
                self.score_sq_sums[i] += score * score;
            }
        }
    }

    /// Merge stats from another worker.
    pub fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.games_failed += other.games_failed;
        self.ties += other.ties;
        self.total_rounds += other.total_rounds;
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += b;
        }
        for (a, b) in self.total_scores.iter_mut().zip(&other.total_scores) {
            *a += b;
        }
        for (a, b) in self.score_sq_sums.iter_mut().zip(&other.score_sq_sums) {
            *a += b;
        }
    }

    /// Win rate of a seat (0.0-1.0).
    #[must_use]
    pub fn win_rate(&self, player: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins.get(player).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Tie rate (0.0-1.0).
    #[must_use]
    pub fn tie_rate(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.ties as f64 / self.games_played as f64
    }

    /// Average final score of a seat.
    #[must_use]
    pub fn avg_score(&self, player: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_scores.get(player).copied().unwrap_or(0.0) / self.games_played as f64
    }

    /// Standard deviation of a seat's final score.
    #[must_use]
    pub fn score_std_dev(&self, player: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        let n = self.games_played as f64;
        let mean = self.avg_score(player);
        let sq_sum = self.score_sq_sums.get(player).copied().unwrap_or(0.0);
        (sq_sum / n - mean * mean).max(0.0).sqrt()
    }

    /// Average match length in rounds.
    #[must_use]
    pub fn avg_rounds(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_rounds as f64 / self.games_played as f64
    }
}

/// Run a series in parallel.
///
/// `agents` builds the seat agents for the match with the given index.
/// `on_game` is called after each match, for progress reporting. Matches
/// whose agents or map cannot be set up are counted in
/// [`TournamentStats::games_failed`].
pub fn run_series<F, P>(config: &SeriesConfig, agents: F, on_game: P) -> TournamentStats
where
    F: Fn(u64) -> Result<Vec<Box<dyn PlayerAgent>>, AgentError> + Sync,
    P: Fn() + Sync,
{
    (0..config.games)
        .into_par_iter()
        .fold(
            || TournamentStats::new(PLAYER_COUNT),
            |mut stats, i| {
                let settings = config.settings_for(i);
                let played = agents(i).map_err(|e| e.to_string()).and_then(|seats| {
                    run_match(settings, config.ruleset, seats, config.match_config)
                        .map_err(|e| e.to_string())
                });
                match played {
                    Ok((result, _)) => stats.add_result(&result),
                    Err(e) => {
                        warn!("match {i} (seed {}) failed: {e}", settings.seed);
                        stats.games_failed += 1;
                    }
                }
                on_game();
                stats
            },
        )
        .reduce(
            || TournamentStats::new(PLAYER_COUNT),
            |mut a, b| {
                a.merge(&b);
                a
            },
        )
}
