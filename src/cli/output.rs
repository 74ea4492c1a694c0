//! Output formatting utilities for CLI.

// Percentages over game counts are intentionally lossy.
#![allow(clippy::cast_precision_loss)]

use std::fmt::Write;

use serde::Serialize;
use wondev::referee::{EndReason, Frame, MatchResult, Outcome};
use wondev::tournament::TournamentStats;
use wondev::MatchSettings;

/// JSON-serializable match result.
#[derive(Debug, Serialize)]
pub(super) struct JsonMatchResult {
    /// Random seed used.
    pub(super) seed: i64,
    /// Map actually played.
    pub(super) map_index: i32,
    /// Rule version.
    pub(super) rules: u8,
    /// Winner seat (null if tie).
    pub(super) winner: Option<usize>,
    /// Rounds played.
    pub(super) rounds: u32,
    /// Why the match stopped.
    pub(super) end_reason: EndReason,
    /// Per-player results.
    pub(super) players: Vec<JsonPlayerResult>,
}

/// JSON-serializable player result.
#[derive(Debug, Serialize)]
pub(super) struct JsonPlayerResult {
    /// Seat index (0-based).
    pub(super) id: usize,
    /// Player command line.
    pub(super) command: String,
    /// Final ranking score.
    pub(super) score: i64,
    /// Round eliminated (null if survived).
    pub(super) eliminated_round: Option<u32>,
    /// Elimination reason code.
    pub(super) reason: Option<String>,
}

impl JsonMatchResult {
    /// Create from a match result.
    pub(super) fn from_match(
        result: &MatchResult,
        settings: MatchSettings,
        rules: u8,
        names: &[String],
    ) -> Self {
        Self {
            seed: settings.seed,
            map_index: settings.map_index,
            rules,
            winner: result.outcome.winner(),
            rounds: result.rounds,
            end_reason: result.end_reason,
            players: result
                .scores
                .iter()
                .enumerate()
                .map(|(id, &score)| {
                    let elimination = result.eliminations.iter().find(|e| e.player == id);
                    JsonPlayerResult {
                        id,
                        command: names.get(id).cloned().unwrap_or_default(),
                        score,
                        eliminated_round: elimination.map(|e| e.round),
                        reason: elimination.map(|e| e.defeat.code.clone()),
                    }
                })
                .collect(),
        }
    }
}

/// Format a match result as human-readable text.
pub(super) fn format_text(
    result: &MatchResult,
    settings: MatchSettings,
    names: &[String],
) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "Match Result (seed: {}, map: {})",
        settings.seed, settings.map_index
    );
    match result.outcome {
        Outcome::Win { winner, .. } => {
            let name = names.get(winner).map_or("Unknown", String::as_str);
            let _ = writeln!(output, "  Winner: Player {winner} ({name})");
        }
        Outcome::Tie => output.push_str("  Winner: Tie\n"),
    }
    let _ = writeln!(
        output,
        "  Rounds: {} ({})\n",
        result.rounds,
        end_reason_text(result.end_reason)
    );

    for (i, score) in result.scores.iter().enumerate() {
        let name = names.get(i).map_or("Unknown", String::as_str);
        let _ = write!(output, "  Player {i}: {score} ({name})");
        if let Some(elimination) = result.eliminations.iter().find(|e| e.player == i) {
            let _ = write!(
                output,
                " [{} round {}: {}]",
                elimination.defeat.code, elimination.round, elimination.defeat.reason
            );
        }
        output.push('\n');
    }

    output
}

fn end_reason_text(reason: EndReason) -> &'static str {
    match reason {
        EndReason::GameOver => "game over",
        EndReason::NoPlayersLeft => "no players left",
        EndReason::MaxRounds => "round limit",
    }
}

/// Format frames as raw viewer data, one block per frame.
pub(super) fn format_frames(frames: &[Frame]) -> String {
    let mut output = String::new();
    for frame in frames {
        let _ = writeln!(
            output,
            "[[Frame {} round {}{}]]",
            frame.number,
            frame.round,
            if frame.key_frame { " KEY" } else { "" }
        );
        for line in &frame.view {
            let _ = writeln!(output, "{line}");
        }
        if let Some(code) = &frame.reason_code {
            let _ = writeln!(output, "[[Reason]] {code}");
        }
        for tooltip in &frame.tooltips {
            let _ = writeln!(output, "[[Tooltip {}]] {}", tooltip.player, tooltip.text);
        }
        for line in &frame.summary {
            let _ = writeln!(output, "[[Summary]] {line}");
        }
    }
    output
}

/// Format round summaries, as a spectator would read them.
pub(super) fn format_summaries(frames: &[Frame]) -> String {
    let mut output = String::new();
    for frame in frames.iter().filter(|f| !f.summary.is_empty()) {
        let _ = writeln!(output, "Round {}:", frame.round);
        for line in &frame.summary {
            let _ = writeln!(output, "  {line}");
        }
    }
    output
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    /// Matches played to completion.
    games_played: u64,
    /// Matches that failed to start.
    games_failed: u64,
    /// Per-player statistics.
    players: Vec<JsonTournamentPlayer>,
    /// Number of ties.
    ties: u64,
    /// Average match length in rounds.
    avg_rounds: f64,
}

/// JSON-serializable per-player tournament stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentPlayer {
    /// Seat index (0-based).
    player: usize,
    /// Player command line.
    command: String,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Average score.
    avg_score: f64,
    /// Score standard deviation.
    score_std_dev: f64,
}

impl JsonTournamentResult {
    /// Create from stats and player names.
    pub(super) fn from_stats(stats: &TournamentStats, names: &[String]) -> Self {
        let players = names
            .iter()
            .enumerate()
            .map(|(i, name)| JsonTournamentPlayer {
                player: i,
                command: name.clone(),
                wins: stats.wins.get(i).copied().unwrap_or(0),
                win_rate: stats.win_rate(i),
                avg_score: stats.avg_score(i),
                score_std_dev: stats.score_std_dev(i),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            games_failed: stats.games_failed,
            players,
            ties: stats.ties,
            avg_rounds: stats.avg_rounds(),
        }
    }
}

/// Format tournament stats as human-readable text.
pub(super) fn format_tournament_text(stats: &TournamentStats, names: &[String]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Tournament Results ({} games)", stats.games_played);
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for (i, name) in names.iter().enumerate() {
        let wins = stats.wins.get(i).copied().unwrap_or(0);
        let rate = stats.win_rate(i) * 100.0;
        let _ = writeln!(output, "  Player {i} ({name}): {rate:.1}% ({wins} wins)");
    }
    let _ = writeln!(
        output,
        "  Ties: {} ({:.1}%)\n",
        stats.ties,
        stats.tie_rate() * 100.0
    );

    output.push_str("Average Scores:\n");
    for (i, name) in names.iter().enumerate() {
        let _ = writeln!(
            output,
            "  Player {i} ({name}): {:.2} (+/- {:.2})",
            stats.avg_score(i),
            stats.score_std_dev(i)
        );
    }

    let _ = writeln!(output, "\nAverage Match Length: {:.1} rounds", stats.avg_rounds());
    if stats.games_failed > 0 {
        let _ = writeln!(output, "Failed to start: {} games", stats.games_failed);
    }

    output
}

/// Format tournament stats as CSV.
pub(super) fn format_tournament_csv(stats: &TournamentStats, names: &[String]) -> String {
    let mut output = String::from("player,command,wins,win_rate,avg_score,score_std_dev\n");

    for (i, name) in names.iter().enumerate() {
        let _ = writeln!(
            output,
            "{i},\"{}\",{},{:.4},{:.2},{:.2}",
            name.replace('"', "\"\""),
            stats.wins.get(i).copied().unwrap_or(0),
            stats.win_rate(i),
            stats.avg_score(i),
            stats.score_std_dev(i)
        );
    }

    output
}
