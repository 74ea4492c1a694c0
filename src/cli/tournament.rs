//! Tournament command implementation.

use super::output::{format_tournament_csv, format_tournament_text, JsonTournamentResult};
use super::{CliError, GameArgs, TournamentFormat};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use wondev::referee::{MatchConfig, PlayerAgent, ProcessAgent};
use wondev::tournament::{run_series, SeriesConfig};

/// Execute the tournament command.
///
/// # Errors
///
/// Returns an error if the settings cannot be loaded or the thread pool
/// cannot be built.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn execute(
    players: &[String],
    game: &GameArgs,
    games: u64,
    threads: Option<usize>,
    format: TournamentFormat,
    progress: bool,
) -> Result<(), CliError> {
    let settings = game.settings()?;
    let config = SeriesConfig {
        base_seed: settings.seed,
        games,
        map_index: settings.map_index,
        symmetric: settings.symmetric,
        ruleset: game.ruleset(),
        match_config: MatchConfig::default(),
    };

    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| CliError::new(format!("Failed to build thread pool: {e}")))?;
    }

    let pb = progress.then(|| {
        let pb = ProgressBar::new(games);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})",
        ) {
            pb.set_style(style.progress_chars("=>-"));
        }
        pb
    });

    let start = Instant::now();

    // Each match spawns its own player processes.
    let stats = run_series(
        &config,
        |_| {
            players
                .iter()
                .map(|command| {
                    ProcessAgent::from_command_line(command)
                        .map(|agent| Box::new(agent) as Box<dyn PlayerAgent>)
                })
                .collect()
        },
        || {
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        },
    );

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        TournamentFormat::Text => {
            println!();
            print!("{}", format_tournament_text(&stats, players));
            println!();
            println!(
                "Duration: {:.2}s ({games_per_sec:.1} games/sec)",
                duration.as_secs_f64()
            );
        }
        TournamentFormat::Json => {
            let json_result = JsonTournamentResult::from_stats(&stats, players);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
        TournamentFormat::Csv => print!("{}", format_tournament_csv(&stats, players)),
    }

    Ok(())
}
