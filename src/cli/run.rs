//! Run command implementation.

use super::output::{format_frames, format_summaries, format_text, JsonMatchResult};
use super::{CliError, GameArgs, OutputFormat};
use std::path::Path;
use std::time::Duration;
use wondev::referee::{MatchConfig, PlayerAgent, ProcessAgent};
use wondev::replay::Recording;
use wondev::run_match;

/// Turn time limits, in milliseconds.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Timeouts {
    pub(crate) first_turn_ms: u64,
    pub(crate) turn_ms: u64,
}

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if a player cannot be started or the match cannot be
/// set up.
pub(crate) fn execute(
    players: &[String],
    game: &GameArgs,
    format: OutputFormat,
    save: Option<&Path>,
    timeouts: Timeouts,
    quiet: bool,
) -> Result<(), CliError> {
    let settings = game.settings()?;
    let ruleset = game.ruleset();

    let mut agents: Vec<Box<dyn PlayerAgent>> = Vec::with_capacity(players.len());
    for command in players {
        let agent = ProcessAgent::from_command_line(command)
            .map_err(|e| CliError::new(format!("Failed to start '{command}': {e}")))?;
        agents.push(Box::new(agent));
    }

    if !quiet && format == OutputFormat::Text {
        println!("Running match with rules v{}...", ruleset.version);
        print!("{}", settings.to_properties());
        println!("Players: {}", players.join(" vs "));
        println!();
    }

    let config = MatchConfig {
        first_turn_timeout: Duration::from_millis(timeouts.first_turn_ms),
        turn_timeout: Duration::from_millis(timeouts.turn_ms),
    };
    let (result, session) = run_match(settings, ruleset, agents, config)?;
    let played = session.settings();

    if let Some(save_path) = save {
        Recording::from_match(&session, &result)
            .save(save_path)
            .map_err(|e| CliError::new(format!("Failed to save recording: {e}")))?;
        if !quiet && format == OutputFormat::Text {
            println!("Recording saved to: {}", save_path.display());
            println!();
        }
    }

    match format {
        OutputFormat::Text => {
            if !quiet {
                print!("{}", format_summaries(&result.frames));
                println!();
            }
            print!("{}", format_text(&result, played, players));
        }
        OutputFormat::Json => {
            let json_result = JsonMatchResult::from_match(&result, played, ruleset.version, players);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
        OutputFormat::Frames => print!("{}", format_frames(&result.frames)),
    }

    Ok(())
}
