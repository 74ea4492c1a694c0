//! Wondev CLI - run, replay and benchmark matches between player programs.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Wondev - a deterministic move-and-build game referee
#[derive(Parser, Debug)]
#[command(name = "wondev")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single match between two player programs
    Run {
        /// Player command lines, e.g. "python3 bot.py"
        #[arg(required = true, num_args = 2)]
        players: Vec<String>,

        #[command(flatten)]
        game: cli::GameArgs,

        /// Output format: text, json, or frames
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Save recording to file
        #[arg(long)]
        save: Option<PathBuf>,

        /// Time allowed for a player's first turn, in milliseconds
        #[arg(long, default_value = "1000")]
        first_timeout: u64,

        /// Time allowed for later turns, in milliseconds
        #[arg(long, default_value = "150")]
        timeout: u64,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Replay a recorded match
    Replay {
        /// Recording file (.json)
        #[arg(required = true)]
        recording: PathBuf,

        /// Output format: text or frames
        #[arg(short, long, default_value = "text")]
        format: cli::ReplayFormat,

        /// Stop after this frame
        #[arg(long)]
        frame: Option<u32>,

        /// Fail if the replay does not reproduce the recorded outcome
        #[arg(long)]
        verify: bool,
    },

    /// Run many matches in parallel and aggregate statistics
    Tournament {
        /// Player command lines, e.g. "python3 bot.py"
        #[arg(required = true, num_args = 2)]
        players: Vec<String>,

        #[command(flatten)]
        game: cli::GameArgs,

        /// Number of matches to run
        #[arg(short, long, default_value = "100")]
        games: u64,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TournamentFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            players,
            game,
            format,
            save,
            first_timeout,
            timeout,
            quiet,
        } => {
            let timeouts = cli::run::Timeouts {
                first_turn_ms: first_timeout,
                turn_ms: timeout,
            };
            cli::run::execute(&players, &game, format, save.as_deref(), timeouts, quiet)
        }

        Commands::Replay {
            recording,
            format,
            frame,
            verify,
        } => cli::replay::execute(&recording, format, frame, verify),

        Commands::Tournament {
            players,
            game,
            games,
            threads,
            format,
            progress,
        } => cli::tournament::execute(&players, &game, games, threads, format, progress),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
