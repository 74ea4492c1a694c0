//! CLI command implementations for Wondev.

pub(crate) mod replay;
pub(crate) mod run;
pub(crate) mod tournament;

mod output;

use clap::{Args, ValueEnum};
use std::fmt;
use std::path::PathBuf;

use wondev::game::{Ruleset, DEFAULT_RULES_VERSION};
use wondev::MatchSettings;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// Raw viewer frames.
    Frames,
}

/// Output format for the `replay` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReplayFormat {
    /// Round summaries and final result.
    Text,
    /// Raw viewer frames.
    Frames,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Options selecting the map and rules.
#[derive(Debug, Clone, Args)]
pub(crate) struct GameArgs {
    /// Property file with seed, mapIndex and symmetric
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Random seed (default: random, or the config file's)
    #[arg(short, long, allow_negative_numbers = true)]
    pub(crate) seed: Option<i64>,

    /// Map index: 0 square, 1 diamond, 2 generated, negative for random
    #[arg(short, long, allow_negative_numbers = true)]
    pub(crate) map_index: Option<i32>,

    /// Mirror spawn positions between the players
    #[arg(long)]
    pub(crate) symmetric: bool,

    /// Rule version (0-3)
    #[arg(short, long, default_value_t = DEFAULT_RULES_VERSION)]
    pub(crate) rules: u8,
}

impl GameArgs {
    /// Settings from the config file, overridden by explicit flags.
    pub(crate) fn settings(&self) -> Result<MatchSettings, CliError> {
        let mut settings = match &self.config {
            Some(path) => MatchSettings::load(path)?,
            None => MatchSettings::random(),
        };
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        if let Some(map_index) = self.map_index {
            settings.map_index = map_index;
        }
        if self.symmetric {
            settings.symmetric = true;
        }
        Ok(settings)
    }

    /// Rules for the selected version.
    pub(crate) const fn ruleset(&self) -> Ruleset {
        Ruleset::for_version(self.rules)
    }
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<wondev::config::ConfigError> for CliError {
    fn from(e: wondev::config::ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<wondev::session::SessionError> for CliError {
    fn from(e: wondev::session::SessionError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<wondev::referee::AgentError> for CliError {
    fn from(e: wondev::referee::AgentError) -> Self {
        Self::new(format!("Failed to start player: {e}"))
    }
}

impl From<wondev::replay::ReplayError> for CliError {
    fn from(e: wondev::replay::ReplayError) -> Self {
        Self::new(e.to_string())
    }
}
