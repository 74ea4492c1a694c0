//! Match settings read from `key=value` property text.
//!
//! Recognised keys are `seed`, `mapIndex` and `symmetric`. Unknown keys are
//! ignored and malformed values fall back to their defaults, so any property
//! text yields a playable configuration.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Error type for loading settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The property file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// Settings that fully determine map generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSettings {
    /// Seed of the match RNG.
    pub seed: i64,
    /// Map to play; negative or out of range picks one at random.
    pub map_index: i32,
    /// Mirror spawn positions between the two players.
    pub symmetric: bool,
}

impl MatchSettings {
    /// Settings with a fresh random seed and a random map.
    #[must_use]
    pub fn random() -> Self {
        Self {
            seed: rand::random(),
            map_index: -1,
            symmetric: false,
        }
    }

    /// Settings with a fixed seed and a random map.
    #[must_use]
    pub const fn with_seed(seed: i64) -> Self {
        Self {
            seed,
            map_index: -1,
            symmetric: false,
        }
    }

    /// Parse property text.
    ///
    /// Lines are `key=value` or `key: value`; blank lines and lines starting
    /// with `#` or `!` are skipped. A missing or unparseable seed becomes a
    /// fresh random value.
    #[must_use]
    pub fn from_properties(text: &str) -> Self {
        let mut settings = Self::random();
        for (key, value) in text.lines().filter_map(property) {
            match key {
                "seed" => {
                    if let Ok(seed) = value.parse() {
                        settings.seed = seed;
                    }
                }
                "mapIndex" => settings.map_index = value.parse().unwrap_or(-1),
                "symmetric" => settings.symmetric = value.eq_ignore_ascii_case("true"),
                _ => {}
            }
        }
        settings
    }

    /// Read and parse a property file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_properties(&text))
    }

    /// Echo the settings back as property text.
    ///
    /// `symmetric` is only written when set.
    #[must_use]
    pub fn to_properties(&self) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "seed={}", self.seed);
        let _ = writeln!(text, "mapIndex={}", self.map_index);
        if self.symmetric {
            text.push_str("symmetric=true\n");
        }
        text
    }
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self::random()
    }
}

/// Split a property line into key and value.
fn property(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
        return None;
    }
    let split = line.find(['=', ':'])?;
    Some((line[..split].trim(), line[split + 1..].trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_properties() {
        let settings = MatchSettings::from_properties(
            "# comment\n! other comment\n\nseed = -12345\nmapIndex=2\nsymmetric: TRUE\nunknown=1\n",
        );
        assert_eq!(
            settings,
            MatchSettings {
                seed: -12345,
                map_index: 2,
                symmetric: true,
            }
        );
    }

    #[test]
    fn test_lenient_fallbacks() {
        let settings = MatchSettings::from_properties("seed=7\nmapIndex=two\nsymmetric=yes");
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.map_index, -1);
        assert!(!settings.symmetric);

        let settings = MatchSettings::from_properties("");
        assert_eq!(settings.map_index, -1);
        assert!(!settings.symmetric);
    }

    #[test]
    fn test_echo_round_trip() {
        let settings = MatchSettings {
            seed: 42,
            map_index: 1,
            symmetric: false,
        };
        let text = settings.to_properties();
        assert_eq!(text, "seed=42\nmapIndex=1\n");
        assert_eq!(MatchSettings::from_properties(&text), settings);

        let symmetric = MatchSettings {
            symmetric: true,
            ..settings
        };
        assert!(symmetric.to_properties().ends_with("symmetric=true\n"));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.properties");
        fs::write(&path, "seed=99\n").unwrap();
        assert_eq!(MatchSettings::load(&path).unwrap().seed, 99);
        assert!(MatchSettings::load(&dir.path().join("missing")).is_err());
    }
}
