//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::calculate::MissingOpponent;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Highest round count accepted for a new tournament.
pub const MAX_ROUNDS: u32 = 99;

/// Defaults applied when creating and starting tournaments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentDefaults {
    /// Round count used when none is given
    #[serde(default = "default_rounds")]
    pub default_rounds: u32,

    /// Players required before the first round can start
    #[serde(default = "default_min_players")]
    pub min_players: usize,
}

fn default_rounds() -> u32 {
    5
}

fn default_min_players() -> usize {
    2
}

impl Default for TournamentDefaults {
    fn default() -> Self {
        Self {
            default_rounds: default_rounds(),
            min_players: default_min_players(),
        }
    }
}

/// Engine behaviour switches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub missing_opponent: MissingOpponent,
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub tournament: TournamentDefaults,

    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            tournament: TournamentDefaults::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rounds = self.tournament.default_rounds;
        if rounds == 0 || rounds > MAX_ROUNDS {
            return Err(ConfigError::ValidationError(format!(
                "default_rounds must be between 1 and {}",
                MAX_ROUNDS
            )));
        }

        if self.tournament.min_players < 2 {
            return Err(ConfigError::ValidationError(
                "min_players must be at least 2".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.tournament.default_rounds, 5);
        assert_eq!(config.tournament.min_players, 2);
        assert_eq!(config.engine.missing_opponent, MissingOpponent::CountZero);
    }

    #[test]
    fn test_config_validation_ok() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_rounds() {
        let mut config = AppConfig::default();
        config.tournament.default_rounds = 0;
        assert!(config.validate().is_err());

        config.tournament.default_rounds = MAX_ROUNDS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_min_players() {
        let mut config = AppConfig::default();
        config.tournament.min_players = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"debug\"\n\n[engine]\nmissing_opponent = \"reject\"").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.engine.missing_opponent, MissingOpponent::Reject);
        assert_eq!(config.tournament.default_rounds, 5);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data_dir, parsed.data_dir);
        assert_eq!(config.tournament.default_rounds, parsed.tournament.default_rounds);
    }
}
