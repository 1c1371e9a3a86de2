//! Configuration file loading for the coach CLI.
//!
//! Settings live in `coach.toml` in the current directory unless another path
//! is given. A missing file means defaults; command-line flags override
//! whatever the file says.

use std::path::{Path, PathBuf};

use chess_analysis::AnalysisConfig;
use chess_engine::{Difficulty, DifficultyProfile, EngineError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A custom opponent profile is out of range.
    #[error("Invalid opponent settings: {0}")]
    InvalidProfile(#[from] EngineError),
}

/// Opponent settings.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Default)]
pub struct OpponentConfig {
    /// Canonical strength level. Defaults to beginner.
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Custom profile replacing the level's canonical one.
    #[serde(default)]
    pub profile: Option<DifficultyProfile>,
}

impl OpponentConfig {
    /// The profile the opponent plays with.
    pub fn effective_profile(&self) -> DifficultyProfile {
        self.profile.unwrap_or_else(|| self.difficulty.profile())
    }
}

/// Top-level `coach.toml` contents.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CoachConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub opponent: OpponentConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            analysis: AnalysisConfig::default(),
            opponent: OpponentConfig::default(),
        }
    }
}

impl CoachConfig {
    /// Loads the configuration from `path`, or defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// [`ConfigError::ParseError`] if it is not valid TOML and
    /// [`ConfigError::InvalidProfile`] if a custom opponent profile is out of
    /// range.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parses and validates configuration text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        if let Some(profile) = &config.opponent.profile {
            profile.validate()?;
        }
        Ok(config)
    }

    /// Default configuration file location.
    pub fn default_path() -> PathBuf {
        PathBuf::from("coach.toml")
    }
}
