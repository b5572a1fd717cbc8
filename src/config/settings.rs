//! User settings for the bookkeeper
//!
//! Manages tenant matching thresholds, retry bounds, credential defaults and
//! the default session language.

use serde::{Deserialize, Serialize};

use super::paths::BookkeeperPaths;
use crate::error::BookkeeperError;
use crate::models::Language;

/// Score thresholds for fuzzy tenant matching (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchThresholds {
    /// At or above this score a tenant is opened without asking
    pub high: u8,
    /// At or above this score (and below `high`) the user must confirm
    pub low: u8,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self { high: 80, low: 50 }
    }
}

impl MatchThresholds {
    /// Check that `low <= high <= 100`
    pub fn validate(&self) -> Result<(), BookkeeperError> {
        if self.high > 100 {
            return Err(BookkeeperError::Config(format!(
                "High match threshold must be at most 100, got {}",
                self.high
            )));
        }
        if self.low > self.high {
            return Err(BookkeeperError::Config(format!(
                "Low match threshold ({}) exceeds high threshold ({})",
                self.low, self.high
            )));
        }
        Ok(())
    }
}

/// User settings for the bookkeeper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Language used before anyone has logged in
    #[serde(default)]
    pub default_language: Language,

    /// Fuzzy tenant matching thresholds
    #[serde(default)]
    pub matching: MatchThresholds,

    /// How many company names may be entered before giving up
    #[serde(default = "default_max_company_attempts")]
    pub max_company_attempts: u32,

    /// Ask before creating a tenant that matched nothing
    #[serde(default = "default_true")]
    pub confirm_new_tenant: bool,

    /// Length of generated initial passwords
    #[serde(default = "default_initial_password_length")]
    pub initial_password_length: usize,
}

fn default_schema_version() -> u32 {
    1
}

fn default_max_company_attempts() -> u32 {
    3
}

fn default_true() -> bool {
    true
}

fn default_initial_password_length() -> usize {
    16
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_language: Language::default(),
            matching: MatchThresholds::default(),
            max_company_attempts: default_max_company_attempts(),
            confirm_new_tenant: default_true(),
            initial_password_length: default_initial_password_length(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &BookkeeperPaths) -> Result<Self, BookkeeperError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not persisted here; `init` decides when to write
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| BookkeeperError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            BookkeeperError::Config(format!("Failed to parse settings file: {}", e))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BookkeeperPaths) -> Result<(), BookkeeperError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BookkeeperError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BookkeeperError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Validate values that serde defaults cannot guard
    pub fn validate(&self) -> Result<(), BookkeeperError> {
        self.matching.validate()?;

        if self.max_company_attempts == 0 {
            return Err(BookkeeperError::Config(
                "max_company_attempts must be at least 1".into(),
            ));
        }

        if self.initial_password_length < 8 {
            return Err(BookkeeperError::Config(format!(
                "initial_password_length must be at least 8, got {}",
                self.initial_password_length
            )));
        }

        Ok(())
    }
}
