//! Path management for the bookkeeper
//!
//! ## Path Resolution Order
//!
//! 1. `BOOKKEEPER_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory joined with `bookkeeper`
//!    (`$XDG_CONFIG_HOME/bookkeeper` or `~/.config/bookkeeper` on Unix,
//!    `%APPDATA%\bookkeeper` on Windows)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::BookkeeperError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "BOOKKEEPER_DATA_DIR";

/// Manages all paths used by the bookkeeper
#[derive(Debug, Clone)]
pub struct BookkeeperPaths {
    /// Base directory for settings, audit log and tenant stores
    base_dir: PathBuf,
}

impl BookkeeperPaths {
    /// Resolve paths from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home/config directory can be determined.
    pub fn new() -> Result<Self, BookkeeperError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths with a custom base directory (CLI flag, tests)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding one store file per tenant
    pub fn tenants_dir(&self) -> PathBuf {
        self.base_dir.join("tenants")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Ensure the base and tenant directories exist
    ///
    /// Failure here is fatal for a session: without a writable tenant
    /// directory no store can be opened or created.
    pub fn ensure_directories(&self) -> Result<(), BookkeeperError> {
        std::fs::create_dir_all(&self.base_dir).map_err(|e| {
            BookkeeperError::Storage(format!(
                "Failed to create base directory {}: {}",
                self.base_dir.display(),
                e
            ))
        })?;

        let tenants = self.tenants_dir();
        std::fs::create_dir_all(&tenants).map_err(|e| {
            BookkeeperError::Storage(format!(
                "Failed to create tenant directory {}: {}",
                tenants.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Check if the bookkeeper has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, BookkeeperError> {
    let dirs = BaseDirs::new().ok_or_else(|| {
        BookkeeperError::Config("Could not determine the home directory".into())
    })?;
    Ok(dirs.config_dir().join("bookkeeper"))
}
