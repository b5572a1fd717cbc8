//! Storage initialization
//!
//! Handles first-run setup: directories and a settings file with defaults.

use crate::config::{paths::BookkeeperPaths, settings::Settings};
use crate::error::BookkeeperError;

/// Initialize storage for a fresh installation
///
/// Creates the base and tenant directories and writes `settings` unless a
/// settings file already exists. Returns whether settings were written.
pub fn initialize_storage(
    paths: &BookkeeperPaths,
    settings: &Settings,
) -> Result<bool, BookkeeperError> {
    paths.ensure_directories()?;

    if paths.settings_file().exists() {
        return Ok(false);
    }

    settings.save(paths)?;
    Ok(true)
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &BookkeeperPaths) -> bool {
    !paths.settings_file().exists() || !paths.tenants_dir().exists()
}
