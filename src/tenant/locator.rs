//! Enumerate tenant stores in the tenant directory

use std::fs;
use std::path::Path;

use crate::error::{BookkeeperError, BookkeeperResult};

use super::name::TenantName;

/// List the tenant stores in `dir`, sorted by name
///
/// The scan is not recursive and only regular files ending in `.db` count.
/// A missing directory is created. Failing to create or read it is fatal.
pub fn locate(dir: &Path) -> BookkeeperResult<Vec<TenantName>> {
    fs::create_dir_all(dir).map_err(|e| {
        BookkeeperError::Storage(format!(
            "Tenant directory {} is not usable: {}",
            dir.display(),
            e
        ))
    })?;

    let entries = fs::read_dir(dir).map_err(|e| {
        BookkeeperError::Storage(format!(
            "Failed to read tenant directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            BookkeeperError::Storage(format!("Failed to read tenant directory entry: {}", e))
        })?;

        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }

        // Non-UTF-8 names cannot have been written by normalize
        let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };

        if let Some(name) = TenantName::from_file_name(&file_name) {
            names.push(name);
        }
    }

    names.sort();
    tracing::debug!(dir = %dir.display(), count = names.len(), "located tenant stores");
    Ok(names)
}
