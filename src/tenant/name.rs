//! Canonical tenant names
//!
//! A tenant is stored as `<company name>.db` with whitespace runs replaced by
//! underscores, e.g. "Acme  Corp" becomes `Acme_Corp.db`.

use std::fmt;

use crate::error::{BookkeeperError, BookkeeperResult};

/// File suffix of every tenant store
pub const STORE_SUFFIX: &str = ".db";

/// Canonical name of a tenant store, including the suffix
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TenantName(String);

impl TenantName {
    /// Wrap a file name found on disk without re-normalizing it
    pub(crate) fn from_file_name(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(STORE_SUFFIX)?;
        if stem.is_empty() {
            return None;
        }
        Some(Self(file_name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name without the suffix
    pub fn stem(&self) -> &str {
        self.0.strip_suffix(STORE_SUFFIX).unwrap_or(&self.0)
    }

    /// Human-readable company name, e.g. "Acme Corp"
    pub fn display_name(&self) -> String {
        self.stem().replace('_', " ")
    }
}

impl fmt::Display for TenantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TenantName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalize free-text company input into a store name
///
/// Idempotent: normalizing a canonical name returns it unchanged.
pub fn normalize(input: &str) -> BookkeeperResult<TenantName> {
    let trimmed = input.trim();
    let stem = trimmed.strip_suffix(STORE_SUFFIX).unwrap_or(trimmed);
    let stem = stem.split_whitespace().collect::<Vec<_>>().join("_");

    if stem.is_empty() {
        return Err(BookkeeperError::Validation(
            "Company name cannot be empty".into(),
        ));
    }

    if stem == "." || stem == ".." || stem.contains(['/', '\\']) || stem.chars().any(char::is_control)
    {
        return Err(BookkeeperError::Validation(format!(
            "Company name '{}' cannot be used as a store name",
            input.trim()
        )));
    }

    Ok(TenantName(format!("{}{}", stem, STORE_SUFFIX)))
}
