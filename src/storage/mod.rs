//! Storage layer for the bookkeeper
//!
//! Each tenant owns one store file in the tenant directory, named
//! `<canonical company name>.db`. The file holds a JSON document with the
//! `persons` and `settings` tables and their key counters. Every mutating
//! service call persists the whole document with an atomic write.

pub mod credentials;
pub mod file_io;
pub mod init;
pub mod persons;

pub use credentials::CredentialRepository;
pub use file_io::{read_json_required, write_json_atomic};
pub use init::initialize_storage;
pub use persons::PersonRepository;

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::audit::{AuditEntry, AuditLogger};
use crate::error::BookkeeperError;
use crate::models::{Credential, Person};
use crate::tenant::TenantName;

/// Current layout version of store documents
pub const STORE_SCHEMA_VERSION: u32 = 1;

/// On-disk layout of a tenant store
#[derive(Debug, Serialize, Deserialize)]
struct TenantDocument {
    schema_version: u32,
    next_person_id: u64,
    next_settings_id: u64,
    #[serde(default)]
    persons: Vec<Person>,
    #[serde(default)]
    settings: Vec<Credential>,
}

impl TenantDocument {
    fn empty() -> Self {
        Self {
            schema_version: STORE_SCHEMA_VERSION,
            next_person_id: 1,
            next_settings_id: 1,
            persons: Vec::new(),
            settings: Vec::new(),
        }
    }
}

/// Handle to one opened tenant store
///
/// Owned by the session root. Dropping the handle releases the store.
pub struct TenantStore {
    name: TenantName,
    path: PathBuf,
    pub persons: PersonRepository,
    pub credentials: CredentialRepository,
    audit: Option<AuditLogger>,
}

impl TenantStore {
    /// Open the store for `name` inside `dir`, creating it if absent
    ///
    /// Opening the same name twice yields handles to the same file.
    pub fn open(dir: &Path, name: &TenantName) -> Result<Self, BookkeeperError> {
        let path = dir.join(name.as_str());

        if !path.exists() {
            tracing::info!(tenant = %name, path = %path.display(), "creating tenant store");
            write_json_atomic(&path, &TenantDocument::empty())?;
        }

        let document: TenantDocument = read_json_required(&path)?;
        if document.schema_version > STORE_SCHEMA_VERSION {
            return Err(BookkeeperError::Storage(format!(
                "{} has schema version {}, newest supported is {}",
                path.display(),
                document.schema_version,
                STORE_SCHEMA_VERSION
            )));
        }

        let persons = PersonRepository::from_rows(document.persons, document.next_person_id)?;
        let credentials =
            CredentialRepository::from_rows(document.settings, document.next_settings_id)?;

        tracing::debug!(tenant = %name, "opened tenant store");

        Ok(Self {
            name: name.clone(),
            path,
            persons,
            credentials,
            audit: None,
        })
    }

    /// Record changes to this store in an audit log
    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Canonical name of the tenant
    pub fn name(&self) -> &TenantName {
        &self.name
    }

    /// Location of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the store has no persons yet (freshly created tenant)
    pub fn is_empty(&self) -> Result<bool, BookkeeperError> {
        Ok(self.persons.count()? == 0)
    }

    /// Persist both tables
    pub fn save(&self) -> Result<(), BookkeeperError> {
        let (persons, next_person_id) = self.persons.snapshot()?;
        let (settings, next_settings_id) = self.credentials.snapshot()?;

        let document = TenantDocument {
            schema_version: STORE_SCHEMA_VERSION,
            next_person_id,
            next_settings_id,
            persons,
            settings,
        };
        write_json_atomic(&self.path, &document)
    }

    /// Append an entry to the audit log, tagged with this tenant
    pub fn audit(&self, entry: AuditEntry) -> Result<(), BookkeeperError> {
        match &self.audit {
            Some(logger) => logger.log(&entry.for_tenant(self.name.as_str())),
            None => Ok(()),
        }
    }

    /// Persist and release the store
    pub fn close(self) -> Result<(), BookkeeperError> {
        self.save()
    }
}

impl Drop for TenantStore {
    fn drop(&mut self) {
        tracing::debug!(tenant = %self.name, "closed tenant store");
    }
}

impl std::fmt::Debug for TenantStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantStore")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, BookkeeperError> {
    lock.read()
        .map_err(|e| BookkeeperError::Storage(format!("Failed to acquire read lock: {}", e)))
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, BookkeeperError> {
    lock.write()
        .map_err(|e| BookkeeperError::Storage(format!("Failed to acquire write lock: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PasswordDigest;
    use crate::models::{Initials, Language, PersonName};
    use crate::tenant::normalize;
    use tempfile::TempDir;

    fn add_person(store: &TenantStore, first: &str, last: &str, initials: &str) -> Person {
        let person = Person::new(
            PersonName::new(first, None, last).unwrap(),
            Initials::parse(initials).unwrap(),
            "test",
        );
        store.persons.insert(person).unwrap()
    }

    #[test]
    fn test_open_creates_schema() {
        let temp_dir = TempDir::new().unwrap();
        let name = normalize("Acme Corp").unwrap();

        let store = TenantStore::open(temp_dir.path(), &name).unwrap();

        assert_eq!(store.path(), temp_dir.path().join("Acme_Corp.db"));
        assert!(store.path().exists());
        assert!(store.is_empty().unwrap());

        let raw: serde_json::Value = read_json_required(store.path()).unwrap();
        assert!(raw["persons"].as_array().unwrap().is_empty());
        assert!(raw["settings"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_open_twice_same_store() {
        let temp_dir = TempDir::new().unwrap();
        let name = normalize("Acme Corp").unwrap();

        {
            let store = TenantStore::open(temp_dir.path(), &name).unwrap();
            add_person(&store, "Jon", "Outsh", "jo");
            store.close().unwrap();
        }

        let again = TenantStore::open(temp_dir.path(), &name).unwrap();
        assert_eq!(again.persons.count().unwrap(), 1);
        let other = TenantStore::open(temp_dir.path(), &name).unwrap();
        assert_eq!(again.path(), other.path());
    }

    #[test]
    fn test_save_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let name = normalize("Acme Corp").unwrap();
        let store = TenantStore::open(temp_dir.path(), &name).unwrap();

        let person = add_person(&store, "Peter", "Pan", "pp");
        store
            .credentials
            .insert(Credential::new(
                person.person_id,
                person.initials.clone(),
                PasswordDigest::create("secret"),
                true,
                Language::De,
                "test",
            ))
            .unwrap();
        store.save().unwrap();
        drop(store);

        let reopened = TenantStore::open(temp_dir.path(), &name).unwrap();
        let credential = reopened.credentials.get("pp").unwrap().unwrap();
        assert!(credential.verify("secret"));
        assert_eq!(credential.language, Language::De);

        let next = add_person(&reopened, "Wendy", "Darling", "wd");
        assert_eq!(next.person_id.value(), 2);
    }

    #[test]
    fn test_newer_schema_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let name = normalize("Future").unwrap();
        let mut document = TenantDocument::empty();
        document.schema_version = STORE_SCHEMA_VERSION + 1;
        write_json_atomic(temp_dir.path().join(name.as_str()), &document).unwrap();

        let err = TenantStore::open(temp_dir.path(), &name).unwrap_err();
        assert!(matches!(err, BookkeeperError::Storage(_)));
    }
}
