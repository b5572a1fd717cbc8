//! Settings table of a tenant store
//!
//! One credential row per person, looked up by initials.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::crypto::PasswordDigest;
use crate::error::BookkeeperError;
use crate::models::{Credential, Initials, Language, SettingsId};

use super::{read_lock, write_lock};

#[derive(Debug, Default)]
struct CredentialTable {
    /// initials -> credential
    rows: BTreeMap<Initials, Credential>,
    next_id: u64,
}

/// Repository for the `settings` table
#[derive(Debug)]
pub struct CredentialRepository {
    table: RwLock<CredentialTable>,
}

impl CredentialRepository {
    /// Build the table from stored rows
    pub(super) fn from_rows(
        rows: Vec<Credential>,
        next_id: u64,
    ) -> Result<Self, BookkeeperError> {
        let mut table = CredentialTable {
            next_id,
            ..CredentialTable::default()
        };

        for credential in rows {
            table.next_id = table.next_id.max(credential.settings_id.value() + 1);
            let initials = credential.initials.clone();
            if table.rows.insert(initials.clone(), credential).is_some() {
                return Err(BookkeeperError::Storage(format!(
                    "Store contains two credentials for '{}'",
                    initials
                )));
            }
        }

        table.next_id = table.next_id.max(1);
        Ok(Self {
            table: RwLock::new(table),
        })
    }

    /// Rows ordered by key plus the next key, for persisting
    pub(super) fn snapshot(&self) -> Result<(Vec<Credential>, u64), BookkeeperError> {
        let table = read_lock(&self.table)?;
        let mut rows: Vec<_> = table.rows.values().cloned().collect();
        rows.sort_by_key(|c| c.settings_id);
        Ok((rows, table.next_id))
    }

    /// Insert a credential, assigning its key
    pub fn insert(&self, mut credential: Credential) -> Result<Credential, BookkeeperError> {
        let mut table = write_lock(&self.table)?;

        if table.rows.contains_key(&credential.initials)
            || table
                .rows
                .values()
                .any(|c| c.person_id == credential.person_id)
        {
            return Err(BookkeeperError::Duplicate {
                entity_type: "Credential",
                identifier: credential.initials.to_string(),
            });
        }

        credential.settings_id = SettingsId::new(table.next_id);
        table.next_id += 1;
        table
            .rows
            .insert(credential.initials.clone(), credential.clone());
        Ok(credential)
    }

    /// Get the credential for initials
    pub fn get(&self, initials: &str) -> Result<Option<Credential>, BookkeeperError> {
        let table = read_lock(&self.table)?;
        Ok(table.rows.get(initials).cloned())
    }

    /// Remove the credential for initials
    pub fn remove(&self, initials: &str) -> Result<Option<Credential>, BookkeeperError> {
        let mut table = write_lock(&self.table)?;
        Ok(table.rows.remove(initials))
    }

    /// Replace salt and digest of a credential as one value
    ///
    /// Returns the credential as it was before the change.
    pub fn replace_digest(
        &self,
        initials: &str,
        digest: PasswordDigest,
    ) -> Result<Credential, BookkeeperError> {
        let mut table = write_lock(&self.table)?;
        let credential = table
            .rows
            .get_mut(initials)
            .ok_or_else(|| BookkeeperError::credential_not_found(initials))?;

        let before = credential.clone();
        credential.replace_digest(digest);
        Ok(before)
    }

    /// Change the session language; returns the previous language
    pub fn set_language(
        &self,
        initials: &str,
        language: Language,
    ) -> Result<Language, BookkeeperError> {
        let mut table = write_lock(&self.table)?;
        let credential = table
            .rows
            .get_mut(initials)
            .ok_or_else(|| BookkeeperError::credential_not_found(initials))?;

        Ok(std::mem::replace(&mut credential.language, language))
    }

    /// Count credentials
    pub fn count(&self) -> Result<usize, BookkeeperError> {
        let table = read_lock(&self.table)?;
        Ok(table.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersonId;

    fn credential(person: u64, initials: &str, password: &str) -> Credential {
        Credential::new(
            PersonId::new(person),
            Initials::parse(initials).unwrap(),
            PasswordDigest::create(password),
            true,
            Language::En,
            "test",
        )
    }

    #[test]
    fn test_insert_and_get() {
        let repo = CredentialRepository::from_rows(Vec::new(), 1).unwrap();
        let stored = repo.insert(credential(1, "pp", "secret")).unwrap();

        assert_eq!(stored.settings_id, SettingsId::new(1));
        let found = repo.get("pp").unwrap().unwrap();
        assert!(found.verify("secret"));
        assert!(repo.get("xx").unwrap().is_none());
    }

    #[test]
    fn test_one_credential_per_person() {
        let repo = CredentialRepository::from_rows(Vec::new(), 1).unwrap();
        repo.insert(credential(1, "pp", "a")).unwrap();

        assert!(repo.insert(credential(1, "pep", "b")).is_err());
        assert!(repo.insert(credential(2, "pp", "b")).is_err());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_replace_digest() {
        let repo = CredentialRepository::from_rows(Vec::new(), 1).unwrap();
        repo.insert(credential(1, "pp", "old")).unwrap();

        let before = repo
            .replace_digest("pp", PasswordDigest::create("new"))
            .unwrap();
        assert!(before.verify("old"));

        let after = repo.get("pp").unwrap().unwrap();
        assert!(after.verify("new"));
        assert!(!after.verify("old"));
        assert_ne!(before.digest().salt(), after.digest().salt());
    }

    #[test]
    fn test_set_language() {
        let repo = CredentialRepository::from_rows(Vec::new(), 1).unwrap();
        repo.insert(credential(1, "pp", "a")).unwrap();

        let previous = repo.set_language("pp", Language::De).unwrap();
        assert_eq!(previous, Language::En);
        assert_eq!(repo.get("pp").unwrap().unwrap().language, Language::De);
        assert!(repo.set_language("xx", Language::De).unwrap_err().is_not_found());
    }
}
