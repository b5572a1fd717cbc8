//! Credential service
//!
//! Creates, verifies and rotates login credentials of one tenant. Secrets
//! never leave this module except as the one-time initial password.

use serde::Serialize;

use crate::audit::{AuditEntry, EntityType};
use crate::crypto::{generate_initial_password, PasswordDigest, SecureString};
use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::{Credential, Language, Person};
use crate::storage::TenantStore;

/// Shortest password accepted on change
pub const MIN_PASSWORD_LEN: usize = 8;

/// Credential fields that are safe to show or log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialSummary {
    pub initials: String,
    pub is_internal: bool,
    pub language: Language,
    pub must_change_password: bool,
}

impl From<&Credential> for CredentialSummary {
    fn from(credential: &Credential) -> Self {
        Self {
            initials: credential.initials.to_string(),
            is_internal: credential.is_internal,
            language: credential.language,
            must_change_password: credential.must_change_password,
        }
    }
}

/// Service for credential management
pub struct CredentialManager<'a> {
    store: &'a TenantStore,
}

impl<'a> CredentialManager<'a> {
    /// Create a new credential manager
    pub fn new(store: &'a TenantStore) -> Self {
        Self { store }
    }

    /// Create the credential for a freshly stored person
    ///
    /// The person gets a random initial password which must be changed on
    /// first login. It is returned once and never stored in clear.
    pub fn create(
        &self,
        person: &Person,
        is_internal: bool,
        language: Language,
        created_by: &str,
        password_length: usize,
    ) -> BookkeeperResult<(Credential, SecureString)> {
        let (credential, password) =
            self.issue(person, is_internal, language, created_by, password_length)?;
        if let Err(e) = self.store.save() {
            self.store.credentials.remove(credential.initials.as_str())?;
            return Err(e);
        }

        self.audit_created(person, &credential)?;
        Ok((credential, password))
    }

    /// Add the credential row without saving or auditing
    pub(crate) fn issue(
        &self,
        person: &Person,
        is_internal: bool,
        language: Language,
        created_by: &str,
        password_length: usize,
    ) -> BookkeeperResult<(Credential, SecureString)> {
        let password = generate_initial_password(password_length.max(MIN_PASSWORD_LEN));
        let credential = Credential::new(
            person.person_id,
            person.initials.clone(),
            PasswordDigest::create(&password),
            is_internal,
            language,
            created_by,
        );

        let credential = self.store.credentials.insert(credential)?;
        Ok((credential, password))
    }

    /// Record a saved credential in the audit log
    pub(crate) fn audit_created(
        &self,
        person: &Person,
        credential: &Credential,
    ) -> BookkeeperResult<()> {
        self.store.audit(AuditEntry::create(
            EntityType::Credential,
            credential.initials.to_string(),
            Some(person.name().to_string()),
            &CredentialSummary::from(credential),
        ))?;

        tracing::info!(
            initials = %credential.initials,
            is_internal = credential.is_internal,
            "created credential"
        );
        Ok(())
    }

    /// Check a password for initials
    ///
    /// Unknown initials verify as `false`.
    pub fn verify(&self, initials: &str, password: &str) -> BookkeeperResult<bool> {
        match self.store.credentials.get(initials)? {
            Some(credential) => Ok(credential.verify(password)),
            None => {
                // same key derivation cost as a real check
                let _ = PasswordDigest::with_salt(password, [0; crate::crypto::password::SALT_LEN]);
                Ok(false)
            }
        }
    }

    /// Whether initials belong to an internal relation
    ///
    /// Unknown initials are not internal.
    pub fn is_internal(&self, initials: &str) -> BookkeeperResult<bool> {
        Ok(self
            .store
            .credentials
            .get(initials)?
            .is_some_and(|c| c.is_internal))
    }

    /// Whether the password must be changed before anything else
    pub fn must_change_password(&self, initials: &str) -> BookkeeperResult<bool> {
        Ok(self
            .store
            .credentials
            .get(initials)?
            .is_some_and(|c| c.must_change_password))
    }

    /// Get the credential for initials
    pub fn get(&self, initials: &str) -> BookkeeperResult<Option<Credential>> {
        self.store.credentials.get(initials)
    }

    /// Replace a password after verifying the old one
    ///
    /// Salt and digest are regenerated together.
    pub fn update(&self, initials: &str, old: &str, new: &str) -> BookkeeperResult<()> {
        if !self.verify(initials, old)? {
            return Err(BookkeeperError::Credential(
                "Current password is incorrect".into(),
            ));
        }
        validate_new_password(new)?;

        self.store
            .credentials
            .replace_digest(initials, PasswordDigest::create(new))?;
        self.store.save()?;

        self.store.audit(AuditEntry::update(
            EntityType::Credential,
            initials,
            None,
            "password changed",
        ))?;

        tracing::info!(initials, "password changed");
        Ok(())
    }

    /// Change the session language
    pub fn set_language(&self, initials: &str, language: Language) -> BookkeeperResult<()> {
        let previous = self.store.credentials.set_language(initials, language)?;
        if previous == language {
            return Ok(());
        }
        self.store.save()?;

        self.store.audit(AuditEntry::update(
            EntityType::Credential,
            initials,
            None,
            format!("language: {} -> {}", previous.code(), language.code()),
        ))?;

        Ok(())
    }
}

/// Check a new password before it is hashed
pub fn validate_new_password(password: &str) -> BookkeeperResult<()> {
    if password.trim().is_empty() {
        return Err(BookkeeperError::Validation(
            "Password cannot be empty".into(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(BookkeeperError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
