//! Credential model (the `settings` table)
//!
//! One credential per person: the salted password digest, whether the
//! person is an internal relation allowed to log in, and the preferred
//! session language.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{PersonId, SettingsId};
use super::language::Language;
use super::person::Initials;
use crate::crypto::PasswordDigest;

/// Login credential and session preferences of one person
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Surrogate key assigned by the store
    pub settings_id: SettingsId,

    /// Owning person
    pub person_id: PersonId,

    pub created_by: String,

    pub created_at: DateTime<Utc>,

    pub language: Language,

    /// Copy of the owner's initials, used as the lookup key
    pub initials: Initials,

    /// Only internal relations (employees) may authenticate
    pub is_internal: bool,

    /// Set for generated initial passwords, cleared by the first change
    #[serde(default)]
    pub must_change_password: bool,

    #[serde(flatten)]
    digest: PasswordDigest,

    /// When the password was last replaced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_changed_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Create a credential for a person
    pub fn new(
        person_id: PersonId,
        initials: Initials,
        digest: PasswordDigest,
        is_internal: bool,
        language: Language,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            settings_id: SettingsId::new(0),
            person_id,
            created_by: created_by.into(),
            created_at: Utc::now(),
            language,
            initials,
            is_internal,
            must_change_password: true,
            digest,
            password_changed_at: None,
        }
    }

    /// Check a candidate password against the stored digest
    pub fn verify(&self, candidate: &str) -> bool {
        self.digest.verify(candidate)
    }

    /// Replace salt and digest together
    pub fn replace_digest(&mut self, digest: PasswordDigest) {
        self.digest = digest;
        self.must_change_password = false;
        self.password_changed_at = Some(Utc::now());
    }

    pub fn digest(&self) -> &PasswordDigest {
        &self.digest
    }
}
