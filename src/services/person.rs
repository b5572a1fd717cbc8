//! Person service
//!
//! Creates persons with generated initials and a matching credential.

use crate::audit::{AuditEntry, EntityType};
use crate::crypto::SecureString;
use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::{Credential, Language, Person, PersonName};
use crate::storage::TenantStore;

use super::credential::CredentialManager;
use super::initials::InitialsGenerator;

/// Input for creating a person
#[derive(Debug, Clone)]
pub struct CreatePersonInput {
    pub name: PersonName,
    /// Employees are internal; external contacts cannot log in
    pub is_internal: bool,
    pub language: Language,
    /// Create even if a person with the same name exists
    pub allow_duplicate_name: bool,
}

/// A stored person with its credential
#[derive(Debug)]
pub struct CreatedPerson {
    pub person: Person,
    pub credential: Credential,
    /// Shown once to whoever created the person
    pub initial_password: SecureString,
}

/// Service for person management
pub struct PersonService<'a> {
    store: &'a TenantStore,
}

impl<'a> PersonService<'a> {
    /// Create a new person service
    pub fn new(store: &'a TenantStore) -> Self {
        Self { store }
    }

    /// Create a person and their credential
    ///
    /// Fails with `Duplicate` if someone with the same name exists, unless
    /// `allow_duplicate_name` is set. Initials of existing persons are never
    /// changed.
    pub fn create(
        &self,
        input: CreatePersonInput,
        created_by: &str,
        password_length: usize,
    ) -> BookkeeperResult<CreatedPerson> {
        if !input.allow_duplicate_name {
            if let Some(existing) = self.find_same_name(&input.name)? {
                return Err(BookkeeperError::Duplicate {
                    entity_type: "Person",
                    identifier: format!("{} ({})", existing.name(), existing.initials),
                });
            }
        }

        let taken = self
            .store
            .persons
            .get_all()?
            .into_iter()
            .map(|p| p.initials.to_string());
        let initials = InitialsGenerator::new(taken).generate(&input.name)?;

        let person = self
            .store
            .persons
            .insert(Person::new(input.name, initials, created_by))?;

        // Both rows are saved together or not kept at all
        let credentials = CredentialManager::new(self.store);
        let stored = credentials
            .issue(
                &person,
                input.is_internal,
                input.language,
                created_by,
                password_length,
            )
            .and_then(|issued| match self.store.save() {
                Ok(()) => Ok(issued),
                Err(e) => {
                    self.store.credentials.remove(issued.0.initials.as_str())?;
                    Err(e)
                }
            });
        let (credential, initial_password) = match stored {
            Ok(issued) => issued,
            Err(e) => {
                self.store.persons.remove(person.person_id)?;
                tracing::warn!(initials = %person.initials, error = %e, "person not stored");
                return Err(e);
            }
        };

        self.store.audit(AuditEntry::create(
            EntityType::Person,
            person.person_id.to_string(),
            Some(person.name().to_string()),
            &person,
        ))?;
        tracing::info!(person_id = %person.person_id, initials = %person.initials, "created person");
        credentials.audit_created(&person, &credential)?;

        Ok(CreatedPerson {
            person,
            credential,
            initial_password,
        })
    }

    /// First person with the same name, ignoring case
    pub fn find_same_name(&self, name: &PersonName) -> BookkeeperResult<Option<Person>> {
        Ok(self
            .store
            .persons
            .get_all()?
            .into_iter()
            .find(|p| p.name().same_as(name)))
    }

    /// Get a person by initials
    pub fn get_by_initials(&self, initials: &str) -> BookkeeperResult<Option<Person>> {
        let Ok(initials) = crate::models::Initials::parse(initials) else {
            return Ok(None);
        };
        self.store.persons.get_by_initials(&initials)
    }

    /// List all persons ordered by key
    pub fn list(&self) -> BookkeeperResult<Vec<Person>> {
        self.store.persons.get_all()
    }
}
