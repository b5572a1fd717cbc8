//! Person table of a tenant store
//!
//! Holds persons keyed by their surrogate id with a unique index on initials.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use crate::error::BookkeeperError;
use crate::models::{Initials, Person, PersonId};

use super::{read_lock, write_lock};

#[derive(Debug, Default)]
struct PersonTable {
    rows: BTreeMap<PersonId, Person>,
    /// Unique index: initials -> person_id
    by_initials: HashMap<Initials, PersonId>,
    next_id: u64,
}

/// Repository for the `persons` table
#[derive(Debug)]
pub struct PersonRepository {
    table: RwLock<PersonTable>,
}

impl PersonRepository {
    /// Build the table from stored rows
    ///
    /// Fails if the stored rows violate the unique initials constraint.
    pub(super) fn from_rows(rows: Vec<Person>, next_id: u64) -> Result<Self, BookkeeperError> {
        let mut table = PersonTable {
            next_id,
            ..PersonTable::default()
        };

        for person in rows {
            if table
                .by_initials
                .insert(person.initials.clone(), person.person_id)
                .is_some()
            {
                return Err(BookkeeperError::Storage(format!(
                    "Store contains duplicate initials '{}'",
                    person.initials
                )));
            }
            table.next_id = table.next_id.max(person.person_id.value() + 1);
            table.rows.insert(person.person_id, person);
        }

        table.next_id = table.next_id.max(1);
        Ok(Self {
            table: RwLock::new(table),
        })
    }

    /// Rows in key order plus the next key, for persisting
    pub(super) fn snapshot(&self) -> Result<(Vec<Person>, u64), BookkeeperError> {
        let table = read_lock(&self.table)?;
        Ok((table.rows.values().cloned().collect(), table.next_id))
    }

    /// Insert a new person, assigning its key
    ///
    /// Returns the stored person. Fails with `Duplicate` if the initials are taken.
    pub fn insert(&self, mut person: Person) -> Result<Person, BookkeeperError> {
        let mut table = write_lock(&self.table)?;

        if table.by_initials.contains_key(&person.initials) {
            return Err(BookkeeperError::Duplicate {
                entity_type: "Initials",
                identifier: person.initials.to_string(),
            });
        }

        person.person_id = PersonId::new(table.next_id);
        table.next_id += 1;

        table
            .by_initials
            .insert(person.initials.clone(), person.person_id);
        table.rows.insert(person.person_id, person.clone());
        Ok(person)
    }

    /// Remove a person and free their initials
    ///
    /// Keys are not handed out again.
    pub fn remove(&self, id: PersonId) -> Result<Option<Person>, BookkeeperError> {
        let mut table = write_lock(&self.table)?;
        let removed = table.rows.remove(&id);
        if let Some(person) = &removed {
            table.by_initials.remove(&person.initials);
        }
        Ok(removed)
    }

    /// Get a person by key
    pub fn get(&self, id: PersonId) -> Result<Option<Person>, BookkeeperError> {
        let table = read_lock(&self.table)?;
        Ok(table.rows.get(&id).cloned())
    }

    /// Get a person by initials
    pub fn get_by_initials(&self, initials: &Initials) -> Result<Option<Person>, BookkeeperError> {
        let table = read_lock(&self.table)?;
        Ok(table
            .by_initials
            .get(initials)
            .and_then(|id| table.rows.get(id))
            .cloned())
    }

    /// Get all persons ordered by key
    pub fn get_all(&self) -> Result<Vec<Person>, BookkeeperError> {
        let table = read_lock(&self.table)?;
        Ok(table.rows.values().cloned().collect())
    }

    /// Count persons
    pub fn count(&self) -> Result<usize, BookkeeperError> {
        let table = read_lock(&self.table)?;
        Ok(table.rows.len())
    }
}
