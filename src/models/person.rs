//! Person model
//!
//! A person belongs to exactly one tenant store and owns exactly one
//! identifier ("initials") that is unique inside that store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use super::ids::PersonId;

/// Short lowercase login handle derived from a person's name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Initials(String);

impl Initials {
    /// Parse user input into initials
    ///
    /// Input is trimmed and lowercased; it must be non-empty and contain only
    /// alphanumeric characters.
    pub fn parse(input: &str) -> Result<Self, NameValidationError> {
        let normalized = input.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(NameValidationError::EmptyInitials);
        }
        if !normalized.chars().all(char::is_alphanumeric) {
            return Err(NameValidationError::InvalidInitials(normalized));
        }
        Ok(Self(normalized))
    }

    /// Get the initials as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Initials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for Initials {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Initials {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated name parts of a person
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    pub first_name: String,
    pub middle_names: Option<String>,
    pub last_name: String,
}

impl PersonName {
    /// Validate and normalize name parts
    ///
    /// Whitespace runs are collapsed. Extra words in the first name move to
    /// the front of the middle names, so "Tom Henry" / "Bombadil" becomes
    /// first name "Tom", middle names "Henry".
    pub fn new(
        first_name: &str,
        middle_names: Option<&str>,
        last_name: &str,
    ) -> Result<Self, NameValidationError> {
        let mut first_words = words(first_name);
        if first_words.is_empty() {
            return Err(NameValidationError::EmptyFirstName);
        }
        let first = first_words.remove(0);

        let last_words = words(last_name);
        if last_words.is_empty() {
            return Err(NameValidationError::EmptyLastName);
        }
        let last = last_words.join(" ");

        let mut middle = first_words;
        middle.extend(middle_names.map(words).unwrap_or_default());

        for word in std::iter::once(&first)
            .chain(middle.iter())
            .chain(last_words.iter())
        {
            if !is_name_word(word) {
                return Err(NameValidationError::InvalidCharacters(word.clone()));
            }
        }

        Ok(Self {
            first_name: first,
            middle_names: if middle.is_empty() {
                None
            } else {
                Some(middle.join(" "))
            },
            last_name: last,
        })
    }

    /// Case-insensitive comparison of all name parts
    pub fn same_as(&self, other: &PersonName) -> bool {
        fn eq(a: &str, b: &str) -> bool {
            a.to_lowercase() == b.to_lowercase()
        }

        eq(&self.first_name, &other.first_name)
            && eq(&self.last_name, &other.last_name)
            && match (&self.middle_names, &other.middle_names) {
                (None, None) => true,
                (Some(a), Some(b)) => eq(a, b),
                _ => false,
            }
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.middle_names {
            Some(middle) => write!(f, "{} {} {}", self.first_name, middle, self.last_name),
            None => write!(f, "{} {}", self.first_name, self.last_name),
        }
    }
}

fn words(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_string).collect()
}

fn is_name_word(word: &str) -> bool {
    word.chars().any(char::is_alphabetic)
        && word
            .chars()
            .all(|c| c.is_alphabetic() || c == '-' || c == '\'' || c == '.')
}

/// A person record in a tenant store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Surrogate key assigned by the store
    pub person_id: PersonId,

    /// Initials of whoever created the record (or the OS user for the first employee)
    pub created_by: String,

    /// When the person was created
    pub created_at: DateTime<Utc>,

    pub first_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_names: Option<String>,

    pub last_name: String,

    /// Unique within the store, never reassigned
    pub initials: Initials,
}

impl Person {
    /// Create a person record; the store assigns the real key on insert
    pub fn new(name: PersonName, initials: Initials, created_by: impl Into<String>) -> Self {
        Self {
            person_id: PersonId::new(0),
            created_by: created_by.into(),
            created_at: Utc::now(),
            first_name: name.first_name,
            middle_names: name.middle_names,
            last_name: name.last_name,
            initials,
        }
    }

    /// The validated name parts of this person
    pub fn name(&self) -> PersonName {
        PersonName {
            first_name: self.first_name.clone(),
            middle_names: self.middle_names.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.initials)
    }
}

/// Validation errors for names and initials
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    EmptyFirstName,
    EmptyLastName,
    InvalidCharacters(String),
    EmptyInitials,
    InvalidInitials(String),
}

impl fmt::Display for NameValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFirstName => write!(f, "First name cannot be empty"),
            Self::EmptyLastName => write!(f, "Last name cannot be empty"),
            Self::InvalidCharacters(word) => {
                write!(f, "Names must be alphabetic, got '{}'", word)
            }
            Self::EmptyInitials => write!(f, "Initials cannot be empty"),
            Self::InvalidInitials(s) => write!(f, "Initials must be alphanumeric, got '{}'", s),
        }
    }
}

impl std::error::Error for NameValidationError {}
