//! Core data models for the bookkeeper
//!
//! This module contains the records held in a tenant store: persons with
//! their unique initials, and the credentials (settings rows) bound to them.

pub mod credential;
pub mod ids;
pub mod language;
pub mod person;

pub use credential::Credential;
pub use ids::{PersonId, SettingsId};
pub use language::Language;
pub use person::{Initials, NameValidationError, Person, PersonName};
