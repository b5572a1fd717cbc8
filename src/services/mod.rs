//! Service layer for the bookkeeper
//!
//! The service layer provides business logic on top of a tenant store,
//! handling validation, initials generation, credentials and audit logging.

pub mod credential;
pub mod initials;
pub mod person;

pub use credential::{CredentialManager, CredentialSummary, MIN_PASSWORD_LEN};
pub use initials::InitialsGenerator;
pub use person::{CreatePersonInput, CreatedPerson, PersonService};
