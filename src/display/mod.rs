//! Display formatting for terminal output
//!
//! Formats persons, settings and tenant listings as tables.

pub mod person;
pub mod settings;
pub mod tenant;

pub use person::format_person_list;
pub use settings::format_settings;
pub use tenant::format_tenant_list;
