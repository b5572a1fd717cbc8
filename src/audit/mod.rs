//! Audit logging for the bookkeeper
//!
//! Records person and credential changes and login attempts in an
//! append-only log shared by all tenants of one installation.
//!
//! - `AuditEntry`: one log entry with timestamp, operation, entity and tenant.
//! - `AuditLogger`: appends entries to the log file as JSON lines.
//!
//! ```rust,ignore
//! use bookkeeper::audit::{AuditEntry, AuditLogger};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::login("pp", true).for_tenant("Acme_Corp.db"))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
