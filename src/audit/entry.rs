//! Audit entry data structures
//!
//! Defines operation and entity types and the entry format itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Entity was created
    Create,
    /// Entity was updated
    Update,
    /// A login was granted
    Login,
    /// A login was refused
    LoginRejected,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Login => write!(f, "LOGIN"),
            Operation::LoginRejected => write!(f, "LOGIN_REJECTED"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Tenant,
    Person,
    Credential,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Tenant => write!(f, "Tenant"),
            EntityType::Person => write!(f, "Person"),
            EntityType::Credential => write!(f, "Credential"),
        }
    }
}

/// A single audit log entry
///
/// Entries never carry passwords, salts or digests; callers pass redacted
/// views of credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Key or initials of the affected entity
    pub entity_id: String,

    /// Human-readable description of the entity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// Canonical name of the tenant the entity belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,

    /// JSON representation of the entity after a create
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Human-readable change summary for updates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn base(operation: Operation, entity_type: EntityType, entity_id: String) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name: None,
            tenant: None,
            after: None,
            diff_summary: None,
        }
    }

    /// Entry for a create operation
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            entity_name,
            after: serde_json::to_value(entity).ok(),
            ..Self::base(Operation::Create, entity_type, entity_id.into())
        }
    }

    /// Entry for an update operation
    pub fn update(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        diff_summary: impl Into<String>,
    ) -> Self {
        Self {
            entity_name,
            diff_summary: Some(diff_summary.into()),
            ..Self::base(Operation::Update, entity_type, entity_id.into())
        }
    }

    /// Entry for a login attempt
    ///
    /// Rejected attempts record what was typed as the identifier, so the
    /// entry does not reveal whether it exists.
    pub fn login(initials: impl Into<String>, granted: bool) -> Self {
        let operation = if granted {
            Operation::Login
        } else {
            Operation::LoginRejected
        };
        Self::base(operation, EntityType::Credential, initials.into())
    }

    /// Tag the entry with a tenant
    pub fn for_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(tenant) = &self.tenant {
            output.push_str(&format!(" @ {}", tenant));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::LoginRejected.to_string(), "LOGIN_REJECTED");
    }

    #[test]
    fn test_create_entry() {
        let entry = AuditEntry::create(
            EntityType::Person,
            "per-1",
            Some("Peter Pan".to_string()),
            &json!({"initials": "pp"}),
        );

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.entity_type, EntityType::Person);
        assert!(entry.after.is_some());
        assert!(entry.tenant.is_none());
    }

    #[test]
    fn test_login_entries() {
        assert_eq!(AuditEntry::login("pp", true).operation, Operation::Login);
        assert_eq!(
            AuditEntry::login("zz", false).operation,
            Operation::LoginRejected
        );
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::update(
            EntityType::Credential,
            "pp",
            None,
            "language: en -> de",
        )
        .for_tenant("Acme_Corp.db");

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("UPDATE"));
        assert!(formatted.contains("Credential"));
        assert!(formatted.contains("@ Acme_Corp.db"));
        assert!(formatted.contains("language: en -> de"));
    }

    #[test]
    fn test_serialization() {
        let entry = AuditEntry::login("pp", true).for_tenant("Acme_Corp.db");
        let json = serde_json::to_string(&entry).unwrap();
        let back: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.operation, Operation::Login);
        assert_eq!(back.tenant.as_deref(), Some("Acme_Corp.db"));
    }
}
