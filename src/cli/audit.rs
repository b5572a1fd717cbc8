//! Audit log CLI command

use crate::audit::AuditLogger;
use crate::config::BookkeeperPaths;
use crate::error::BookkeeperResult;

/// Print the most recent audit entries
pub fn handle_audit_command(
    paths: &BookkeeperPaths,
    limit: usize,
    tenant: Option<String>,
) -> BookkeeperResult<()> {
    let logger = AuditLogger::new(paths.audit_log());
    let mut entries = logger.read_all()?;

    if let Some(tenant) = tenant {
        let wanted = crate::tenant::normalize(&tenant)?;
        entries.retain(|e| e.tenant.as_deref() == Some(wanted.as_str()));
    }

    let start = entries.len().saturating_sub(limit);
    let entries = &entries[start..];

    if entries.is_empty() {
        println!("No audit entries found.");
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
