//! Tenant listing

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::tenant::TenantName;

#[derive(Tabled)]
struct TenantRow {
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Store")]
    store: String,
}

/// Format located tenant stores as a table
pub fn format_tenant_list(tenants: &[TenantName]) -> String {
    if tenants.is_empty() {
        return "No companies found.".to_string();
    }

    let rows: Vec<TenantRow> = tenants
        .iter()
        .map(|t| TenantRow {
            company: t.display_name(),
            store: t.to_string(),
        })
        .collect();
    Table::new(rows).with(Style::psql()).to_string()
}
