//! Credential settings display
//!
//! Shows the settings row of the logged-in person. Salt and digest are
//! never part of the output.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::services::CredentialSummary;

#[derive(Tabled)]
struct SettingRow {
    #[tabled(rename = "Setting")]
    key: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Format one person's settings as a key/value table
pub fn format_settings(summary: &CredentialSummary) -> String {
    let rows = vec![
        SettingRow {
            key: "Initials",
            value: summary.initials.clone(),
        },
        SettingRow {
            key: "Language",
            value: format!("{} ({})", summary.language.native_name(), summary.language.code()),
        },
        SettingRow {
            key: "Internal",
            value: if summary.is_internal { "yes" } else { "no" }.to_string(),
        },
        SettingRow {
            key: "Password change due",
            value: if summary.must_change_password { "yes" } else { "no" }.to_string(),
        },
    ];

    Table::new(rows).with(Style::psql()).to_string()
}
