//! Tenant CLI commands
//!
//! Non-interactive views of the tenant directory.

use clap::Subcommand;

use crate::config::{BookkeeperPaths, Settings};
use crate::display::format_tenant_list;
use crate::error::BookkeeperResult;
use crate::tenant::{decide, locate, normalize, MatchDecision};

/// Tenant subcommands
#[derive(Subcommand)]
pub enum TenantCommands {
    /// List all companies
    List,
    /// Show which company a name would open, without opening it
    Match {
        /// Company name as it would be typed at the prompt
        name: String,
    },
}

/// Handle a tenant command
pub fn handle_tenant_command(
    paths: &BookkeeperPaths,
    settings: &Settings,
    cmd: TenantCommands,
) -> BookkeeperResult<()> {
    let located = locate(&paths.tenants_dir())?;

    match cmd {
        TenantCommands::List => {
            println!("{}", format_tenant_list(&located));
        }
        TenantCommands::Match { name } => {
            let requested = normalize(&name)?;
            println!("Store name: {}", requested);

            match decide(&requested, &located, &settings.matching) {
                MatchDecision::Exact(found) => {
                    println!("Exact match: {}", found.display_name());
                }
                MatchDecision::Accept { name, score } => {
                    println!("Opens {} (score {})", name.display_name(), score);
                }
                MatchDecision::Confirm { name, score } => {
                    println!(
                        "Asks to confirm {} (score {})",
                        name.display_name(),
                        score
                    );
                }
                MatchDecision::NoMatch { best: Some((name, score)) } => {
                    println!(
                        "No match; closest is {} (score {})",
                        name.display_name(),
                        score
                    );
                }
                MatchDecision::NoMatch { best: None } => {
                    println!("No match; no companies exist yet");
                }
            }
        }
    }

    Ok(())
}
