//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod prompt;
pub mod session;
pub mod tenant;

pub use audit::handle_audit_command;
pub use prompt::{ConsolePrompt, Prompt};
pub use session::handle_session;
pub use tenant::{handle_tenant_command, TenantCommands};
