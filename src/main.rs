use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bookkeeper::cli::{handle_audit_command, handle_session, handle_tenant_command, TenantCommands};
use bookkeeper::config::{paths::DATA_DIR_ENV, BookkeeperPaths, Settings};
use bookkeeper::storage::init::{initialize_storage, needs_initialization};

/// Environment variable holding the log filter
const LOG_ENV: &str = "BOOKKEEPER_LOG";

#[derive(Parser)]
#[command(
    name = "bookkeeper",
    version,
    about = "Terminal bookkeeping with one isolated datastore per company",
    long_about = "Bookkeeper keeps one isolated store per company. Pick a company \
                  by name (typos are tolerated), log in with your initials and \
                  password, and manage the persons of that company."
)]
struct Cli {
    /// Base directory for settings, audit log and company stores
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (default)
    #[command(alias = "login")]
    Session,

    /// List companies or test how a name would match
    #[command(alias = "tenant")]
    Tenants {
        #[command(subcommand)]
        cmd: Option<TenantCommands>,
    },

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Only entries of this company
        #[arg(short, long)]
        tenant: Option<String>,
    },

    /// Write default settings and create the company directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => BookkeeperPaths::with_base_dir(dir),
        None => BookkeeperPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;
    tracing::debug!(base_dir = %paths.base_dir().display(), "resolved paths");

    match cli.command {
        None | Some(Commands::Session) => {
            handle_session(&paths, settings)?;
        }
        Some(Commands::Tenants { cmd }) => {
            handle_tenant_command(&paths, &settings, cmd.unwrap_or(TenantCommands::List))?;
        }
        Some(Commands::Audit { limit, tenant }) => {
            handle_audit_command(&paths, limit, tenant)?;
        }
        Some(Commands::Init) => {
            println!("Initializing bookkeeper at: {}", paths.base_dir().display());
            if initialize_storage(&paths, &settings)? {
                println!("Default settings written to {}", paths.settings_file().display());
            } else {
                println!("Settings already exist; left unchanged.");
            }
            println!("Company stores live in {}", paths.tenants_dir().display());
            println!();
            println!("Run 'bookkeeper' to create or open a company.");
        }
        Some(Commands::Config) => {
            println!("Bookkeeper Configuration");
            println!("========================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!("Company directory: {}", paths.tenants_dir().display());
            println!("Settings file:     {}", paths.settings_file().display());
            println!("Audit log:         {}", paths.audit_log().display());
            if needs_initialization(&paths) {
                println!("(not initialized; run 'bookkeeper init')");
            }
            println!();
            println!("Settings:");
            println!("  Default language:      {}", settings.default_language.code());
            println!(
                "  Match thresholds:      accept >= {}, confirm >= {}",
                settings.matching.high, settings.matching.low
            );
            println!("  Company attempts:      {}", settings.max_company_attempts);
            println!("  Confirm new company:   {}", settings.confirm_new_tenant);
            println!("  Initial password size: {}", settings.initial_password_length);
        }
    }

    Ok(())
}
