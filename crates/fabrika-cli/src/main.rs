//! # fabrika CLI entry point
//!
//! Parses command-line arguments, sets up logging, and dispatches to the
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fabrika_cli::auth::{run_login, run_logout, run_whoami, LoginArgs};
use fabrika_cli::contacts::{run_contacts, ContactsArgs};
use fabrika_cli::factories::{run_factories, FactoriesArgs};
use fabrika_cli::reference::{run_activity_types, run_managers, ActivityTypesArgs, ManagersArgs};
use fabrika_cli::session_store::DEFAULT_SESSION_FILE;
use fabrika_cli::CliContext;

/// Command-line client for the fabrika business directory.
///
/// Lists, edits, creates and deletes factories, their contacts, managers
/// and activity types. Every change is saved immediately; a rejected change
/// is reported and the list is reloaded from the backend.
#[derive(Parser, Debug)]
#[command(name = "fabrika", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Backend base URL. Defaults to FABRIKA_API_URL, then http://localhost:8000.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Where the login session is kept.
    #[arg(long, global = true, env = "FABRIKA_SESSION_FILE", default_value = DEFAULT_SESSION_FILE)]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and store the session.
    Login(LoginArgs),

    /// Forget the stored session.
    Logout,

    /// Show who the stored session belongs to.
    Whoami,

    /// The factory grid and spreadsheet export.
    Factories(FactoriesArgs),

    /// Factory contacts (employees).
    #[command(alias = "employees")]
    Contacts(ContactsArgs),

    /// Manager accounts.
    Managers(ManagersArgs),

    /// Activity types.
    ActivityTypes(ActivityTypesArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("fabrika CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let ctx = match CliContext::new(cli.api_url.as_deref(), cli.session_file) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(2);
        }
    };
    tracing::debug!(api = %ctx.api.base_url, session = %ctx.store.path().display(), "resolved configuration");

    let result = match &cli.command {
        Commands::Login(args) => run_login(&ctx, args).await,
        Commands::Logout => run_logout(&ctx),
        Commands::Whoami => run_whoami(&ctx).await,
        Commands::Factories(args) => run_factories(&ctx, args).await,
        Commands::Contacts(args) => run_contacts(&ctx, args).await,
        Commands::Managers(args) => run_managers(&ctx, args).await,
        Commands::ActivityTypes(args) => run_activity_types(&ctx, args).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
