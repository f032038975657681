//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Event booking service
#[derive(Parser, Debug)]
#[command(name = "booking-service")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Create demo accounts and sample events
    Seed(SeedArgs),
}

/// Arguments for the serve command. Unset flags fall back to the environment.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Arguments for the seed command
#[derive(Parser, Debug, Clone)]
pub struct SeedArgs {
    /// Email of the administrator account
    #[arg(long, env = "SEED_ADMIN_EMAIL", default_value = "admin@example.com")]
    pub admin_email: String,

    /// Email of the participant account
    #[arg(long, env = "SEED_PARTICIPANT_EMAIL", default_value = "participant@example.com")]
    pub participant_email: String,

    /// Password given to both accounts
    #[arg(long, env = "SEED_PASSWORD", default_value = "password123", hide_default_value = true)]
    pub password: String,
}

/// Migration actions
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}
