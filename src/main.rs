use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ascend::config::Config;
use ascend::ledger::Ledger;
use ascend::store::SqliteStore;

mod cli;

#[derive(Parser)]
#[command(name = "ascend")]
#[command(about = "Ascend - level up your life one habit at a time")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.ascend/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// User to act as (defaults to default_user from the config)
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter ~/.ascend/config.toml
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,

        /// Database file to store documents in
        #[arg(long)]
        database: Option<PathBuf>,
    },

    /// Create a new user with full life and level 1 everywhere
    Signup {
        /// User id
        id: String,

        /// Display name (defaults to the id)
        #[arg(long)]
        name: Option<String>,
    },

    /// Show coins, life and category levels
    Status,

    /// Manage and track habits
    #[command(subcommand)]
    Habit(cli::habit::HabitCommand),

    /// Start a new day: clear yesterday's completions, break stale streaks
    Day,

    /// Run the weekly reset if it is due
    Reset {
        /// Reset even if today is not the reset weekday
        #[arg(long)]
        force: bool,
    },

    /// Browse and buy moments
    #[command(subcommand)]
    Shop(cli::shop::ShopCommand),

    /// Manage friends
    #[command(subcommand)]
    Friend(cli::friend::FriendCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let Cli {
        config: config_path,
        user,
        command,
        ..
    } = cli;

    match command {
        Commands::Init { force, database } => {
            cli::init::init_command(config_path, user, database, force)?;
        }
        Commands::Signup { id, name } => {
            let (ledger, _) = open_ledger(config_path.as_deref(), None)?;
            cli::user::signup_command(&ledger, &id, name.as_deref()).await?;
        }
        Commands::Status => {
            let (ledger, user) = open_ledger(config_path.as_deref(), user)?;
            cli::user::status_command(&ledger, &user?).await?;
        }
        Commands::Habit(command) => {
            let (ledger, user) = open_ledger(config_path.as_deref(), user)?;
            cli::habit::habit_command(&ledger, &user?, command).await?;
        }
        Commands::Day => {
            let (ledger, user) = open_ledger(config_path.as_deref(), user)?;
            cli::habit::day_command(&ledger, &user?).await?;
        }
        Commands::Reset { force } => {
            let (ledger, user) = open_ledger(config_path.as_deref(), user)?;
            cli::user::reset_command(&ledger, &user?, force).await?;
        }
        Commands::Shop(command) => {
            let (ledger, user) = open_ledger(config_path.as_deref(), user)?;
            cli::shop::shop_command(&ledger, &user?, command).await?;
        }
        Commands::Friend(command) => {
            let (ledger, user) = open_ledger(config_path.as_deref(), user)?;
            cli::friend::friend_command(&ledger, &user?, command).await?;
        }
    }

    Ok(())
}

/// Load config, open the database and resolve the acting user
fn open_ledger(config_path: Option<&Path>, user: Option<String>) -> Result<(Ledger, Result<String>)> {
    let config = Config::load(config_path)?;
    let db_path = config.database_path();
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;
    let user = config.resolve_user(user);
    Ok((Ledger::new(Arc::new(store), config.ledger.clone()), user))
}
