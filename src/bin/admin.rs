//! Recipebook Admin CLI
//!
//! Administration tool for user profiles.
//!
//! # Usage
//!
//! ```bash
//! recipebook-admin user create "Ana Lima" ana@example.com --gender f
//! recipebook-admin user list
//! recipebook-admin user delete Xq3k9TzB2mLw8PnR4vYc
//! recipebook-admin user export --output users.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RECIPEBOOK_DATABASE_PATH`: SQLite database file
//! - `RECIPEBOOK_EXPORT_DIR`: Directory CSV exports are written to
//! - `RUST_LOG`: Log filter (default: `recipebook=info`)

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use recipebook::commands::{open_store, UserCommand};
use recipebook::{logging, Config, UserService};

#[derive(Parser)]
#[command(name = "recipebook-admin")]
#[command(version)]
#[command(about = "Recipebook user administration tool")]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User(UserCommand),
}

#[tokio::main]
async fn main() {
    logging::init("recipebook=info");

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(cli.config)?;

    match cli.command {
        Commands::User(cmd) => {
            let users = UserService::new(open_store(&config).await?);
            cmd.run(&users, &config).await?;
        }
    }

    Ok(())
}
