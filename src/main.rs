use clap::{Parser, Subcommand};
use std::path::PathBuf;

use recipebook::commands::{open_store, CategoryCommand, ConfigCommand, RecipeCommand};
use recipebook::{logging, CatalogService, Config};

#[derive(Parser)]
#[command(name = "recipebook")]
#[command(version)]
#[command(about = "Manage a catalog of recipes and categories", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage recipe categories
    Category(CategoryCommand),

    /// Manage recipes
    Recipe(RecipeCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    logging::init("recipebook=warn");

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.clone())?;

    match cli.command {
        Some(Commands::Category(cmd)) => {
            let catalog = CatalogService::new(open_store(&config).await?);
            cmd.run(&catalog).await?;
        }
        Some(Commands::Recipe(cmd)) => {
            let catalog = CatalogService::new(open_store(&config).await?);
            cmd.run(&catalog).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config, cli.config.as_deref())?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
