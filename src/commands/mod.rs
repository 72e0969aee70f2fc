use clap::ValueEnum;
use std::io::{self, Write};
use std::sync::Arc;

use crate::config::Config;
use crate::store::{init_db, DocumentStore, SqliteStore, StoreError};

mod category;
mod config_cmd;
mod recipe;
mod user;

pub use category::{CategoryCommand, CategorySubcommand};
pub use config_cmd::{ConfigCommand, ConfigSubcommand};
pub use recipe::{RecipeCommand, RecipeSubcommand};
pub use user::{UserCommand, UserSubcommand};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Open the document store at the configured database path.
pub async fn open_store(config: &Config) -> Result<Arc<dyn DocumentStore>, StoreError> {
    let pool = init_db(&config.database_path.value).await?;
    Ok(Arc::new(SqliteStore::new(pool)))
}

/// Ask a yes/no question on stdin. Anything but `y` is a no.
fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Shorten `text` to at most `width` characters for table output.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}
