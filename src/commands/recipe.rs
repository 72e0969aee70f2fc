use clap::{Args, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use super::{confirm, truncate, OutputFormat};
use crate::models::RecipeData;
use crate::services::CatalogService;

#[derive(Args)]
pub struct RecipeCommand {
    #[command(subcommand)]
    pub command: RecipeSubcommand,
}

#[derive(Subcommand)]
pub enum RecipeSubcommand {
    /// Create a recipe from a JSON file
    Create {
        /// JSON file with the recipe fields (camelCase keys)
        #[arg(long, short)]
        file: PathBuf,
    },

    /// List recipes
    List {
        /// Only recipes in this category
        #[arg(long, short)]
        category: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show recipe details
    Show {
        /// Recipe ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Replace a recipe's fields from a JSON file
    Update {
        /// Recipe ID
        id: String,

        /// JSON file with the recipe fields (camelCase keys)
        #[arg(long, short)]
        file: PathBuf,
    },

    /// Delete a recipe
    Delete {
        /// Recipe ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl RecipeCommand {
    pub async fn run(&self, catalog: &CatalogService) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            RecipeSubcommand::Create { file } => {
                let data = read_recipe(file)?;
                if let Some(category_id) = &data.category_id {
                    if catalog.get_category_by_id(category_id).await?.is_none() {
                        return Err(format!("Category not found: {}", category_id).into());
                    }
                }

                let created = catalog.create_recipe(data).await?;
                println!("Created recipe {} ({})", created.data.title, created.id);
                Ok(())
            }

            RecipeSubcommand::List { category, format } => {
                let recipes = match category {
                    Some(category_id) => catalog.get_recipes_by_category(category_id).await?,
                    None => catalog.get_all_recipes().await?,
                };

                if recipes.is_empty() {
                    println!("No recipes found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&recipes)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<20}  {:<36}  {:>8}  TIME", "ID", "TITLE", "SERVINGS");
                        println!("{}", "-".repeat(80));
                        for recipe in &recipes {
                            println!(
                                "{:<20}  {:<36}  {:>8}  {} min",
                                recipe.id,
                                truncate(&recipe.data.title, 36),
                                recipe.data.servings,
                                recipe.data.total_time_minutes
                            );
                        }
                        println!("\nTotal: {} recipe(s)", recipes.len());
                    }
                }
                Ok(())
            }

            RecipeSubcommand::Show { id, format } => {
                let Some(recipe) = catalog.get_recipe_by_id(id).await? else {
                    return Err(format!("Recipe not found: {}", id).into());
                };

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&recipe)?);
                    }
                    OutputFormat::Text => {
                        print!("{}", recipe);
                    }
                }
                Ok(())
            }

            RecipeSubcommand::Update { id, file } => {
                let data = read_recipe(file)?;
                if catalog.get_recipe_by_id(id).await?.is_none() {
                    return Err(format!("Recipe not found: {}", id).into());
                }

                let updated = catalog.update_recipe(id, data).await?;
                println!("Updated recipe: {}", updated.data.title);
                Ok(())
            }

            RecipeSubcommand::Delete { id, force } => {
                let Some(recipe) = catalog.get_recipe_by_id(id).await? else {
                    return Err(format!("Recipe not found: {}", id).into());
                };

                if !force && !confirm(&format!("Delete recipe '{}'?", recipe.data.title))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                catalog.delete_recipe(&recipe.id).await?;
                println!("Deleted recipe: {}", recipe.data.title);
                Ok(())
            }
        }
    }
}

fn read_recipe(path: &Path) -> Result<RecipeData, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let data: RecipeData = serde_json::from_str(&contents)
        .map_err(|e| format!("Invalid recipe in {}: {}", path.display(), e))?;

    if data.title.trim().is_empty() {
        return Err("Recipe title cannot be empty".into());
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_recipe_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("soup.json");
        fs::write(
            &path,
            r#"{
                "title": "Tomato Soup",
                "categoryId": "c1",
                "servings": 4,
                "prepTimeMinutes": 10,
                "cookTimeMinutes": 30,
                "totalTimeMinutes": 40,
                "ingredients": [
                    {"section": "Soup", "items": [{"name": "tomato", "amount": "6", "unit": ""}]}
                ]
            }"#,
        )
        .unwrap();

        let data = read_recipe(&path).unwrap();
        assert_eq!(data.title, "Tomato Soup");
        assert_eq!(data.category_id.as_deref(), Some("c1"));
        assert_eq!(data.ingredients[0].items[0].amount, "6");
    }

    #[test]
    fn test_read_recipe_rejects_blank_title() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("blank.json");
        fs::write(
            &path,
            r#"{"title": " ", "servings": 1, "prepTimeMinutes": 0,
                "cookTimeMinutes": 0, "totalTimeMinutes": 0}"#,
        )
        .unwrap();

        let err = read_recipe(&path).unwrap_err();
        assert!(err.to_string().contains("title cannot be empty"));
    }

    #[test]
    fn test_read_recipe_reports_missing_file() {
        let temp_dir = tempdir().unwrap();
        let err = read_recipe(&temp_dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
