use clap::{Args, Subcommand};

use super::{confirm, truncate, OutputFormat};
use crate::models::{slugify, CategoryData};
use crate::services::CatalogService;

#[derive(Args)]
pub struct CategoryCommand {
    #[command(subcommand)]
    pub command: CategorySubcommand,
}

#[derive(Subcommand)]
pub enum CategorySubcommand {
    /// Create a new category
    Create {
        /// Category name
        name: String,

        /// URL slug (derived from the name when omitted)
        #[arg(long)]
        slug: Option<String>,

        /// Short description
        #[arg(long)]
        description: Option<String>,

        /// Image URL
        #[arg(long)]
        image: Option<String>,
    },

    /// List all categories
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a category and its recipes
    Show {
        /// Category ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete a category (its recipes are kept)
    Delete {
        /// Category ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl CategoryCommand {
    pub async fn run(&self, catalog: &CatalogService) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            CategorySubcommand::Create {
                name,
                slug,
                description,
                image,
            } => {
                let name = name.trim();
                if name.is_empty() {
                    return Err("Category name cannot be empty".into());
                }

                let slug = slug.clone().unwrap_or_else(|| slugify(name));
                let mut data = CategoryData::new(name, slug);
                if let Some(description) = description {
                    data = data.with_description(description);
                }
                if let Some(image) = image {
                    data = data.with_image(image);
                }

                let created = catalog.create_category(data).await?;
                println!("Created category {} ({})", created.data.name, created.id);
                Ok(())
            }

            CategorySubcommand::List { format } => {
                let categories = catalog.get_all_categories().await?;

                if categories.is_empty() {
                    println!("No categories found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&categories)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<20}  {:<30}  SLUG", "ID", "NAME");
                        println!("{}", "-".repeat(80));
                        for category in &categories {
                            println!(
                                "{:<20}  {:<30}  {}",
                                category.id,
                                truncate(&category.data.name, 30),
                                category.data.slug
                            );
                        }
                        println!("\nTotal: {} category(ies)", categories.len());
                    }
                }
                Ok(())
            }

            CategorySubcommand::Show { id, format } => {
                let Some(category) = catalog.get_category_by_id(id).await? else {
                    return Err(format!("Category not found: {}", id).into());
                };
                let recipes = catalog.get_recipes_by_category(id).await?;

                match format {
                    OutputFormat::Json => {
                        let body = serde_json::json!({
                            "category": category,
                            "recipes": recipes,
                        });
                        println!("{}", serde_json::to_string_pretty(&body)?);
                    }
                    OutputFormat::Text => {
                        print!("{}", category);
                        if recipes.is_empty() {
                            println!("\nNo recipes in this category");
                        } else {
                            println!("\nRecipes:");
                            for recipe in &recipes {
                                println!("  {}  {}", recipe.id, recipe.data.title);
                            }
                        }
                    }
                }
                Ok(())
            }

            CategorySubcommand::Delete { id, force } => {
                let Some(category) = catalog.get_category_by_id(id).await? else {
                    return Err(format!("Category not found: {}", id).into());
                };

                if !force && !confirm(&format!("Delete category '{}'?", category.data.name))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                catalog.delete_category(&category.id).await?;
                println!("Deleted category: {}", category.data.name);
                Ok(())
            }
        }
    }
}
