use chrono::Utc;
use clap::{Args, Subcommand};
use std::path::PathBuf;

use super::{confirm, truncate, OutputFormat};
use crate::avatar::resolve_avatar;
use crate::config::Config;
use crate::export::export_csv;
use crate::models::{UserData, UserPatch};
use crate::services::UserService;

#[derive(Args)]
pub struct UserCommand {
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Subcommand)]
pub enum UserSubcommand {
    /// Add a new user
    Create {
        /// Display name
        name: String,

        /// Email address
        email: String,

        /// Date of birth, as free text
        #[arg(long)]
        dob: Option<String>,

        #[arg(long)]
        gender: Option<String>,

        /// Profile picture URL
        #[arg(long)]
        picture: Option<String>,
    },

    /// List all users
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a user
    Show {
        /// User ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Change some fields of a user
    Update {
        /// User ID
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        dob: Option<String>,

        #[arg(long)]
        gender: Option<String>,

        #[arg(long)]
        picture: Option<String>,
    },

    /// Move a user to the recycle bin
    Delete {
        /// User ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// List users in the recycle bin
    Trash {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Export all users to a CSV file
    Export {
        /// File name inside the export directory
        #[arg(long, short)]
        output: Option<String>,

        /// Export directory (overrides config)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Print the user's avatar URL, or a generated one if the picture does not load
    Avatar {
        /// User ID
        id: String,
    },
}

impl UserCommand {
    pub async fn run(
        &self,
        users: &UserService,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            UserSubcommand::Create {
                name,
                email,
                dob,
                gender,
                picture,
            } => {
                let mut data = UserData::new(name.trim(), email.trim()).with_timestamps(Utc::now());
                if let Some(dob) = dob {
                    data = data.with_dob(dob);
                }
                if let Some(gender) = gender {
                    data = data.with_gender(gender);
                }
                if let Some(picture) = picture {
                    data = data.with_picture(picture);
                }

                let user = users.create_user(data).await?;
                println!("Created user {} ({})", user.data.email, user.id);
                Ok(())
            }

            UserSubcommand::List { format } => {
                let all = users.get_all_users().await?;

                if all.is_empty() {
                    println!("No users found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&all)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<20}  {:<24}  EMAIL", "ID", "NAME");
                        println!("{}", "-".repeat(80));
                        for user in &all {
                            println!(
                                "{:<20}  {:<24}  {}",
                                user.id,
                                truncate(&user.data.name, 24),
                                user.data.email
                            );
                        }
                        println!("\nTotal: {} user(s)", all.len());
                    }
                }
                Ok(())
            }

            UserSubcommand::Show { id, format } => {
                let Some(user) = users.get_user_by_id(id).await? else {
                    return Err(format!("User not found: {}", id).into());
                };

                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&user)?),
                    OutputFormat::Text => print!("{}", user),
                }
                Ok(())
            }

            UserSubcommand::Update {
                id,
                name,
                email,
                dob,
                gender,
                picture,
            } => {
                let mut patch = UserPatch {
                    name: name.clone(),
                    email: email.clone(),
                    dob: dob.clone(),
                    gender: gender.clone(),
                    picture: picture.clone(),
                    updated_at: None,
                };
                if patch.is_empty() {
                    return Err("Nothing to update (pass at least one field)".into());
                }
                patch.updated_at = Some(Utc::now());

                let updated = users.update_user(id, patch).await?;
                println!("Updated user: {}", updated.id);
                Ok(())
            }

            UserSubcommand::Delete { id, force } => {
                let Some(user) = users.get_user_by_id(id).await? else {
                    return Err(format!("User not found: {}", id).into());
                };

                if !force && !confirm(&format!("Delete user '{}'?", user.data.email))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                users.delete_user(&user).await?;
                println!("Moved user to recycle bin: {}", user.data.email);
                Ok(())
            }

            UserSubcommand::Trash { format } => {
                let recycled = users.get_recycled_users().await?;

                if recycled.is_empty() {
                    println!("Recycle bin is empty");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&recycled)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<20}  {:<30}  DELETED", "ID", "EMAIL");
                        println!("{}", "-".repeat(80));
                        for entry in &recycled {
                            println!(
                                "{:<20}  {:<30}  {}",
                                entry.id,
                                truncate(&entry.data.user.email, 30),
                                entry.data.deleted_at.format("%Y-%m-%d %H:%M:%S")
                            );
                        }
                        println!("\nTotal: {} user(s)", recycled.len());
                    }
                }
                Ok(())
            }

            UserSubcommand::Export { output, dir } => {
                let all = users.get_all_users().await?;
                let dir = dir.as_ref().unwrap_or(&config.export_dir.value);

                match export_csv(&all, dir, output.as_deref())? {
                    Some(path) => println!("Exported {} user(s) to {}", all.len(), path.display()),
                    None => println!("No users to export"),
                }
                Ok(())
            }

            UserSubcommand::Avatar { id } => {
                let Some(user) = users.get_user_by_id(id).await? else {
                    return Err(format!("User not found: {}", id).into());
                };

                let client = reqwest::Client::new();
                let url =
                    resolve_avatar(&client, user.data.picture.as_deref(), &user.data.name).await;
                println!("{}", url);
                Ok(())
            }
        }
    }
}
