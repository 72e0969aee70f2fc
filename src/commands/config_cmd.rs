use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use super::OutputFormat;
use crate::config::{Config, ConfigValue};

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Write a config file with the current values
    Init {
        /// Overwrite an existing config file
        #[arg(long, short)]
        force: bool,
    },
}

impl ConfigCommand {
    /// `requested` is the `--config` path given on the command line, if any.
    pub fn run(
        &self,
        config: &Config,
        requested: Option<&Path>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        match &config.config_file {
                            Some(path) => println!("Config file: {}", path.display()),
                            None => println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            ),
                        }
                        println!();

                        print_path("database_path", &config.database_path);
                        println!();
                        print_path("export_dir", &config.export_dir);
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init { force } => {
                let path = requested
                    .map(Path::to_path_buf)
                    .unwrap_or_else(Config::default_config_path);

                if path.exists() && !force {
                    return Err(format!(
                        "Config file already exists: {} (use --force to overwrite)",
                        path.display()
                    )
                    .into());
                }

                config.save(&path)?;

                println!("Wrote config file: {}", path.display());
                Ok(())
            }
        }
    }
}

fn print_path(name: &str, value: &ConfigValue<PathBuf>) {
    println!("{}: {}", name, value.value.display());
    println!("  source: {}", value.source);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigSource;
    use tempfile::tempdir;

    fn init(force: bool) -> ConfigCommand {
        ConfigCommand {
            command: ConfigSubcommand::Init { force },
        }
    }

    #[test]
    fn test_init_writes_loadable_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        let database_path = temp_dir.path().join("my #1").join("db.sqlite");

        let mut config = Config::load(Some(config_path.clone())).unwrap();
        config.database_path = ConfigValue::new(database_path.clone(), ConfigSource::Default);

        init(false).run(&config, Some(config_path.as_path())).unwrap();

        let loaded = Config::load(Some(config_path)).unwrap();
        assert_eq!(loaded.database_path.value, database_path);
        assert_eq!(loaded.database_path.source, ConfigSource::File);
    }

    #[test]
    fn test_init_refuses_to_overwrite_without_force() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "export_dir: /keep\n").unwrap();

        let config = Config::load(Some(config_path.clone())).unwrap();
        let err = init(false).run(&config, Some(config_path.as_path())).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        init(true).run(&config, Some(config_path.as_path())).unwrap();
        let loaded = Config::load(Some(config_path)).unwrap();
        assert_eq!(loaded.export_dir.value, PathBuf::from("/keep"));
    }
}
