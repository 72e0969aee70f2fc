use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DATABASE_PATH_ENV: &str = "RECIPEBOOK_DATABASE_PATH";
pub const EXPORT_DIR_ENV: &str = "RECIPEBOOK_EXPORT_DIR";

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Path to the SQLite document database
    pub database_path: ConfigValue<PathBuf>,
    /// Directory CSV exports are written to
    pub export_dir: ConfigValue<PathBuf>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    database_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    export_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut database_path = ConfigValue::new(
            Self::default_data_dir().join("recipebook.db"),
            ConfigSource::Default,
        );
        let mut export_dir = ConfigValue::new(Self::default_export_dir(), ConfigSource::Default);
        let mut config_file = None;

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            if let Some(db_path) = file_config.database_path {
                database_path = ConfigValue::new(resolve(&path, db_path), ConfigSource::File);
            }
            if let Some(dir) = file_config.export_dir {
                export_dir = ConfigValue::new(resolve(&path, dir), ConfigSource::File);
            }
            config_file = Some(path);
        }

        if let Ok(db_path) = std::env::var(DATABASE_PATH_ENV) {
            database_path = ConfigValue::new(PathBuf::from(db_path), ConfigSource::Environment);
        }
        if let Ok(dir) = std::env::var(EXPORT_DIR_ENV) {
            export_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }

        Ok(Self {
            database_path,
            export_dir,
            config_file,
        })
    }

    /// Write the current values to a YAML config file at `path`.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let file = ConfigFile {
            database_path: Some(self.database_path.value.clone()),
            export_dir: Some(self.export_dir.value.clone()),
        };
        let yaml = serde_yaml::to_string(&file).map_err(ConfigError::SerializeError)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(path.to_path_buf(), e))?;
        }
        std::fs::write(path, format!("# recipebook configuration\n{}", yaml))
            .map_err(|e| ConfigError::WriteError(path.to_path_buf(), e))
    }

    /// Platform config dir + `recipebook/`
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recipebook")
    }

    /// Platform data dir + `recipebook/`
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recipebook")
    }

    /// Platform download dir, or the working directory when there is none
    pub fn default_export_dir() -> PathBuf {
        dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

/// Relative paths in the config file are relative to the file itself.
fn resolve(config_path: &Path, value: PathBuf) -> PathBuf {
    if value.is_relative() {
        config_path
            .parent()
            .map(|dir| dir.join(&value))
            .unwrap_or(value)
    } else {
        value
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    WriteError(PathBuf, std::io::Error),
    SerializeError(serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::WriteError(path, e) => {
                write!(f, "Failed to write config file '{}': {}", path.display(), e)
            }
            ConfigError::SerializeError(e) => write!(f, "Failed to serialize config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError(_, e) => Some(e),
            ConfigError::ParseError(_, e) => Some(e),
            ConfigError::WriteError(_, e) => Some(e),
            ConfigError::SerializeError(e) => Some(e),
        }
    }
}
