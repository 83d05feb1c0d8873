//! Configuration file support.
//!
//! Loads the workstation's settings from a TOML file; command-line flags are
//! applied on top by the binary.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::libs::error::Result;
use crate::libs::statement::DeleteMode;

pub const DEFAULT_CONFIG_FILE: &str = "breadgrid.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// sqlx connection URL of the SQLite database.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default)]
    pub delete_mode: DeleteMode,

    /// Shown above the tab bar.
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_database_url() -> String {
    "sqlite:bread_factory.db".to_string()
}

fn default_title() -> String {
    "АРМ Работника Хлебозавода".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            delete_mode: DeleteMode::default(),
            title: default_title(),
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// `breadgrid.toml` in the working directory if it exists, defaults otherwise.
    pub fn load_default() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.delete_mode, DeleteMode::FullRow);
    }

    #[test]
    fn reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "database_url = \"sqlite:/tmp/factory.db\"\ndelete_mode = \"by-id\""
        )
        .unwrap();
        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.database_url, "sqlite:/tmp/factory.db");
        assert_eq!(config.delete_mode, DeleteMode::ById);
        assert_eq!(config.title, "АРМ Работника Хлебозавода");
    }

    #[test]
    fn rejects_unknown_delete_mode() {
        let err = toml::from_str::<AppConfig>("delete_mode = \"random\"").unwrap_err();
        assert!(err.to_string().contains("delete_mode") || err.to_string().contains("variant"));
    }
}
