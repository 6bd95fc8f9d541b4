use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::planner::meal_plan::DEFAULT_SERVINGS;
use crate::planner::shopping_list::DEFAULT_LIST_NAME;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannerConfig {
    #[serde(default = "default_servings")]
    pub default_servings: u32,
    #[serde(default = "default_list_name")]
    pub shopping_list_name: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_servings: DEFAULT_SERVINGS,
            shopping_list_name: DEFAULT_LIST_NAME.to_string(),
        }
    }
}

fn default_servings() -> u32 {
    DEFAULT_SERVINGS
}

fn default_list_name() -> String {
    DEFAULT_LIST_NAME.to_string()
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    pub fn load_or_create() -> Result<Self, ConfigError> {
        Self::load_or_create_at(&Self::config_path())
    }

    pub fn load_or_create_at(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Wrote default config to {}", path.display());
            Ok(config)
        }
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("meal-planner")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                base_url: "http://localhost:8000".to_string(),
            },
            session: SessionConfig::default(),
            planner: PlannerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_points_at_local_backend() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://localhost:8000");
    }

    #[test]
    fn default_config_plans_two_servings() {
        let config = Config::default();
        assert_eq!(config.planner.default_servings, 2);
    }

    #[test]
    fn default_config_has_no_user() {
        let config = Config::default();
        assert_eq!(config.session.user_id, None);
    }

    #[test]
    fn parse_valid_toml_config() {
        let toml_content = r#"
            [backend]
            base_url = "https://recipes.example.com"

            [session]
            user_id = 12

            [planner]
            default_servings = 4
            shopping_list_name = "Groceries"
        "#;

        let config = Config::from_toml(toml_content).unwrap();

        assert_eq!(config.backend.base_url, "https://recipes.example.com");
        assert_eq!(config.session.user_id, Some(12));
        assert_eq!(config.planner.default_servings, 4);
        assert_eq!(config.planner.shopping_list_name, "Groceries");
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = Config::from_toml("[backend]\nbase_url = \"http://x\"\n").unwrap();

        assert_eq!(config.session, SessionConfig::default());
        assert_eq!(config.planner, PlannerConfig::default());
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let invalid_toml = "this is not valid toml";
        let result = Config::from_toml(invalid_toml);
        assert!(result.is_err());
    }

    #[test]
    fn load_or_create_writes_defaults_then_reads_them_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let created = Config::load_or_create_at(&path).unwrap();
        assert!(path.exists());

        let loaded = Config::load_or_create_at(&path).unwrap();
        assert_eq!(loaded, created);
    }

    #[test]
    fn saved_user_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.session.user_id = Some(5);

        config.save_to(&path).unwrap();
        let loaded = Config::load_or_create_at(&path).unwrap();

        assert_eq!(loaded.session.user_id, Some(5));
    }
}
