// ABOUTME: Configuration management for greshunkel
// ABOUTME: Handles loading configuration from YAML files and environment variable overrides

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::template::{ContextLimits, RenderOptions};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub limits: ContextLimits,

    #[serde(default)]
    pub render: RenderOptions,

    /// String variables added to every root context
    #[serde(default)]
    pub variables: HashMap<String, String>,

    #[serde(default = "default_builtin_filters")]
    pub builtin_filters: bool,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

fn default_builtin_filters() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limits: ContextLimits::default(),
            render: RenderOptions::default(),
            variables: HashMap::new(),
            builtin_filters: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::find_config_file(),
        };

        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            serde_yaml::from_str::<Config>(&contents)?
        } else {
            Config::default()
        };

        config.merge_env()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> PathBuf {
        let possible_paths = [
            PathBuf::from("greshunkel.yaml"),
            PathBuf::from("greshunkel.yml"),
            PathBuf::from(".greshunkel.yaml"),
            PathBuf::from(".greshunkel.yml"),
        ];

        // Check current directory
        for path in possible_paths {
            if path.exists() {
                return path;
            }
        }

        // Check home directory
        if let Some(home_dir) = dirs::home_dir() {
            let home_config = home_dir.join(".greshunkel").join("config.yaml");
            if home_config.exists() {
                return home_config;
            }
        }

        // Return default path (may not exist)
        PathBuf::from("greshunkel.yaml")
    }

    /// Merge environment variables into configuration
    fn merge_env(&mut self) -> Result<()> {
        if let Ok(level) = std::env::var("GRESHUNKEL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("GRESHUNKEL_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(len) = std::env::var("GRESHUNKEL_MAX_NAME_LEN") {
            self.limits.max_name_len = len.parse()?;
        }
        if let Ok(len) = std::env::var("GRESHUNKEL_MAX_VALUE_LEN") {
            self.limits.max_value_len = len.parse()?;
        }

        Ok(())
    }
}
