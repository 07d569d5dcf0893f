use crate::error::{AmicableError, Result as AmicableResult};
use crate::table::TableStrategy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Limit used when nothing else is configured.
pub const DEFAULT_LIMIT: u64 = 1_000_000;

/// Largest limit accepted; the dense tables for it already take ~1 GiB.
pub const MAX_LIMIT: u64 = 100_000_000;

const LOCAL_CONFIG_FILE: &str = ".amicable.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration for the explorer
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AmicableConfig {
    /// Search range and table construction
    #[serde(default)]
    pub search: SearchConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Upper bound (inclusive) for chain members
    #[serde(default = "default_limit")]
    pub limit: u64,

    /// How the divisor-sum table is populated
    #[serde(default)]
    pub table_strategy: TableStrategy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            table_strategy: TableStrategy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: pretty or compact
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}
fn default_log_level() -> String {
    "warn".to_string()
} // stdout carries the answer; keep stderr quiet
fn default_log_format() -> String {
    "pretty".to_string()
}

/// Rejects limits the dense tables cannot be sized for.
pub fn check_limit(limit: u64) -> AmicableResult<u64> {
    if limit > MAX_LIMIT {
        return Err(AmicableError::LimitTooLarge {
            limit,
            max: MAX_LIMIT,
        });
    }
    Ok(limit)
}

/// Configuration manager with file discovery and env overrides
pub struct ConfigManager {
    config: AmicableConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with the following precedence:
    /// 1. Environment variables (.env file)
    /// 2. Config file (.amicable.toml)
    /// 3. Defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_dotenv();

        let (config, config_path) = Self::load_config_file()?;
        let config = Self::apply_env_overrides(config);
        Self::validate_config(&config)?;

        match config_path {
            Some(ref path) => info!("Config file: {}", path.display()),
            None => info!("Config file: NONE (using defaults)"),
        }
        info!(
            limit = config.search.limit,
            strategy = config.search.table_strategy.as_str(),
            "configuration loaded"
        );

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Load a specific config file, still honouring env overrides.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::apply_env_overrides(Self::read_toml_file(path)?);
        Self::validate_config(&config)?;
        Ok(Self {
            config,
            config_path: Some(path.to_path_buf()),
        })
    }

    fn load_dotenv() {
        if Path::new(".env").exists() {
            if let Err(e) = dotenv::from_filename(".env") {
                warn!("Failed to load .env file: {}", e);
            }
            return;
        }

        if let Some(home) = dirs::home_dir() {
            let home_env = home.join(".amicable.env");
            if home_env.exists() {
                if let Err(e) = dotenv::from_path(&home_env) {
                    warn!("Failed to load .amicable.env: {}", e);
                }
            }
        }
    }

    /// Search order:
    /// 1. ./.amicable.toml
    /// 2. ~/.amicable/config.toml
    /// 3. defaults
    fn load_config_file() -> Result<(AmicableConfig, Option<PathBuf>), ConfigError> {
        let local_config = Path::new(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            let config = Self::read_toml_file(local_config)?;
            return Ok((config, Some(local_config.to_path_buf())));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".amicable").join("config.toml");
            if user_config.exists() {
                let config = Self::read_toml_file(&user_config)?;
                return Ok((config, Some(user_config)));
            }
        }

        Ok((AmicableConfig::default(), None))
    }

    fn read_toml_file(path: &Path) -> Result<AmicableConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
    }

    fn apply_env_overrides(config: AmicableConfig) -> AmicableConfig {
        Self::apply_overrides_from(config, |key| std::env::var(key).ok())
    }

    fn apply_overrides_from<F>(mut config: AmicableConfig, lookup: F) -> AmicableConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(limit) = lookup("AMICABLE_LIMIT") {
            match limit.trim().replace('_', "").parse() {
                Ok(value) => config.search.limit = value,
                Err(_) => warn!("Ignoring unparsable AMICABLE_LIMIT: {}", limit),
            }
        }
        if let Some(strategy) = lookup("AMICABLE_TABLE_STRATEGY") {
            match strategy.to_lowercase().as_str() {
                "sequential" => config.search.table_strategy = TableStrategy::Sequential,
                "parallel" => config.search.table_strategy = TableStrategy::Parallel,
                other => warn!("Ignoring unknown AMICABLE_TABLE_STRATEGY: {}", other),
            }
        }

        // Logging
        if let Some(level) = lookup("AMICABLE_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(format) = lookup("AMICABLE_LOG_FORMAT") {
            config.logging.format = format;
        }

        config
    }

    fn validate_config(config: &AmicableConfig) -> Result<(), ConfigError> {
        if config.search.limit > MAX_LIMIT {
            return Err(ConfigError::ValidationError(format!(
                "Limit {} exceeds the supported maximum of {}",
                config.search.limit, MAX_LIMIT
            )));
        }

        match config.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    other
                )))
            }
        }

        match config.logging.format.as_str() {
            "pretty" | "compact" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {}. Must be one of: pretty, compact",
                    other
                )))
            }
        }

        Ok(())
    }

    pub fn config(&self) -> &AmicableConfig {
        &self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Create a default config file
    pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        let config = AmicableConfig::default();
        let toml_str =
            toml::to_string_pretty(&config).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::ReadError(e.to_string()))?;
        }

        std::fs::write(path, toml_str).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AmicableConfig::default();
        assert_eq!(config.search.limit, 1_000_000);
        assert_eq!(config.search.table_strategy, TableStrategy::Sequential);
        assert_eq!(config.logging.level, "warn");
        assert!(ConfigManager::validate_config(&config).is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = AmicableConfig::default();

        let mut bad_level = config.clone();
        bad_level.logging.level = "loud".to_string();
        assert!(ConfigManager::validate_config(&bad_level).is_err());

        let mut bad_format = config.clone();
        bad_format.logging.format = "xml".to_string();
        assert!(ConfigManager::validate_config(&bad_format).is_err());

        let mut too_large = config;
        too_large.search.limit = MAX_LIMIT + 1;
        assert!(ConfigManager::validate_config(&too_large).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("AMICABLE_LIMIT", "10_000"),
            ("AMICABLE_TABLE_STRATEGY", "Parallel"),
            ("AMICABLE_LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .collect();

        let config = ConfigManager::apply_overrides_from(AmicableConfig::default(), |k| {
            vars.get(k).map(|v| v.to_string())
        });
        assert_eq!(config.search.limit, 10_000);
        assert_eq!(config.search.table_strategy, TableStrategy::Parallel);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let config = ConfigManager::apply_overrides_from(AmicableConfig::default(), |k| match k {
            "AMICABLE_LIMIT" => Some("lots".to_string()),
            "AMICABLE_TABLE_STRATEGY" => Some("gpu".to_string()),
            _ => None,
        });
        assert_eq!(config.search, SearchConfig::default());
    }

    #[test]
    fn test_check_limit() {
        assert_eq!(check_limit(1000).unwrap(), 1000);
        assert!(matches!(
            check_limit(MAX_LIMIT + 1),
            Err(AmicableError::LimitTooLarge { .. })
        ));
    }
}
