use crate::config_manager::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AmicableError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Limit {limit} exceeds the supported maximum of {max}")]
    LimitTooLarge { limit: u64, max: u64 },
}

pub type Result<T> = std::result::Result<T, AmicableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        fn validate() -> Result<()> {
            Err(ConfigError::ValidationError("bad level".to_string()).into())
        }

        let err = validate().unwrap_err();
        assert!(matches!(err, AmicableError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid configuration: bad level"
        );
    }
}
