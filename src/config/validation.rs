use crate::config::types::{Config, CrawlerConfig, FetchConfig, OutputConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetch_config(&config.fetch)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates traversal configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    if config.dispatch_delay_ms > 10_000 {
        return Err(ConfigError::Validation(format!(
            "dispatch_delay_ms must be <= 10000ms, got {}ms",
            config.dispatch_delay_ms
        )));
    }

    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "timeout_ms must be >= 100ms, got {}ms",
            config.timeout_ms
        )));
    }

    if config.fallback_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "fallback_timeout_ms must be >= 100ms, got {}ms",
            config.fallback_timeout_ms
        )));
    }

    if config.fallback_timeout_ms > config.timeout_ms {
        return Err(ConfigError::Validation(format!(
            "fallback_timeout_ms ({}ms) cannot exceed timeout_ms ({}ms)",
            config.fallback_timeout_ms, config.timeout_ms
        )));
    }

    if config.max_redirects > 20 {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= 20, got {}",
            config.max_redirects
        )));
    }

    Ok(())
}

/// Validates checkpoint output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.output_file.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output_file cannot be empty".to_string(),
        ));
    }

    if config.save_interval < 1 {
        return Err(ConfigError::Validation(format!(
            "save_interval must be >= 1, got {}",
            config.save_interval
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_concurrency_bounds() {
        let mut config = Config::default();

        config.crawler.concurrency = 0;
        assert!(validate(&config).is_err());

        config.crawler.concurrency = 101;
        assert!(validate(&config).is_err());

        config.crawler.concurrency = 1;
        assert!(validate(&config).is_ok());

        config.crawler.concurrency = 100;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_fallback_timeout_not_longer_than_primary() {
        let mut config = Config::default();
        config.fetch.timeout_ms = 1_000;
        config.fetch.fallback_timeout_ms = 2_000;

        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_tiny_timeout_rejected() {
        let mut config = Config::default();
        config.fetch.timeout_ms = 10;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_user_agent_rejected() {
        let mut config = Config::default();
        config.fetch.user_agent = "   ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_max_redirects_bound() {
        let mut config = Config::default();
        config.fetch.max_redirects = 0;
        assert!(validate(&config).is_ok());

        config.fetch.max_redirects = 21;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_save_interval_zero_rejected() {
        let mut config = Config::default();
        config.output.save_interval = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_output_file_rejected() {
        let mut config = Config::default();
        config.output.output_file = PathBuf::new();
        assert!(validate(&config).is_err());
    }
}
