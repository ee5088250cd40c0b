use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use origin_walker::config::load_config;
///
/// let config = load_config(Path::new("walker.toml")).unwrap();
/// println!("Concurrency: {}", config.crawler.concurrency);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
max-depth = 3
concurrency = 10
dispatch-delay-ms = 50

[fetch]
user-agent = "TestCrawler/1.0"
timeout-ms = 8000
fallback-timeout-ms = 4000
max-redirects = 3

[output]
output-file = "site.json"
save-interval = 25
resume = true
queue-snapshot-limit = 10
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_depth, Some(3));
        assert_eq!(config.crawler.concurrency, 10);
        assert_eq!(config.crawler.dispatch_delay_ms, 50);
        assert_eq!(config.fetch.user_agent, "TestCrawler/1.0");
        assert_eq!(config.fetch.max_redirects, 3);
        assert_eq!(config.output.output_file, Path::new("site.json"));
        assert_eq!(config.output.save_interval, 25);
        assert!(config.output.resume);
        assert_eq!(config.output.queue_snapshot_limit, 10);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.crawler.max_depth, None);
        assert_eq!(config.crawler.concurrency, 5);
        assert_eq!(config.crawler.dispatch_delay_ms, 20);
        assert_eq!(config.fetch.timeout_ms, 10_000);
        assert_eq!(config.fetch.fallback_timeout_ms, 5_000);
        assert_eq!(config.fetch.max_redirects, 5);
        assert_eq!(config.output.output_file, Path::new("results.json"));
        assert_eq!(config.output.save_interval, 5);
        assert!(!config.output.resume);
        assert_eq!(config.output.queue_snapshot_limit, 100);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = parse_config("[crawler]\nconcurrency = 2\n").unwrap();
        assert_eq!(config.crawler.concurrency, 2);
        assert_eq!(config.crawler.dispatch_delay_ms, 20);
        assert_eq!(config.crawler.max_depth, None);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/walker.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\nconcurrency = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
