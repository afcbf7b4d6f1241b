use crate::config::types::{Config, CrawlerConfig, HttpConfig};
use crate::{ConfigError, ConfigResult};

/// Largest accepted `max-depth`
pub const MAX_DEPTH_LIMIT: usize = 10;

/// Largest accepted `scraper-threads`
pub const MAX_SCRAPER_THREADS: usize = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.max_depth < 1 || config.max_depth > MAX_DEPTH_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max-depth must be between 1 and {}, got {}",
            MAX_DEPTH_LIMIT, config.max_depth
        )));
    }

    if config.scraper_threads < 1 || config.scraper_threads > MAX_SCRAPER_THREADS {
        return Err(ConfigError::Validation(format!(
            "scraper-threads must be between 1 and {}, got {}",
            MAX_SCRAPER_THREADS, config.scraper_threads
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> ConfigResult<()> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation("user-agent cannot be empty".to_string()));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation("timeout-secs must be >= 1".to_string()));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_depth_bounds() {
        let mut config = CrawlerConfig::default();

        config.max_depth = 0;
        assert!(validate_crawler_config(&config).is_err());
        config.max_depth = 1;
        assert!(validate_crawler_config(&config).is_ok());
        config.max_depth = MAX_DEPTH_LIMIT;
        assert!(validate_crawler_config(&config).is_ok());
        config.max_depth = MAX_DEPTH_LIMIT + 1;
        assert!(validate_crawler_config(&config).is_err());
    }

    #[test]
    fn test_thread_bounds() {
        let mut config = CrawlerConfig::default();

        config.scraper_threads = 0;
        assert!(matches!(
            validate_crawler_config(&config),
            Err(ConfigError::Validation(_))
        ));
        config.scraper_threads = MAX_SCRAPER_THREADS + 1;
        assert!(validate_crawler_config(&config).is_err());
    }

    #[test]
    fn test_http_config() {
        let mut config = HttpConfig::default();
        assert!(validate_http_config(&config).is_ok());

        config.user_agent = "   ".to_string();
        assert!(validate_http_config(&config).is_err());

        let config = HttpConfig {
            timeout_secs: 0,
            ..HttpConfig::default()
        };
        assert!(validate_http_config(&config).is_err());
    }
}
