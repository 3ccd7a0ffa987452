use crate::config::types::{
    ApiConfig, Config, CrawlerConfig, FilterCacheConfig, HistoryConfig, OutputConfig, OutputMode,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api(&config.api)?;
    validate_crawler(&config.crawler)?;
    validate_history(&config.history)?;
    validate_filter_cache(&config.filter_cache)?;
    validate_output(&config.output)?;
    Ok(())
}

/// Validates remote API configuration
fn validate_api(config: &ApiConfig) -> Result<(), ConfigError> {
    if config.base_url.is_empty() {
        return Err(ConfigError::Validation(
            "api.base-url cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid api.base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "api.base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.key.is_empty() {
        return Err(ConfigError::Validation(
            "api.key cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler configuration
pub fn validate_crawler(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_matches < 1 || config.max_matches > 100 {
        return Err(ConfigError::Validation(format!(
            "max-matches must be between 1 and 100, got {}",
            config.max_matches
        )));
    }
    Ok(())
}

/// Validates visited-history configuration
pub fn validate_history(config: &HistoryConfig) -> Result<(), ConfigError> {
    if config.retention_secs < 1 {
        return Err(ConfigError::Validation(
            "history.retention-secs must be >= 1".to_string(),
        ));
    }

    if config.capacity < 1 {
        return Err(ConfigError::Validation(
            "history.capacity must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates predicate cache configuration
fn validate_filter_cache(config: &FilterCacheConfig) -> Result<(), ConfigError> {
    if config.ttl_secs < 1 {
        return Err(ConfigError::Validation(
            "filter-cache.ttl-secs must be >= 1".to_string(),
        ));
    }

    if config.capacity < 1 {
        return Err(ConfigError::Validation(
            "filter-cache.capacity must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.mode == OutputMode::File {
        match &config.directory {
            Some(dir) if !dir.is_empty() => {}
            _ => {
                return Err(ConfigError::Validation(
                    "output.directory is required when output.mode is 'file'".to_string(),
                ));
            }
        }
    }
    Ok(())
}
