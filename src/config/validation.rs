use crate::config::types::{CrawlConfig, FetcherConfig, IndexConfig, OracleConfig, Settings};
use crate::url::normalize_url;
use crate::ConfigError;
use url::Url;

/// Validates the crawl input
///
/// The seed must be a non-empty absolute http(s) URL with a host, the topic
/// must be non-empty, and the page budget must be positive.
pub fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.seed_url.trim().is_empty() {
        return Err(ConfigError::Validation(
            "seed URL cannot be empty".to_string(),
        ));
    }

    normalize_url(&config.seed_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", config.seed_url, e))
    })?;

    if config.topic.trim().is_empty() {
        return Err(ConfigError::Validation("topic cannot be empty".to_string()));
    }

    if config.max_pages == 0 {
        return Err(ConfigError::Validation(
            "page budget must be greater than 0".to_string(),
        ));
    }

    if config.preview_chars == 0 {
        return Err(ConfigError::Validation(
            "preview_chars must be greater than 0".to_string(),
        ));
    }

    if config.time_limit.is_some_and(|limit| limit.is_zero()) {
        return Err(ConfigError::Validation(
            "time limit must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

impl CrawlConfig {
    /// Checks this config with [`validate_crawl_config`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_crawl_config(self)
    }
}

/// Validates everything in a settings file except the `[crawl]` section,
/// whose seed and topic may still come from the command line
pub fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    validate_fetcher_config(&settings.fetcher)?;
    validate_oracle_config(&settings.oracle)?;
    validate_index_config(&settings.index)?;
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    for (name, value) in [
        ("request_timeout_secs", config.request_timeout_secs),
        ("connect_timeout_secs", config.connect_timeout_secs),
        ("navigation_timeout_secs", config.navigation_timeout_secs),
    ] {
        if value == 0 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1, got 0",
                name
            )));
        }
    }

    Ok(())
}

/// Validates oracle configuration
fn validate_oracle_config(config: &OracleConfig) -> Result<(), ConfigError> {
    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation("model cannot be empty".to_string()));
    }

    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid oracle endpoint: {}", e)))?;
    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Oracle endpoint '{}' must use HTTP or HTTPS",
            config.endpoint
        )));
    }

    if !(0.0..=2.0).contains(&config.temperature) {
        return Err(ConfigError::Validation(format!(
            "temperature must be between 0 and 2, got {}",
            config.temperature
        )));
    }

    if config.api_key_env.trim().is_empty() {
        return Err(ConfigError::Validation(
            "api_key_env cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "oracle request_timeout_secs must be >= 1, got 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates index configuration
fn validate_index_config(config: &IndexConfig) -> Result<(), ConfigError> {
    if config.namespace.trim().is_empty() {
        return Err(ConfigError::Validation(
            "namespace cannot be empty".to_string(),
        ));
    }

    if config.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
