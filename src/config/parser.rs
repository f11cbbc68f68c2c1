use crate::config::types::{CrawlConfig, Settings};
use crate::config::validation::{validate_crawl_config, validate_settings};
use crate::ConfigError;
use std::path::Path;
use std::time::Duration;

/// Loads and parses a settings file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML settings file
///
/// # Returns
///
/// * `Ok(Settings)` - Successfully loaded and validated settings
/// * `Err(ConfigError)` - Failed to load, parse, or validate the settings
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use topic_crawler::config::load_settings;
///
/// let settings = load_settings(Path::new("crawl.toml")).unwrap();
/// println!("Namespace: {}", settings.index.namespace);
/// ```
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_settings(&content)
}

/// Parses settings from TOML text and validates them
pub fn parse_settings(content: &str) -> Result<Settings, ConfigError> {
    let settings: Settings = toml::from_str(content)?;
    validate_settings(&settings)?;
    Ok(settings)
}

impl Settings {
    /// Builds the validated crawl input from the `[crawl]` section
    ///
    /// Fails when the seed or topic is missing, or when any crawl invariant
    /// does not hold.
    pub fn crawl_config(&self) -> Result<CrawlConfig, ConfigError> {
        let seed = self
            .crawl
            .seed
            .clone()
            .ok_or_else(|| ConfigError::Validation("a seed URL is required".to_string()))?;
        let topic = self
            .crawl
            .topic
            .clone()
            .ok_or_else(|| ConfigError::Validation("a topic is required".to_string()))?;

        let config = CrawlConfig::new(seed, topic)
            .with_max_pages(self.crawl.max_pages)
            .with_same_domain_only(self.crawl.same_domain_only)
            .with_preview_chars(self.crawl.preview_chars)
            .with_time_limit(self.crawl.time_limit_secs.map(Duration::from_secs));

        validate_crawl_config(&config)?;
        Ok(config)
    }
}
