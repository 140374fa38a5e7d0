use crate::config::types::{
    Config, CrawlerConfig, OutputConfig, SearchConfig, TargetsConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_search_config(&config.search)?;
    validate_targets(&config.targets)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.requests_per_minute < 1 || config.requests_per_minute > 60_000 {
        return Err(ConfigError::Validation(format!(
            "requests_per_minute must be between 1 and 60000, got {}",
            config.requests_per_minute
        )));
    }

    if config.max_pages_per_domain < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages_per_domain must be >= 1, got {}",
            config.max_pages_per_domain
        )));
    }

    if config.robots_timeout_secs == 0 || config.page_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "robots_timeout_secs and page_timeout_secs must be > 0".to_string(),
        ));
    }

    if let Some(attempts) = config.max_page_attempts {
        if attempts < config.max_pages_per_domain {
            return Err(ConfigError::Validation(format!(
                "max_page_attempts ({}) cannot be lower than max_pages_per_domain ({})",
                attempts, config.max_pages_per_domain
            )));
        }
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    if !crate::email::is_valid_email(&config.contact_email) {
        return Err(ConfigError::Validation(format!(
            "Invalid contact_email: '{}'",
            config.contact_email
        )));
    }

    Ok(())
}

fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid search endpoint: {}", e)))?;
    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Search endpoint must be http(s), got '{}'",
            config.endpoint
        )));
    }

    if config.api_key_env.trim().is_empty() {
        return Err(ConfigError::Validation(
            "api_key_env cannot be empty".to_string(),
        ));
    }

    if config.max_results_per_query < 1 {
        return Err(ConfigError::Validation(
            "max_results_per_query must be >= 1".to_string(),
        ));
    }

    // Brave caps `count` at 20 per call
    if config.page_size < 1 || config.page_size > 20 {
        return Err(ConfigError::Validation(format!(
            "page_size must be between 1 and 20, got {}",
            config.page_size
        )));
    }

    Ok(())
}

fn validate_targets(targets: &TargetsConfig) -> Result<(), ConfigError> {
    if targets.locations.is_empty() {
        return Err(ConfigError::Validation(
            "targets.locations must list at least one location".to_string(),
        ));
    }

    if targets.industries.is_empty() {
        return Err(ConfigError::Validation(
            "targets.industries must list at least one industry".to_string(),
        ));
    }

    if let Some(blank) = targets
        .locations
        .iter()
        .chain(targets.industries.iter())
        .find(|entry| entry.trim().is_empty())
    {
        return Err(ConfigError::Validation(format!(
            "targets cannot contain blank entries, got '{}'",
            blank
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_per_minute_bounds() {
        let mut crawler = CrawlerConfig::default();
        assert!(validate_crawler_config(&crawler).is_ok());

        crawler.requests_per_minute = 0;
        assert!(validate_crawler_config(&crawler).is_err());

        crawler.requests_per_minute = 60_001;
        assert!(validate_crawler_config(&crawler).is_err());
    }

    #[test]
    fn test_attempt_cap_below_page_budget() {
        let crawler = CrawlerConfig {
            max_pages_per_domain: 5,
            max_page_attempts: Some(2),
            ..CrawlerConfig::default()
        };
        assert!(validate_crawler_config(&crawler).is_err());
    }

    #[test]
    fn test_page_size_limit() {
        let mut search = SearchConfig::default();
        assert!(validate_search_config(&search).is_ok());

        search.page_size = 21;
        assert!(validate_search_config(&search).is_err());
    }

    #[test]
    fn test_blank_target_rejected() {
        let targets = TargetsConfig {
            locations: vec!["Austin, TX".to_string()],
            industries: vec!["  ".to_string()],
        };
        assert!(validate_targets(&targets).is_err());
    }
}
