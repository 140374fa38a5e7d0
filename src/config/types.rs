use crate::ConfigError;
use serde::Deserialize;

/// Main configuration structure for Prospector
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub search: SearchConfig,
    pub targets: TargetsConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Global outbound request budget; spacing is ceil(60000 / rpm) ms
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,

    /// Successful page fetches allowed per seed domain
    #[serde(default = "default_max_pages_per_domain")]
    pub max_pages_per_domain: u32,

    #[serde(default = "default_robots_timeout_secs")]
    pub robots_timeout_secs: u64,

    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,

    /// Pause between two domain crawls (milliseconds)
    #[serde(default = "default_domain_pause_ms")]
    pub domain_pause_ms: u64,

    /// Cap on fetch attempts per domain, counting failures. Unset means no cap.
    #[serde(default)]
    pub max_page_attempts: Option<u32>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: default_requests_per_minute(),
            max_pages_per_domain: default_max_pages_per_domain(),
            robots_timeout_secs: default_robots_timeout_secs(),
            page_timeout_secs: default_page_timeout_secs(),
            domain_pause_ms: default_domain_pause_ms(),
            max_page_attempts: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version (+URL; email)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Search provider configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SearchConfig {
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    /// Name of the environment variable holding the provider API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_max_results_per_query")]
    pub max_results_per_query: u32,

    /// Results requested per provider call
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_country")]
    pub country: String,

    #[serde(default = "default_search_lang")]
    pub search_lang: String,

    /// Extra terms appended to every query
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            api_key_env: default_api_key_env(),
            max_results_per_query: default_max_results_per_query(),
            page_size: default_page_size(),
            country: default_country(),
            search_lang: default_search_lang(),
            keywords: Vec::new(),
        }
    }
}

impl SearchConfig {
    /// Reads the provider API key from the configured environment variable
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The non-empty key
    /// * `Err(ConfigError::MissingCredential)` - The variable is unset or blank
    pub fn api_key(&self) -> Result<String, ConfigError> {
        match std::env::var(&self.api_key_env) {
            Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            _ => Err(ConfigError::MissingCredential(self.api_key_env.clone())),
        }
    }
}

/// Which markets to search
#[derive(Debug, Clone, Deserialize)]
pub struct TargetsConfig {
    /// Locations in "City, ST" form
    pub locations: Vec<String>,

    pub industries: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_requests_per_minute() -> u32 {
    30
}

fn default_max_pages_per_domain() -> u32 {
    3
}

fn default_robots_timeout_secs() -> u64 {
    10
}

fn default_page_timeout_secs() -> u64 {
    15
}

fn default_domain_pause_ms() -> u64 {
    300
}

fn default_search_endpoint() -> String {
    "https://api.search.brave.com/res/v1/web/search".to_string()
}

fn default_api_key_env() -> String {
    "BRAVE_API_KEY".to_string()
}

fn default_max_results_per_query() -> u32 {
    15
}

fn default_page_size() -> u32 {
    20
}

fn default_country() -> String {
    "US".to_string()
}

fn default_search_lang() -> String {
    "en".to_string()
}
