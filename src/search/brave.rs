//! Brave Web Search client

use crate::config::SearchConfig;
use crate::crawler::RateLimiter;
use crate::search::{SearchError, SearchProvider, SearchResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Brave API response, reduced to the fields we read
#[derive(Debug, Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: Option<BraveWeb>,
}

#[derive(Debug, Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Debug, Deserialize)]
struct BraveResult {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    meta_url: Option<MetaUrl>,
}

#[derive(Debug, Deserialize)]
struct MetaUrl {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    scheme: Option<String>,
    #[serde(default)]
    netloc: Option<String>,
    #[serde(default)]
    path: Option<String>,
}

impl BraveResult {
    /// Direct URL, else `meta_url.url`, else rebuilt from the meta_url parts
    fn resolve_url(&self) -> Option<String> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.is_empty()) {
            return Some(url.to_string());
        }

        let meta = self.meta_url.as_ref()?;
        if let Some(url) = meta.url.as_deref().filter(|u| !u.is_empty()) {
            return Some(url.to_string());
        }

        match (meta.scheme.as_deref(), meta.netloc.as_deref()) {
            (Some(scheme), Some(netloc)) if !scheme.is_empty() && !netloc.is_empty() => {
                let path = match meta.path.as_deref() {
                    Some(p) if p.starts_with('/') => p.to_string(),
                    Some(p) if !p.is_empty() => format!("/{}", p),
                    _ => String::new(),
                };
                Some(format!("{}://{}{}", scheme, netloc, path))
            }
            _ => None,
        }
    }
}

/// Client for the Brave Web Search API
pub struct BraveSearch {
    client: Client,
    limiter: Arc<RateLimiter>,
    endpoint: Url,
    api_key: String,
    country: String,
    search_lang: String,
}

impl BraveSearch {
    /// Creates a client from the search configuration and an API key
    ///
    /// Calls share the crawler's rate limiter.
    pub fn new(
        client: Client,
        limiter: Arc<RateLimiter>,
        config: &SearchConfig,
        api_key: String,
    ) -> Result<Self, SearchError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| SearchError::Endpoint(format!("{}: {}", config.endpoint, e)))?;

        Ok(Self {
            client,
            limiter,
            endpoint,
            api_key,
            country: config.country.clone(),
            search_lang: config.search_lang.clone(),
        })
    }

    async fn request(
        &self,
        query: &str,
        count: u32,
        offset: u32,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let count = count.to_string();
        let offset = offset.to_string();

        let response = self
            .client
            .get(self.endpoint.clone())
            .timeout(SEARCH_TIMEOUT)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &self.api_key)
            .query(&[
                ("q", query),
                ("count", count.as_str()),
                ("offset", offset.as_str()),
                ("country", self.country.as_str()),
                ("search_lang", self.search_lang.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: BraveResponse = response.json().await?;

        let results = parsed
            .web
            .map(|web| web.results)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|r| {
                let url = r.resolve_url()?;
                Some(SearchResult {
                    url,
                    snippet: r.description,
                })
            })
            .collect();

        Ok(results)
    }
}

#[async_trait]
impl SearchProvider for BraveSearch {
    async fn search(
        &self,
        query: &str,
        count: u32,
        offset: u32,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::debug!("Searching '{}' (count {}, offset {})", query, count, offset);
        self.limiter
            .schedule(|| self.request(query, count, offset))
            .await
    }
}
