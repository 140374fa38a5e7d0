//! Search query driver
//!
//! Builds one query per (location, industry) pair, collects result URLs
//! page by page, and crawls each result domain once per query.

use crate::config::Config;
use crate::crawler::{CrawlTask, DomainCrawler};
use crate::search::SearchProvider;
use crate::url::{extract_domain, normalize_url};
use std::collections::HashSet;
use std::time::Duration;

/// Totals for a whole search-and-crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub queries_run: u32,
    pub results_seen: u32,
    pub domains_crawled: u32,
    /// Crawls that ended with a task-level error
    pub domains_failed: u32,
    pub pages_fetched: u32,
    pub prospects_inserted: u32,
}

/// Drives the search provider and feeds the crawler
pub struct SearchDriver<'a> {
    provider: &'a dyn SearchProvider,
    crawler: &'a DomainCrawler,
    locations: Vec<String>,
    industries: Vec<String>,
    keywords: Vec<String>,
    max_results_per_query: u32,
    page_size: u32,
    max_pages_per_domain: u32,
    domain_pause: Duration,
}

impl<'a> SearchDriver<'a> {
    pub fn new(provider: &'a dyn SearchProvider, crawler: &'a DomainCrawler, config: &Config) -> Self {
        Self {
            provider,
            crawler,
            locations: config.targets.locations.clone(),
            industries: config.targets.industries.clone(),
            keywords: config.search.keywords.clone(),
            max_results_per_query: config.search.max_results_per_query,
            page_size: config.search.page_size.max(1),
            max_pages_per_domain: config.crawler.max_pages_per_domain,
            domain_pause: Duration::from_millis(config.crawler.domain_pause_ms),
        }
    }

    /// Every query the run will issue, in order (locations outer, industries inner)
    pub fn planned_queries(&self) -> Vec<(String, String, String)> {
        let mut planned = Vec::new();
        for location in &self.locations {
            for industry in &self.industries {
                let query = build_query(industry, location, &self.keywords);
                planned.push((location.clone(), industry.clone(), query));
            }
        }
        planned
    }

    /// Runs every planned query and crawls the domains it finds
    pub async fn run(&self) -> RunSummary {
        let mut summary = RunSummary::default();

        for (location, industry, query) in self.planned_queries() {
            tracing::info!("Query: {}", query);
            summary.queries_run += 1;

            let urls = self.collect_urls(&query).await;
            summary.results_seen += urls.len() as u32;

            let seeds = unique_domain_seeds(&urls);
            tracing::info!(
                "{} result(s), {} unique domain(s) for '{}'",
                urls.len(),
                seeds.len(),
                query
            );

            let (city, state) = split_location(&location);

            for (index, seed) in seeds.into_iter().enumerate() {
                if index > 0 && !self.domain_pause.is_zero() {
                    tokio::time::sleep(self.domain_pause).await;
                }

                let task = CrawlTask {
                    start_url: seed,
                    query: query.clone(),
                    city: city.clone(),
                    state: state.clone(),
                    industry: industry.clone(),
                    max_pages_per_domain: self.max_pages_per_domain,
                };

                match self.crawler.run_task(&task).await {
                    Some(report) => {
                        summary.domains_crawled += 1;
                        summary.pages_fetched += report.pages_fetched;
                        summary.prospects_inserted += report.prospects_inserted;
                    }
                    None => summary.domains_failed += 1,
                }
            }
        }

        tracing::info!(
            "Run complete: {} queries, {} domains crawled, {} new prospects",
            summary.queries_run,
            summary.domains_crawled,
            summary.prospects_inserted
        );

        summary
    }

    /// Pages through the provider until enough URLs are collected or a page is empty
    ///
    /// Every call asks for a full `page_size` so that page `offset` always
    /// starts at result `offset * page_size`; the last page is truncated
    /// locally. A provider error ends pagination for this query; whatever
    /// was collected so far is kept.
    async fn collect_urls(&self, query: &str) -> Vec<String> {
        let target = self.max_results_per_query as usize;
        let mut urls: Vec<String> = Vec::new();
        let mut offset: u32 = 0;

        while urls.len() < target {
            let page = match self.provider.search(query, self.page_size, offset).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!("Search failed for '{}' at offset {}: {}", query, offset, e);
                    break;
                }
            };

            if page.is_empty() {
                break;
            }

            urls.extend(page.into_iter().map(|r| r.url).take(target - urls.len()));
            offset += 1;
        }

        urls
    }
}

/// Joins industry, location and keywords into one query string
///
/// # Example
///
/// ```
/// use prospector::search::build_query;
///
/// let keywords = vec!["contact".to_string(), "email".to_string()];
/// assert_eq!(build_query("dentist", "Austin, TX", &keywords), "dentist Austin, TX contact email");
/// ```
pub fn build_query(industry: &str, location: &str, keywords: &[String]) -> String {
    std::iter::once(industry.trim())
        .chain(std::iter::once(location.trim()))
        .chain(keywords.iter().map(|k| k.trim()))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits "City, ST" at the last comma; without a comma the state is empty
pub fn split_location(location: &str) -> (String, String) {
    match location.rsplit_once(',') {
        Some((city, state)) => (city.trim().to_string(), state.trim().to_string()),
        None => (location.trim().to_string(), String::new()),
    }
}

/// Keeps the first URL per host, in result order
///
/// URLs that cannot be parsed as http(s) with a host are dropped.
fn unique_domain_seeds(urls: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut seeds = Vec::new();

    for raw in urls {
        let parsed = match normalize_url(raw) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Skipping search result {}: {}", raw, e);
                continue;
            }
        };

        if let Some(domain) = extract_domain(&parsed) {
            if seen.insert(domain) {
                seeds.push(raw.clone());
            }
        }
    }

    seeds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::crawler::RateLimiter;
    use crate::search::{SearchError, SearchResult};
    use crate::storage::SqliteStorage;
    use async_trait::async_trait;
    use reqwest::Client;
    use std::sync::{Arc, Mutex};

    /// Serves canned pages and records every call
    struct FakeProvider {
        pages: Vec<Result<Vec<&'static str>, ()>>,
        calls: Mutex<Vec<(String, u32, u32)>>,
    }

    impl FakeProvider {
        fn new(pages: Vec<Result<Vec<&'static str>, ()>>) -> Self {
            Self {
                pages,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, u32, u32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchProvider for FakeProvider {
        async fn search(
            &self,
            query: &str,
            count: u32,
            offset: u32,
        ) -> Result<Vec<SearchResult>, SearchError> {
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), count, offset));

            match self.pages.get(offset as usize) {
                Some(Ok(urls)) => Ok(urls
                    .iter()
                    .map(|u| SearchResult {
                        url: u.to_string(),
                        snippet: None,
                    })
                    .collect()),
                Some(Err(())) => Err(SearchError::Provider {
                    status: 500,
                    body: "down".to_string(),
                }),
                None => Ok(Vec::new()),
            }
        }
    }

    /// Serves a numbered result list, skipping `offset * count` results per call
    struct WindowedProvider {
        total: u32,
    }

    #[async_trait]
    impl SearchProvider for WindowedProvider {
        async fn search(
            &self,
            _query: &str,
            count: u32,
            offset: u32,
        ) -> Result<Vec<SearchResult>, SearchError> {
            let start = offset * count;
            let end = (start + count).min(self.total);
            Ok((start..end)
                .map(|i| SearchResult {
                    url: format!("https://site{}.test/", i),
                    snippet: None,
                })
                .collect())
        }
    }

    fn test_config(max_results: u32, page_size: u32) -> Config {
        parse_config(&format!(
            r#"
[crawler]
requests-per-minute = 60000
domain-pause-ms = 0
robots-timeout-secs = 1
page-timeout-secs = 1

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[search]
max-results-per-query = {}
page-size = {}
keywords = ["contact"]

[targets]
locations = ["Austin, TX"]
industries = ["dentist"]

[output]
database-path = ":memory:"
"#,
            max_results, page_size
        ))
        .unwrap()
    }

    fn crawler(config: &Config) -> DomainCrawler {
        DomainCrawler::new(
            Client::new(),
            Arc::new(RateLimiter::new(config.crawler.requests_per_minute)),
            Arc::new(SqliteStorage::new_in_memory().unwrap()),
            &config.crawler,
        )
    }

    #[test]
    fn test_build_query_skips_blank_parts() {
        assert_eq!(build_query("roofing", "Denver, CO", &[]), "roofing Denver, CO");
        assert_eq!(
            build_query(" roofing ", "Denver, CO", &["".to_string(), "email".to_string()]),
            "roofing Denver, CO email"
        );
    }

    #[test]
    fn test_split_location() {
        assert_eq!(
            split_location("Austin, TX"),
            ("Austin".to_string(), "TX".to_string())
        );
        assert_eq!(
            split_location("Washington, D.C., DC"),
            ("Washington, D.C.".to_string(), "DC".to_string())
        );
        assert_eq!(split_location("Remote"), ("Remote".to_string(), String::new()));
    }

    #[test]
    fn test_unique_domain_seeds() {
        let urls: Vec<String> = [
            "https://smile.test/",
            "https://smile.test/contact",
            "https://SMILE.test/about",
            "not a url",
            "https://teeth.test/home",
            "mailto:x@y.test",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        assert_eq!(
            unique_domain_seeds(&urls),
            vec!["https://smile.test/".to_string(), "https://teeth.test/home".to_string()]
        );
    }

    #[test]
    fn test_planned_queries_order() {
        let mut config = test_config(15, 20);
        config.targets.locations = vec!["Austin, TX".to_string(), "Denver, CO".to_string()];
        config.targets.industries = vec!["dentist".to_string(), "roofing".to_string()];
        let provider = FakeProvider::new(vec![]);
        let crawler = crawler(&config);
        let driver = SearchDriver::new(&provider, &crawler, &config);

        let queries: Vec<String> = driver.planned_queries().into_iter().map(|q| q.2).collect();
        assert_eq!(
            queries,
            vec![
                "dentist Austin, TX contact",
                "roofing Austin, TX contact",
                "dentist Denver, CO contact",
                "roofing Denver, CO contact",
            ]
        );
    }

    #[tokio::test]
    async fn test_pagination_stops_at_target() {
        let config = test_config(5, 2);
        let provider = FakeProvider::new(vec![
            Ok(vec!["https://a.test/", "https://b.test/"]),
            Ok(vec!["https://c.test/", "https://d.test/"]),
            Ok(vec!["https://e.test/", "https://f.test/"]),
            Ok(vec!["https://g.test/"]),
        ]);
        let crawler = crawler(&config);
        let driver = SearchDriver::new(&provider, &crawler, &config);

        let urls = driver.collect_urls("q").await;
        assert_eq!(urls.len(), 5);
        assert_eq!(urls[4], "https://e.test/");

        let calls = provider.calls();
        assert_eq!(
            calls.iter().map(|c| (c.1, c.2)).collect::<Vec<_>>(),
            vec![(2, 0), (2, 1), (2, 2)]
        );
    }

    #[tokio::test]
    async fn test_partial_last_page_does_not_repeat_results() {
        let config = test_config(15, 10);
        let provider = WindowedProvider { total: 100 };
        let crawler = crawler(&config);
        let driver = SearchDriver::new(&provider, &crawler, &config);

        let urls = driver.collect_urls("q").await;
        let unique: HashSet<&String> = urls.iter().collect();

        assert_eq!(urls.len(), 15);
        assert_eq!(unique.len(), 15);
        assert_eq!(urls[14], "https://site14.test/");
    }

    #[tokio::test]
    async fn test_pagination_stops_on_empty_page() {
        let config = test_config(15, 20);
        let provider = FakeProvider::new(vec![Ok(vec!["https://a.test/"]), Ok(vec![])]);
        let crawler = crawler(&config);
        let driver = SearchDriver::new(&provider, &crawler, &config);

        let urls = driver.collect_urls("q").await;
        assert_eq!(urls, vec!["https://a.test/".to_string()]);
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_provider_error_keeps_collected_urls() {
        let config = test_config(15, 1);
        let provider = FakeProvider::new(vec![Ok(vec!["https://a.test/"]), Err(())]);
        let crawler = crawler(&config);
        let driver = SearchDriver::new(&provider, &crawler, &config);

        let urls = driver.collect_urls("q").await;
        assert_eq!(urls, vec!["https://a.test/".to_string()]);
    }

    #[tokio::test]
    async fn test_bad_results_do_not_abort_run() {
        let config = test_config(15, 20);
        // The first result is skipped as unparseable, the second fails at fetch time
        let provider = FakeProvider::new(vec![Ok(vec!["::::", "http://127.0.0.1:9/"])]);
        let crawler = crawler(&config);
        let driver = SearchDriver::new(&provider, &crawler, &config);

        let summary = driver.run().await;
        assert_eq!(summary.queries_run, 1);
        assert_eq!(summary.results_seen, 2);
        assert_eq!(summary.domains_crawled, 1);
        assert_eq!(summary.pages_fetched, 0);
        assert_eq!(summary.prospects_inserted, 0);
    }
}
