//! Domain crawler - the bounded per-domain crawl loop
//!
//! One [`DomainCrawler`] is shared by the whole run. Each call to
//! [`DomainCrawler::crawl`] explores a single seed domain:
//! - robots.txt is fetched once from the seed's origin
//! - pages are taken from a FIFO frontier and fetched one at a time
//! - emails on each page are filtered and stored as prospects
//! - only same-host links carrying a contact signal are followed

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::crawler::frontier::{Frontier, VisitedSet};
use crate::crawler::limiter::RateLimiter;
use crate::crawler::parser::extract_links;
use crate::email::{classify, extract_emails, EmailVerdict};
use crate::robots::fetch_policy;
use crate::storage::{NewProspect, ProspectStore};
use crate::url::{extract_domain, has_contact_signal, normalize_url, same_host};
use crate::{ProspectorError, UrlError};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// One unit of crawl work: a seed URL plus the query context it came from
#[derive(Debug, Clone)]
pub struct CrawlTask {
    pub start_url: String,
    pub query: String,
    pub city: String,
    pub state: String,
    pub industry: String,
    pub max_pages_per_domain: u32,
}

/// Counters for one finished domain crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainCrawlReport {
    /// Seed host, lowercased
    pub domain: String,
    /// Successful fetches (the budgeted quantity)
    pub pages_fetched: u32,
    /// Fetch attempts that failed; these do not use up the page budget
    pub fetch_failures: u32,
    /// URLs skipped because robots.txt disallows their path
    pub robots_skipped: u32,
    /// Addresses extracted, counted once per page
    pub emails_found: u32,
    pub prospects_inserted: u32,
    /// Accepted addresses already stored for that page
    pub duplicates: u32,
    pub rejected_invalid: u32,
    pub rejected_freemail: u32,
    pub links_enqueued: u32,
    /// URLs still pending when the crawl stopped
    pub frontier_remaining: usize,
    /// Every URL requested, in order (robots.txt excluded)
    pub fetched_urls: Vec<String>,
}

/// Crawls seed domains one at a time
pub struct DomainCrawler {
    client: Client,
    limiter: Arc<RateLimiter>,
    store: Arc<dyn ProspectStore>,
    robots_timeout: Duration,
    page_timeout: Duration,
    max_page_attempts: Option<u32>,
}

impl DomainCrawler {
    /// Creates a crawler
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used for robots.txt and page fetches
    /// * `limiter` - The process-wide rate limiter
    /// * `store` - Where accepted prospects are written
    /// * `config` - Timeouts and the optional attempt cap
    pub fn new(
        client: Client,
        limiter: Arc<RateLimiter>,
        store: Arc<dyn ProspectStore>,
        config: &CrawlerConfig,
    ) -> Self {
        Self {
            client,
            limiter,
            store,
            robots_timeout: Duration::from_secs(config.robots_timeout_secs),
            page_timeout: Duration::from_secs(config.page_timeout_secs),
            max_page_attempts: config.max_page_attempts,
        }
    }

    /// Runs a task and absorbs any task-level failure
    ///
    /// A bad seed is logged and reported as `None`; it never stops the
    /// caller from moving on to the next domain.
    pub async fn run_task(&self, task: &CrawlTask) -> Option<DomainCrawlReport> {
        match self.crawl(task).await {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::warn!("Crawl of {} abandoned: {}", task.start_url, e);
                None
            }
        }
    }

    /// Crawls one seed domain
    ///
    /// # Returns
    ///
    /// * `Ok(DomainCrawlReport)` - The crawl ran to completion
    /// * `Err(ProspectorError)` - The seed URL is unusable
    pub async fn crawl(&self, task: &CrawlTask) -> Result<DomainCrawlReport, ProspectorError> {
        let seed = normalize_url(&task.start_url)?;
        let domain = extract_domain(&seed).ok_or(UrlError::MissingDomain)?;

        tracing::info!(
            "Crawling {} (budget {} page(s))",
            domain,
            task.max_pages_per_domain
        );

        let policy = fetch_policy(&self.client, &self.limiter, &seed, self.robots_timeout).await;

        let mut report = DomainCrawlReport {
            domain: domain.clone(),
            ..DomainCrawlReport::default()
        };
        let mut frontier = Frontier::with_seed(seed.clone());
        let mut visited = VisitedSet::default();
        let mut attempts: u32 = 0;

        while report.pages_fetched < task.max_pages_per_domain {
            if self.max_page_attempts.is_some_and(|cap| attempts >= cap) {
                tracing::debug!("Attempt cap reached for {}", domain);
                break;
            }

            let Some(url) = frontier.pop() else {
                break;
            };

            if !visited.insert(&url) {
                continue;
            }

            if policy.is_disallowed(url.path()) {
                tracing::debug!("URL {} disallowed by robots.txt", url);
                report.robots_skipped += 1;
                continue;
            }

            attempts += 1;
            report.fetched_urls.push(url.to_string());
            let (final_url, body) =
                match fetch_url(&self.client, &self.limiter, &url, self.page_timeout).await {
                    FetchResult::Success {
                        final_url, body, ..
                    } => (final_url, body),
                    failed => {
                        tracing::debug!(
                            "Skipping {}: {}",
                            url,
                            failed.failure_reason().unwrap_or_default()
                        );
                        report.fetch_failures += 1;
                        continue;
                    }
                };

            report.pages_fetched += 1;

            // Relative links resolve against where redirects ended up
            let link_base = match Url::parse(&final_url) {
                Ok(resolved) => resolved,
                Err(_) => url.clone(),
            };
            if link_base != url {
                tracing::debug!("{} redirected to {}", url, link_base);
            }

            self.harvest_emails(task, &domain, &url, &body, &mut report)
                .await;
            self.enqueue_links(&seed, &link_base, &body, &visited, &mut frontier, &mut report);
        }

        report.frontier_remaining = frontier.len();

        tracing::info!(
            "Finished {}: {} page(s), {} new prospect(s), {} freemail rejected, {} link(s) queued",
            domain,
            report.pages_fetched,
            report.prospects_inserted,
            report.rejected_freemail,
            report.links_enqueued
        );

        Ok(report)
    }

    /// Extracts, filters and stores the emails found on one page
    async fn harvest_emails(
        &self,
        task: &CrawlTask,
        domain: &str,
        page_url: &Url,
        body: &str,
        report: &mut DomainCrawlReport,
    ) {
        for email in extract_emails(body) {
            report.emails_found += 1;

            match classify(&email) {
                EmailVerdict::Invalid => {
                    report.rejected_invalid += 1;
                    continue;
                }
                EmailVerdict::Freemail => {
                    tracing::debug!("Rejected freemail address {} on {}", email, page_url);
                    report.rejected_freemail += 1;
                    continue;
                }
                EmailVerdict::Accepted => {}
            }

            let prospect = NewProspect {
                source_query: task.query.clone(),
                domain: domain.to_string(),
                page_url: page_url.to_string(),
                email: email.clone(),
                city: task.city.clone(),
                state: task.state.clone(),
                industry: task.industry.clone(),
            };

            match self.store.insert_prospect(&prospect).await {
                Ok(true) => {
                    tracing::info!("Found {} on {}", email, page_url);
                    report.prospects_inserted += 1;
                }
                Ok(false) => report.duplicates += 1,
                Err(e) => tracing::warn!("Could not store {} from {}: {}", email, page_url, e),
            }
        }
    }

    /// Queues same-host links that look like contact or people pages
    ///
    /// robots.txt is not consulted here; disallowed links may be queued and
    /// are skipped when popped.
    fn enqueue_links(
        &self,
        seed: &Url,
        page_url: &Url,
        body: &str,
        visited: &VisitedSet,
        frontier: &mut Frontier,
        report: &mut DomainCrawlReport,
    ) {
        for link in extract_links(body, page_url) {
            if !same_host(seed, &link) || visited.contains(&link) {
                continue;
            }
            if !has_contact_signal(link.as_str()) {
                continue;
            }
            if frontier.push(link) {
                report.links_enqueued += 1;
            }
        }
    }
}
