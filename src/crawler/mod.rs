//! Crawler module for per-domain email harvesting
//!
//! This module contains the core crawling logic, including:
//! - The process-wide rate limiter every HTTP call passes through
//! - HTTP fetching with per-call timeouts
//! - HTML anchor extraction
//! - The per-domain frontier and visited set
//! - The bounded domain crawl loop

mod coordinator;
mod fetcher;
mod frontier;
mod limiter;
mod parser;

pub use coordinator::{CrawlTask, DomainCrawlReport, DomainCrawler};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use frontier::{Frontier, VisitedSet};
pub use limiter::{spacing_for_rpm, RateLimiter};
pub use parser::extract_links;
