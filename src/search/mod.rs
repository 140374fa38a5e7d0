//! Search module: finding seed websites
//!
//! A [`SearchProvider`] turns a query into result URLs. The
//! [`SearchDriver`] walks every configured location/industry pair, pages
//! through the provider and hands each new domain to the crawler.

mod brave;
mod driver;

pub use brave::BraveSearch;
pub use driver::{build_query, split_location, RunSummary, SearchDriver};

use async_trait::async_trait;
use thiserror::Error;

/// One search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub url: String,
    pub snippet: Option<String>,
}

/// Errors returned by search providers
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Search provider returned HTTP {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Invalid search endpoint: {0}")]
    Endpoint(String),
}

/// A web search backend
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Fetches one page of results
    ///
    /// `offset` is the zero-based page index. An empty list means the
    /// provider has nothing more for this query.
    async fn search(
        &self,
        query: &str,
        count: u32,
        offset: u32,
    ) -> Result<Vec<SearchResult>, SearchError>;
}
