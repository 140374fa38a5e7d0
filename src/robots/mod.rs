//! Robots.txt handling module
//!
//! This module fetches and parses robots.txt once per domain crawl. Any
//! failure to obtain the file results in a permissive policy.

mod parser;

pub use parser::RobotsPolicy;

use crate::crawler::{fetch_url, FetchResult, RateLimiter};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Fetches robots.txt for the origin of `site_url`
///
/// The request goes through the rate limiter like any page fetch.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `limiter` - The process-wide rate limiter
/// * `site_url` - Any URL on the site; only its origin is used
/// * `timeout` - Request timeout
///
/// # Returns
///
/// The parsed policy, or [`RobotsPolicy::allow_all`] on network errors,
/// timeouts or non-2xx responses
pub async fn fetch_policy(
    client: &Client,
    limiter: &RateLimiter,
    site_url: &Url,
    timeout: Duration,
) -> RobotsPolicy {
    let robots_url = match site_url.join("/robots.txt") {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Cannot build robots.txt URL for {}: {}", site_url, e);
            return RobotsPolicy::allow_all();
        }
    };

    match fetch_url(client, limiter, &robots_url, timeout).await {
        FetchResult::Success { body, .. } => {
            let policy = RobotsPolicy::parse(&body);
            tracing::debug!(
                "Loaded {} disallow rule(s) from {}",
                policy.rules().len(),
                robots_url
            );
            policy
        }
        failed => {
            tracing::debug!(
                "No usable robots.txt at {} ({}), allowing all",
                robots_url,
                failed.failure_reason().unwrap_or_default()
            );
            RobotsPolicy::allow_all()
        }
    }
}

/// Checks a path against a policy
pub fn is_disallowed(policy: &RobotsPolicy, path: &str) -> bool {
    policy.is_disallowed(path)
}
