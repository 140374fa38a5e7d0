//! HTTP fetcher implementation
//!
//! This module handles all page and robots.txt requests for the crawler:
//! - Building the HTTP client with a descriptive user agent
//! - Rate-limited GET requests with a per-call timeout
//! - Classifying failures so callers can skip without aborting

use crate::config::UserAgentConfig;
use crate::crawler::limiter::RateLimiter;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, unreadable body, ...)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Short description of a failed fetch, for logging
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            FetchResult::Success { .. } => None,
            FetchResult::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            FetchResult::NetworkError { error } => Some(error.clone()),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Timeouts are set per request, since robots.txt and pages use different
/// limits. Redirects follow reqwest's default policy.
///
/// # Example
///
/// ```no_run
/// use prospector::config::UserAgentConfig;
/// use prospector::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "Prospector".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/bot".to_string(),
///     contact_email: "bot@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL through the rate limiter
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with readable body | `Success` |
/// | Any other status | `HttpError` |
/// | Timeout | `NetworkError("Request timeout")` |
/// | Connection failure | `NetworkError("Connection refused")` |
/// | Body read failure | `NetworkError` |
///
/// The whole request, including reading the body, counts as one operation
/// of the limiter.
pub async fn fetch_url(
    client: &Client,
    limiter: &RateLimiter,
    url: &Url,
    timeout: Duration,
) -> FetchResult {
    limiter
        .schedule(|| send_get(client, url.clone(), timeout))
        .await
}

async fn send_get(client: &Client, url: Url, timeout: Duration) -> FetchResult {
    let response = match client.get(url).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => classify_error(&e),
    }
}

fn classify_error(e: &reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&create_test_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_user_agent_format() {
        assert_eq!(
            create_test_config().header_value(),
            "TestCrawler/1.0 (+https://example.com/about; admin@example.com)"
        );
    }

    #[tokio::test]
    async fn test_fetch_success_and_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_http_client(&create_test_config()).unwrap();
        let limiter = RateLimiter::with_spacing(Duration::from_millis(1));
        let base = Url::parse(&server.uri()).unwrap();

        let ok = fetch_url(&client, &limiter, &base.join("/ok").unwrap(), Duration::from_secs(5)).await;
        match ok {
            FetchResult::Success { body, status_code, .. } => {
                assert_eq!(status_code, 200);
                assert_eq!(body, "hello");
            }
            other => panic!("expected success, got {:?}", other),
        }

        let gone =
            fetch_url(&client, &limiter, &base.join("/gone").unwrap(), Duration::from_secs(5)).await;
        assert!(matches!(gone, FetchResult::HttpError { status_code: 404 }));
        assert_eq!(gone.failure_reason().as_deref(), Some("HTTP 404"));
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = build_http_client(&create_test_config()).unwrap();
        let limiter = RateLimiter::with_spacing(Duration::from_millis(1));
        let url = Url::parse(&format!("{}/slow", server.uri())).unwrap();

        let result = fetch_url(&client, &limiter, &url, Duration::from_millis(50)).await;
        assert!(matches!(result, FetchResult::NetworkError { .. }));
    }
}
