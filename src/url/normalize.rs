use crate::UrlError;
use url::Url;

/// Normalizes a URL for frontier bookkeeping
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything that is not HTTP or HTTPS
/// 3. Reject URLs without a host
/// 4. Remove the fragment (everything after #)
///
/// Host case is already folded by the `url` crate. Paths, query strings and
/// `www.` prefixes are kept as-is, since `/Contact` and `/contact` may be
/// different pages.
///
/// # Examples
///
/// ```
/// use prospector::url::normalize_url;
///
/// let url = normalize_url("https://ACME.test/contact#form").unwrap();
/// assert_eq!(url.as_str(), "https://acme.test/contact");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    Ok(url)
}
