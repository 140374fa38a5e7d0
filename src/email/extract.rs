use super::EMAIL_REGEX;
use std::collections::BTreeSet;

/// Scans raw page content for email addresses
///
/// Matches are lowercased before de-duplication, so `Jane@Acme.test` and
/// `jane@acme.test` count once. The content is not parsed as HTML: addresses
/// inside `mailto:` attributes, scripts and comments are found as well.
///
/// # Arguments
///
/// * `content` - The raw page body
///
/// # Returns
///
/// The distinct addresses found, in sorted order
///
/// # Example
///
/// ```
/// use prospector::email::extract_emails;
///
/// let found = extract_emails("Contact us: jane@acme.test, intern@gmail.com, jane@acme.test");
/// assert_eq!(found.len(), 2);
/// assert!(found.contains("jane@acme.test"));
/// ```
pub fn extract_emails(content: &str) -> BTreeSet<String> {
    EMAIL_REGEX
        .find_iter(content)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}
