//! Contact-signal matching for discovered links

/// Substrings that mark a URL as likely to list people or contact details
pub const CONTACT_SIGNALS: &[&str] = &[
    "contact",
    "about",
    "team",
    "leadership",
    "management",
    "staff",
];

/// Checks whether a URL contains at least one contact-signal substring
///
/// The comparison is case-insensitive and runs over the whole URL string,
/// so a match in the query string counts as well.
///
/// # Examples
///
/// ```
/// use prospector::url::has_contact_signal;
///
/// assert!(has_contact_signal("https://acme.test/About-Us"));
/// assert!(!has_contact_signal("https://acme.test/pricing"));
/// ```
pub fn has_contact_signal(url: &str) -> bool {
    let lowered = url.to_lowercase();
    CONTACT_SIGNALS.iter().any(|signal| lowered.contains(signal))
}
