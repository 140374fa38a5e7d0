use super::EMAIL_EXACT_REGEX;

/// Consumer mailbox providers; addresses on these domains are not business contacts
pub const FREEMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "icloud.com",
    "aol.com",
    "proton.me",
    "protonmail.com",
    "live.com",
    "msn.com",
    "me.com",
];

/// Outcome of running an extracted address through both filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailVerdict {
    /// Valid and on a non-freemail domain
    Accepted,
    /// Failed the whole-string syntax check
    Invalid,
    /// Valid, but on a freemail domain
    Freemail,
}

/// Checks that the whole string is a single email-shaped token
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_EXACT_REGEX.is_match(email)
}

/// Heuristic: the address's domain is not a known freemail provider
///
/// Only exact domain matches are rejected, so `gmail.com.example.test` passes.
pub fn is_business_email(email: &str) -> bool {
    let domain = email
        .rsplit_once('@')
        .map(|(_, domain)| domain.to_lowercase())
        .unwrap_or_default();
    !FREEMAIL_DOMAINS.contains(&domain.as_str())
}

/// Applies the validity check, then the business heuristic
pub fn classify(email: &str) -> EmailVerdict {
    if !is_valid_email(email) {
        EmailVerdict::Invalid
    } else if !is_business_email(email) {
        EmailVerdict::Freemail
    } else {
        EmailVerdict::Accepted
    }
}
