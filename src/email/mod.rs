//! Email harvesting
//!
//! Extraction scans raw page content for email-shaped tokens. Filtering is a
//! separate step the crawler applies before anything reaches storage:
//! addresses must be syntactically valid and must not use a freemail domain.

mod extract;
mod filter;

pub use extract::extract_emails;
pub use filter::{classify, is_business_email, is_valid_email, EmailVerdict, FREEMAIL_DOMAINS};

use once_cell::sync::Lazy;
use regex::Regex;

/// Local part, `@`, domain labels, and a TLD of two or more letters
const EMAIL_PATTERN: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[A-Za-z]{2,}";

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"));

static EMAIL_EXACT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{}$", EMAIL_PATTERN)).expect("email pattern is valid"));
