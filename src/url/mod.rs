//! URL handling module for Prospector
//!
//! This module provides URL normalization, host extraction and the
//! contact-signal filter that decides which links are worth following.

mod domain;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, same_host};
pub use matcher::{has_contact_signal, CONTACT_SIGNALS};
pub use normalize::normalize_url;
