//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{NewProspect, ProspectRecord, SendStatus};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for prospect storage backends
///
/// Writes are single statements; there are no multi-statement transactions,
/// so an interrupted run keeps every row it already inserted.
#[async_trait]
pub trait ProspectStore: Send + Sync {
    // ===== Prospects =====

    /// Inserts a prospect unless the same (page_url, email) pair exists
    ///
    /// The email is stored lowercased.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - A new row was written
    /// * `Ok(false)` - The pair was already stored
    async fn insert_prospect(&self, prospect: &NewProspect) -> StorageResult<bool>;

    /// Lists stored prospects for one domain, oldest first
    async fn prospects_for_domain(&self, domain: &str) -> StorageResult<Vec<ProspectRecord>>;

    // ===== Suppression =====

    /// Adds an email to the suppression list; returns false if already present
    async fn suppress(&self, email: &str, reason: &str) -> StorageResult<bool>;

    async fn is_suppressed(&self, email: &str) -> StorageResult<bool>;

    // ===== Outreach =====

    /// Distinct prospect emails that are not suppressed and were never sent successfully
    async fn pending_outreach(&self, limit: u32) -> StorageResult<Vec<String>>;

    /// Records one send attempt
    async fn record_send(
        &self,
        email: &str,
        message_id: Option<&str>,
        status: SendStatus,
        error: Option<&str>,
    ) -> StorageResult<()>;

    // ===== Statistics =====

    async fn count_prospects(&self) -> StorageResult<u64>;

    /// Distinct email addresses across all pages
    async fn count_unique_emails(&self) -> StorageResult<u64>;

    async fn count_domains(&self) -> StorageResult<u64>;

    async fn count_suppressed(&self) -> StorageResult<u64>;

    /// Prospect rows per industry, largest first
    async fn prospects_by_industry(&self) -> StorageResult<Vec<(String, u64)>>;
}
