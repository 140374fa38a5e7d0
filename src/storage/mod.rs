//! Storage module for persisting prospects
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Insert-or-ignore persistence of harvested prospects
//! - The suppression list and send log used by outreach
//! - Aggregate counts for the `--stats` report

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{ProspectStore, StorageError, StorageResult};

/// A prospect about to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProspect {
    pub source_query: String,
    pub domain: String,
    pub page_url: String,
    pub email: String,
    pub city: String,
    pub state: String,
    pub industry: String,
}

/// A stored prospect row
#[derive(Debug, Clone)]
pub struct ProspectRecord {
    pub id: i64,
    pub source_query: String,
    pub domain: String,
    pub page_url: String,
    pub email: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub industry: Option<String>,
    pub discovered_at: String,
}

/// Outcome of one outreach attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
    Sent,
    Error,
}

impl SendStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Error => "error",
        }
    }
}
