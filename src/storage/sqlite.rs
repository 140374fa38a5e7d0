//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ProspectStore trait.
//! A single connection is shared by every caller; each call takes the lock
//! for one statement and releases it before returning.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ProspectStore, StorageError, StorageResult};
use crate::storage::{NewProspect, ProspectRecord, SendStatus};
use crate::ProspectorError;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// Missing parent directories are created, then the schema is applied.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(ProspectorError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, ProspectorError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self, ProspectorError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Database("connection lock poisoned".to_string()))
    }

    fn count(&self, sql: &str) -> StorageResult<u64> {
        let count: i64 = self.conn()?.query_row(sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[async_trait]
impl ProspectStore for SqliteStorage {
    // ===== Prospects =====

    async fn insert_prospect(&self, prospect: &NewProspect) -> StorageResult<bool> {
        let now = Utc::now().to_rfc3339();
        let inserted = self.conn()?.execute(
            "INSERT OR IGNORE INTO prospects
             (source_query, domain, page_url, email, city, state, industry, discovered_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                prospect.source_query,
                prospect.domain,
                prospect.page_url,
                prospect.email.to_lowercase(),
                prospect.city,
                prospect.state,
                prospect.industry,
                now
            ],
        )?;
        Ok(inserted > 0)
    }

    async fn prospects_for_domain(&self, domain: &str) -> StorageResult<Vec<ProspectRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, source_query, domain, page_url, email, city, state, industry, discovered_at
             FROM prospects WHERE domain = ?1 ORDER BY id",
        )?;

        let records = stmt
            .query_map(params![domain], |row| {
                Ok(ProspectRecord {
                    id: row.get(0)?,
                    source_query: row.get(1)?,
                    domain: row.get(2)?,
                    page_url: row.get(3)?,
                    email: row.get(4)?,
                    city: row.get(5)?,
                    state: row.get(6)?,
                    industry: row.get(7)?,
                    discovered_at: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    // ===== Suppression =====

    async fn suppress(&self, email: &str, reason: &str) -> StorageResult<bool> {
        let inserted = self.conn()?.execute(
            "INSERT OR IGNORE INTO suppression (email, reason) VALUES (?1, ?2)",
            params![email.trim().to_lowercase(), reason],
        )?;
        Ok(inserted > 0)
    }

    async fn is_suppressed(&self, email: &str) -> StorageResult<bool> {
        let count: i64 = self.conn()?.query_row(
            "SELECT COUNT(*) FROM suppression WHERE email = ?1",
            params![email.trim().to_lowercase()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // ===== Outreach =====

    async fn pending_outreach(&self, limit: u32) -> StorageResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT p.email
             FROM prospects p
             LEFT JOIN suppression s ON s.email = p.email
             WHERE s.email IS NULL
               AND NOT EXISTS (
                   SELECT 1 FROM sends se
                   WHERE se.prospect_email = p.email AND se.status = ?1
               )
             GROUP BY p.email
             ORDER BY MIN(p.id)
             LIMIT ?2",
        )?;

        let emails = stmt
            .query_map(params![SendStatus::Sent.to_db_string(), limit], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(emails)
    }

    async fn record_send(
        &self,
        email: &str,
        message_id: Option<&str>,
        status: SendStatus,
        error: Option<&str>,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn()?.execute(
            "INSERT INTO sends (prospect_email, message_id, status, error, sent_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                email.to_lowercase(),
                message_id,
                status.to_db_string(),
                error,
                now
            ],
        )?;
        Ok(())
    }

    // ===== Statistics =====

    async fn count_prospects(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM prospects")
    }

    async fn count_unique_emails(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(DISTINCT email) FROM prospects")
    }

    async fn count_domains(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(DISTINCT domain) FROM prospects")
    }

    async fn count_suppressed(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM suppression")
    }

    async fn prospects_by_industry(&self) -> StorageResult<Vec<(String, u64)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT COALESCE(industry, ''), COUNT(*) AS n
             FROM prospects
             GROUP BY industry
             ORDER BY n DESC, industry",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prospect(page: &str, email: &str) -> NewProspect {
        NewProspect {
            source_query: "dentist Austin, TX".to_string(),
            domain: "acme.test".to_string(),
            page_url: format!("https://acme.test{}", page),
            email: email.to_string(),
            city: "Austin".to_string(),
            state: "TX".to_string(),
            industry: "dentist".to_string(),
        }
    }

    #[test]
    fn test_create_in_memory() {
        assert!(SqliteStorage::new_in_memory().is_ok());
    }

    #[tokio::test]
    async fn test_insert_prospect_is_idempotent() {
        let storage = SqliteStorage::new_in_memory().unwrap();

        assert!(storage.insert_prospect(&prospect("/", "jane@acme.test")).await.unwrap());
        assert!(!storage.insert_prospect(&prospect("/", "jane@acme.test")).await.unwrap());
        assert_eq!(storage.count_prospects().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_email_lowercased_before_uniqueness() {
        let storage = SqliteStorage::new_in_memory().unwrap();

        assert!(storage.insert_prospect(&prospect("/", "Jane@Acme.TEST")).await.unwrap());
        assert!(!storage.insert_prospect(&prospect("/", "jane@acme.test")).await.unwrap());

        let rows = storage.prospects_for_domain("acme.test").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].email, "jane@acme.test");
        assert_eq!(rows[0].city.as_deref(), Some("Austin"));
    }

    #[tokio::test]
    async fn test_same_email_on_different_pages() {
        let storage = SqliteStorage::new_in_memory().unwrap();

        storage.insert_prospect(&prospect("/", "jane@acme.test")).await.unwrap();
        storage.insert_prospect(&prospect("/contact", "jane@acme.test")).await.unwrap();

        assert_eq!(storage.count_prospects().await.unwrap(), 2);
        assert_eq!(storage.count_unique_emails().await.unwrap(), 1);
        assert_eq!(storage.count_domains().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_suppression() {
        let storage = SqliteStorage::new_in_memory().unwrap();

        assert!(storage.suppress(" Jane@Acme.test ", "user_unsubscribed").await.unwrap());
        assert!(!storage.suppress("jane@acme.test", "user_unsubscribed").await.unwrap());
        assert!(storage.is_suppressed("JANE@acme.test").await.unwrap());
        assert!(!storage.is_suppressed("bob@acme.test").await.unwrap());
        assert_eq!(storage.count_suppressed().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_pending_outreach_skips_suppressed_and_sent() {
        let storage = SqliteStorage::new_in_memory().unwrap();

        storage.insert_prospect(&prospect("/", "jane@acme.test")).await.unwrap();
        storage.insert_prospect(&prospect("/team", "jane@acme.test")).await.unwrap();
        storage.insert_prospect(&prospect("/team", "bob@acme.test")).await.unwrap();
        storage.insert_prospect(&prospect("/team", "ops@acme.test")).await.unwrap();
        storage.insert_prospect(&prospect("/about", "ceo@acme.test")).await.unwrap();

        storage.suppress("bob@acme.test", "user_unsubscribed").await.unwrap();
        storage
            .record_send("ops@acme.test", Some("<id@mail>"), SendStatus::Sent, None)
            .await
            .unwrap();
        storage
            .record_send("ceo@acme.test", None, SendStatus::Error, Some("mailbox full"))
            .await
            .unwrap();

        let pending = storage.pending_outreach(50).await.unwrap();
        assert_eq!(pending, vec!["jane@acme.test".to_string(), "ceo@acme.test".to_string()]);

        let limited = storage.pending_outreach(1).await.unwrap();
        assert_eq!(limited, vec!["jane@acme.test".to_string()]);
    }

    #[tokio::test]
    async fn test_prospects_by_industry() {
        let storage = SqliteStorage::new_in_memory().unwrap();

        storage.insert_prospect(&prospect("/", "a@acme.test")).await.unwrap();
        storage.insert_prospect(&prospect("/", "b@acme.test")).await.unwrap();
        let mut roofer = prospect("/", "c@roof.test");
        roofer.industry = "roofing".to_string();
        storage.insert_prospect(&roofer).await.unwrap();

        let breakdown = storage.prospects_by_industry().await.unwrap();
        assert_eq!(
            breakdown,
            vec![("dentist".to_string(), 2), ("roofing".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("outreach.sqlite");

        {
            let storage = SqliteStorage::new(&path).unwrap();
            storage.insert_prospect(&prospect("/", "jane@acme.test")).await.unwrap();
        }

        let reopened = SqliteStorage::new(&path).unwrap();
        assert_eq!(reopened.count_prospects().await.unwrap(), 1);
    }
}
