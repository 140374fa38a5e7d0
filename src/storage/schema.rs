//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Prospector database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Harvested business emails, one row per (page, email)
CREATE TABLE IF NOT EXISTS prospects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_query TEXT NOT NULL,
    domain TEXT NOT NULL,
    page_url TEXT NOT NULL,
    email TEXT NOT NULL,
    city TEXT,
    state TEXT,
    industry TEXT,
    discovered_at TEXT NOT NULL,
    UNIQUE(page_url, email)
);

CREATE INDEX IF NOT EXISTS idx_prospects_email ON prospects(email);
CREATE INDEX IF NOT EXISTS idx_prospects_domain ON prospects(domain);

-- Addresses that must never be emailed
CREATE TABLE IF NOT EXISTS suppression (
    email TEXT PRIMARY KEY,
    reason TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

-- Outreach attempts recorded by the sender
CREATE TABLE IF NOT EXISTS sends (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    prospect_email TEXT NOT NULL,
    message_id TEXT,
    status TEXT NOT NULL,
    error TEXT,
    sent_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sends_email ON sends(prospect_email);
"#;

/// Initializes the database schema
///
/// Every statement is `IF NOT EXISTS`, so this runs on each open.
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
