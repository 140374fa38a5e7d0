//! Statistics generation from the prospect database
//!
//! This module provides functionality for extracting and displaying
//! prospect statistics from the storage layer.

use crate::storage::{ProspectStore, StorageResult};

/// Prospect statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProspectStatistics {
    /// Stored (page_url, email) rows
    pub total_prospects: u64,

    /// Distinct addresses across all pages
    pub unique_emails: u64,

    /// Distinct domains with at least one prospect
    pub domains: u64,

    pub suppressed: u64,

    /// Prospect rows per industry, largest first
    pub by_industry: Vec<(String, u64)>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `store` - The storage backend to query
///
/// # Returns
///
/// * `Ok(ProspectStatistics)` - Successfully loaded statistics
/// * `Err(StorageError)` - Failed to query statistics
pub async fn load_statistics(store: &dyn ProspectStore) -> StorageResult<ProspectStatistics> {
    Ok(ProspectStatistics {
        total_prospects: store.count_prospects().await?,
        unique_emails: store.count_unique_emails().await?,
        domains: store.count_domains().await?,
        suppressed: store.count_suppressed().await?,
        by_industry: store.prospects_by_industry().await?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &ProspectStatistics) {
    println!("=== Prospect Statistics ===\n");

    println!("Overview:");
    println!("  Prospect rows: {}", stats.total_prospects);
    println!("  Unique emails: {}", stats.unique_emails);
    println!("  Domains: {}", stats.domains);
    println!("  Suppressed: {}", stats.suppressed);
    println!();

    if !stats.by_industry.is_empty() {
        println!("Prospects by Industry:");
        for (industry, count) in &stats.by_industry {
            let percentage = if stats.total_prospects > 0 {
                (*count as f64 / stats.total_prospects as f64) * 100.0
            } else {
                0.0
            };
            println!("  {}: {} ({:.1}%)", industry, count, percentage);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{NewProspect, SqliteStorage};

    fn prospect(page: &str, email: &str, industry: &str) -> NewProspect {
        NewProspect {
            source_query: "q".to_string(),
            domain: "acme.test".to_string(),
            page_url: page.to_string(),
            email: email.to_string(),
            city: "Austin".to_string(),
            state: "TX".to_string(),
            industry: industry.to_string(),
        }
    }

    #[tokio::test]
    async fn test_load_statistics_empty() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        let stats = load_statistics(&storage).await.unwrap();
        assert_eq!(stats, ProspectStatistics::default());
    }

    #[tokio::test]
    async fn test_load_statistics_counts() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .insert_prospect(&prospect("https://acme.test/", "jane@acme.test", "dentist"))
            .await
            .unwrap();
        storage
            .insert_prospect(&prospect("https://acme.test/team", "jane@acme.test", "dentist"))
            .await
            .unwrap();
        storage
            .insert_prospect(&prospect("https://acme.test/team", "bob@acme.test", "roofing"))
            .await
            .unwrap();
        storage.suppress("bob@acme.test", "user_unsubscribed").await.unwrap();

        let stats = load_statistics(&storage).await.unwrap();
        assert_eq!(stats.total_prospects, 3);
        assert_eq!(stats.unique_emails, 2);
        assert_eq!(stats.domains, 1);
        assert_eq!(stats.suppressed, 1);
        assert_eq!(
            stats.by_industry,
            vec![("dentist".to_string(), 2), ("roofing".to_string(), 1)]
        );
    }
}
