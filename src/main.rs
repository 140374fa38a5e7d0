//! Prospector main entry point
//!
//! This is the command-line interface for the Prospector lead discovery crawler.

use clap::Parser;
use prospector::config::{load_config_with_hash, Config};
use prospector::crawler::{build_http_client, DomainCrawler, RateLimiter};
use prospector::search::{build_query, BraveSearch, SearchDriver};
use prospector::storage::{ProspectStore, SqliteStorage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Prospector: a polite lead discovery crawler
///
/// Prospector searches for businesses by industry and location, visits a
/// few contact-like pages on each result domain while respecting
/// robots.txt and a global request rate, and stores the business email
/// addresses it finds.
#[derive(Parser, Debug)]
#[command(name = "prospector")]
#[command(version)]
#[command(about = "A polite lead discovery crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the queries that would run without searching
    #[arg(long, conflicts_with_all = ["stats", "suppress"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "suppress"])]
    stats: bool,

    /// Add an email address to the suppression list and exit
    #[arg(long, value_name = "EMAIL", conflicts_with_all = ["dry_run", "stats"])]
    suppress: Option<String>,

    /// Reason recorded with --suppress
    #[arg(long, default_value = "user_unsubscribed")]
    reason: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // A missing .env file is fine; the key may come from the real environment
    dotenvy::dotenv().ok();

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config).await?;
    } else if let Some(email) = cli.suppress.as_deref() {
        handle_suppress(&config, email, &cli.reason).await?;
    } else {
        handle_crawl(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("prospector=info,warn"),
            1 => EnvFilter::new("prospector=debug,info"),
            2 => EnvFilter::new("prospector=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and lists the planned queries
fn handle_dry_run(config: &Config) {
    println!("=== Prospector Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Requests per minute: {}", config.crawler.requests_per_minute);
    println!("  Max pages per domain: {}", config.crawler.max_pages_per_domain);
    match config.crawler.max_page_attempts {
        Some(cap) => println!("  Max page attempts: {}", cap),
        None => println!("  Max page attempts: unlimited"),
    }
    println!("  Domain pause: {}ms", config.crawler.domain_pause_ms);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nSearch:");
    println!("  Endpoint: {}", config.search.endpoint);
    println!("  Results per query: {}", config.search.max_results_per_query);
    match config.search.api_key() {
        Ok(_) => println!("  API key: found in ${}", config.search.api_key_env),
        Err(_) => println!("  API key: ${} is NOT set", config.search.api_key_env),
    }

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    let total = config.targets.locations.len() * config.targets.industries.len();
    println!("\nQueries ({}):", total);
    for location in &config.targets.locations {
        for industry in &config.targets.industries {
            println!("  - {}", build_query(industry, location, &config.search.keywords));
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the database
async fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use prospector::output::{load_statistics, print_statistics};

    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage).await?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --suppress mode: adds one address to the suppression list
async fn handle_suppress(
    config: &Config,
    email: &str,
    reason: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

    if storage.suppress(email, reason).await? {
        println!("✓ Suppressed {} ({})", email.trim().to_lowercase(), reason);
    } else {
        println!("{} was already suppressed", email.trim().to_lowercase());
    }

    Ok(())
}

/// Handles the main search and crawl run
async fn handle_crawl(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let api_key = match config.search.api_key() {
        Ok(key) => key,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e.into());
        }
    };

    tracing::info!(
        "Targets: {} location(s) x {} industr(ies), {} request(s)/min",
        config.targets.locations.len(),
        config.targets.industries.len(),
        config.crawler.requests_per_minute
    );

    let client = build_http_client(&config.user_agent)?;
    let limiter = Arc::new(RateLimiter::new(config.crawler.requests_per_minute));
    let storage = Arc::new(SqliteStorage::new(Path::new(&config.output.database_path))?);

    let provider = BraveSearch::new(client.clone(), limiter.clone(), &config.search, api_key)?;
    let crawler = DomainCrawler::new(client, limiter, storage.clone(), &config.crawler);
    let driver = SearchDriver::new(&provider, &crawler, config);

    let summary = driver.run().await;

    println!(
        "✓ {} queries, {} results, {} domains crawled ({} failed), {} pages, {} new prospects",
        summary.queries_run,
        summary.results_seen,
        summary.domains_crawled,
        summary.domains_failed,
        summary.pages_fetched,
        summary.prospects_inserted
    );

    if let Ok(total) = storage.count_prospects().await {
        tracing::info!("Database now holds {} prospect row(s)", total);
    }

    Ok(())
}
