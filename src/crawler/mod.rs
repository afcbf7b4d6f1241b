//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The fetch gateway and its HTTP implementation
//! - HTML attribute extraction
//! - The frontier queue and scraper workers
//! - Overall crawl coordination and page tree assembly

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod recursive;
mod tree;
mod worker;

pub use coordinator::{CrawlOptions, CrawlOutcome, Crawler};
pub use fetcher::{build_http_client, Fetch, FetchFailure, FetchMethod, Fetched, HttpFetcher};
pub use parser::{extract_attributes, Extracted};

use crate::config::Config;

/// Runs a complete crawl of the host behind `seed`
///
/// This is the main entry point for a one-off crawl. It will:
/// 1. Build the HTTP client from `config`
/// 2. Load robots.txt and probe the start address
/// 3. Run the worker pool until every reachable page is classified
///
/// # Example
///
/// ```no_run
/// use lame_sitemapper::config::Config;
/// use lame_sitemapper::crawler::crawl;
///
/// # async fn example() -> Result<(), lame_sitemapper::CrawlError> {
/// let outcome = crawl(&Config::default(), "https://www.example.com/").await?;
/// println!("found {} pages", outcome.page_count());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config, seed: &str) -> crate::Result<CrawlOutcome> {
    Crawler::from_config(config)?.run(seed).await
}
