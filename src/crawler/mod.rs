//! Crawler module for directory page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Frontier and visited-set tracking
//! - HTTP fetching with Latin-1 decoding
//! - Link and location extraction
//! - Overall crawl coordination and the completion gate

mod coordinator;
mod extractor;
mod fetcher;
mod frontier;

pub use coordinator::{Coordinator, CrawlOutcome, CrawlReport, StopReason};
pub use extractor::{DiscoveredItem, Extractor, ParsedPage, PatternExtractor};
pub use fetcher::{build_http_client, decode_latin1, fetch_page, item_url, FetchResult};
pub use frontier::Frontier;

use crate::config::Config;
use crate::output::Place;
use crate::AtlasError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Load the configured reference table
/// 2. Build the HTTP client and seed the frontier
/// 3. Visit units and lecturers until the frontier is exhausted or the cap is hit
/// 4. Resolve visited items into places
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(places)` - Crawl completed
/// * `Err(AtlasError)` - The crawler could not be set up
pub async fn crawl(config: &Config) -> Result<Vec<Place>, AtlasError> {
    let mut coordinator = Coordinator::from_config(config)?;
    Ok(coordinator.run().await)
}
