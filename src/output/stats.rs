//! Crawl reports and store statistics
//!
//! This module provides functionality for displaying the report of a
//! finished crawl and for extracting statistics from the place store.

use crate::crawler::CrawlReport;
use crate::output::Category;
use crate::storage::{PlaceStore, RunRecord};
use crate::AtlasError;
use std::collections::HashMap;

/// Place store statistics summary
#[derive(Debug, Clone)]
pub struct StoreStatistics {
    /// Total number of stored places
    pub total_places: u64,

    /// Count of places by category
    pub places_by_category: HashMap<Category, u64>,

    /// The most recent crawl run, if any
    pub latest_run: Option<RunRecord>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(StoreStatistics)` - Successfully loaded statistics
/// * `Err(AtlasError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn PlaceStore) -> Result<StoreStatistics, AtlasError> {
    Ok(StoreStatistics {
        total_places: storage.count_places()?,
        places_by_category: storage.count_by_category()?,
        latest_run: storage.get_latest_run()?,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Place Store Statistics ===\n");

    println!("Overview:");
    println!("  Total places: {}", stats.total_places);
    println!();

    println!("Places by Category:");
    for category in Category::all() {
        let count = stats.places_by_category.get(&category).copied().unwrap_or(0);
        let percentage = if stats.total_places > 0 {
            (count as f64 / stats.total_places as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", category, count, percentage);
    }
    println!();

    match &stats.latest_run {
        Some(run) => {
            println!("Latest Run:");
            println!("  ID: {}", run.id);
            println!("  Status: {}", run.status.to_db_string());
            println!("  Started: {}", run.started_at);
            if let Some(finished) = &run.finished_at {
                println!("  Finished: {}", finished);
            }
            println!("  Items visited: {}", run.items_visited);
            println!("  Places located: {}", run.places_located);
            println!("  Config hash: {}", run.config_hash);
        }
        None => println!("No crawl runs recorded."),
    }
}

/// Share of visited items that ended up as a place, in percent
pub fn located_rate(report: &CrawlReport) -> f64 {
    if report.visited > 0 {
        (report.places_emitted as f64 / report.visited as f64) * 100.0
    } else {
        0.0
    }
}

/// Prints the report of a finished crawl to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Items:");
    println!("  Visited: {}", report.visited);
    println!("  Parsed: {}", report.parsed);
    println!("  Fetch failures: {}", report.fetch_failures);
    println!();

    println!("Locations:");
    println!("  Without location: {}", report.without_location);
    println!("  Not in reference table: {}", report.unresolved);
    println!("  External buildings: {}", report.extern_dropped);
    println!(
        "  Places located: {} ({:.1}% of visited)",
        report.places_emitted,
        located_rate(report)
    );
    println!();

    println!(
        "Stopped after {:.1}s: {}",
        report.elapsed.as_secs_f64(),
        report.stop_reason
    );
}
