//! Output module for places, reports and summaries
//!
//! This module handles:
//! - The place types produced by a crawl
//! - Printing crawl reports and store statistics
//! - Generating a markdown directory of located places

mod markdown;
mod place;
pub mod stats;

pub use markdown::{format_markdown_directory, generate_markdown_directory};
pub use place::{Category, Place, EXTERN_BUILDING};
pub use stats::{load_statistics, print_report, print_statistics, StoreStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
