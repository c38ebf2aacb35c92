//! Storage traits and error types
//!
//! This module defines the trait interface for place storage backends and
//! associated error types.

use crate::output::{Category, Place};
use crate::storage::RunRecord;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Invalid category in database: {0}")]
    InvalidCategory(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for place storage backends
///
/// The crawler itself never touches storage; the binary hands the places
/// a crawl produced to a `PlaceStore`.
pub trait PlaceStore {
    // ===== Run Management =====

    /// Creates a new crawl run
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration the run uses
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Marks a run as completed with its counters and a finish timestamp
    fn complete_run(&mut self, run_id: i64, visited: u64, located: u64) -> StorageResult<()>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    // ===== Place Management =====

    /// Inserts a place or replaces the stored place with the same name
    fn upsert_place(&mut self, place: &Place) -> StorageResult<()>;

    /// Upserts many places in a single transaction
    ///
    /// # Returns
    ///
    /// The number of places written
    fn upsert_places(&mut self, places: &[Place]) -> StorageResult<usize>;

    /// Gets a place by name
    fn get_place(&self, name: &str) -> StorageResult<Option<Place>>;

    /// Loads all places ordered by building, floor and name
    fn load_places(&self) -> StorageResult<Vec<Place>>;

    fn count_places(&self) -> StorageResult<u64>;

    /// Counts places per category
    fn count_by_category(&self) -> StorageResult<HashMap<Category, u64>>;

    /// Deletes all places
    fn clear_places(&mut self) -> StorageResult<()>;
}
