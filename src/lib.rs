//! Campus-Atlas: a locator for people and chairs on a university campus
//!
//! This crate crawls a university directory website (organizational units and
//! lecturer pages), extracts the room each entry is located in, and resolves
//! those rooms against a reference table of known buildings to produce a flat
//! list of places.

pub mod config;
pub mod crawler;
pub mod location;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Campus-Atlas operations
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Reference table error: {0}")]
    Reference(#[from] ReferenceError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while loading the room reference table
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("Failed to read reference table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse reference table: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid reference entry '{location}': {message}")]
    InvalidEntry { location: String, message: String },
}

/// Result type alias for Campus-Atlas operations
pub type Result<T> = std::result::Result<T, AtlasError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for reference table operations
pub type ReferenceResult<T> = std::result::Result<T, ReferenceError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlOutcome, CrawlReport};
pub use location::{normalize_building, LocationResolver, ReferenceTable};
pub use output::{Category, Place};
pub use state::{ItemBody, ItemKey, ItemState, ItemType};
