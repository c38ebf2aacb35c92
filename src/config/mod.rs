//! Configuration module for Campus-Atlas
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use campus_atlas::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("campus-atlas.toml")).unwrap();
//! println!("Crawler will visit at most {} items", config.crawler.max_items_to_visit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, ReferenceConfig, SourceConfig, UserAgentConfig,
    DEFAULT_LECTURER_URL_PREFIX, DEFAULT_ROOT_KEY, DEFAULT_UNIT_URL_PREFIX,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, DEFAULT_CONFIG_HASH};
pub use validation::validate;
