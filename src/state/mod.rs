//! State module for tracking crawl progress
//!
//! This module provides the identity and state types for directory items.
//!
//! # Components
//!
//! - `ItemKey` / `ItemType`: Identity of a unit or lecturer page
//! - `ItemBody`: What was extracted from an item's page
//! - `ItemState`: Tracks the state of individual items (frontier, fetching, parsed, ...)

mod item;
mod item_state;

// Re-export main types
pub use item::{ItemBody, ItemKey, ItemType};
pub use item_state::ItemState;
