//! Location handling module for Campus-Atlas
//!
//! This module provides building-name normalization, the room reference
//! table, and exact resolution of location texts to coordinates.

mod building;
mod resolver;
mod table;

// Re-export main types and functions
pub use building::normalize_building;
pub use resolver::{LocationResolver, Resolution};
pub use table::{ReferenceEntry, ReferenceTable};

/// Separator between building and room in a location text
pub const LOCATION_SEPARATOR: &str = " : ";

/// Joins a raw building label and a room label into a location text
///
/// A non-empty building label is normalized and followed by the separator;
/// a non-empty room is appended. Returns `None` when both are empty.
///
/// # Examples
///
/// ```
/// use campus_atlas::location::compose_location;
///
/// assert_eq!(compose_location("2350", "2222"), Some("Hauptbau : 2222".to_string()));
/// assert_eq!(compose_location("", ""), None);
/// ```
pub fn compose_location(raw_building: &str, room: &str) -> Option<String> {
    let mut location = String::new();

    if !raw_building.is_empty() {
        location.push_str(&normalize_building(raw_building));
        location.push_str(LOCATION_SEPARATOR);
    }
    location.push_str(room);

    Some(location).filter(|l| !l.is_empty())
}
