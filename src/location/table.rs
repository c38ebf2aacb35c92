//! Room reference table
//!
//! The directory site only knows building and room labels; coordinates and
//! floors come from this table. It is loaded once, from the embedded
//! `data/reference_rooms.toml` or from a user-supplied file of the same shape:
//!
//! ```toml
//! rooms = [
//!     { location = "Hauptbau : 2222", latitude = 50.7791, longitude = 6.0590, building = "Hauptbau", floor = 2, url = "" },
//! ]
//! ```

use crate::config::ReferenceConfig;
use crate::output::{Category, Place, EXTERN_BUILDING};
use crate::{ReferenceError, ReferenceResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Reference table shipped with the crate
const BUILTIN_TABLE: &str = include_str!("../../data/reference_rooms.toml");

/// Location data for one `"<building> : <room>"` key
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceEntry {
    pub latitude: f64,
    pub longitude: f64,

    /// Canonical building identifier ("Hauptbau", "E1", ..., "Extern")
    pub building: String,

    pub floor: i16,

    /// Room page URL; empty when unknown
    pub url: String,
}

impl ReferenceEntry {
    pub fn is_extern(&self) -> bool {
        self.building == EXTERN_BUILDING
    }
}

/// On-disk shape of a reference table file
#[derive(Debug, Deserialize)]
struct TableFile {
    #[serde(default)]
    rooms: Vec<RoomRecord>,
}

#[derive(Debug, Deserialize)]
struct RoomRecord {
    location: String,
    latitude: f64,
    longitude: f64,
    building: String,
    floor: i16,
    #[serde(default)]
    url: String,
}

impl RoomRecord {
    fn into_entry(self) -> ReferenceResult<(String, ReferenceEntry)> {
        let invalid = |message: String| ReferenceError::InvalidEntry {
            location: self.location.clone(),
            message,
        };

        if self.location.trim().is_empty() {
            return Err(invalid("location cannot be empty".to_string()));
        }
        if self.building.trim().is_empty() {
            return Err(invalid("building cannot be empty".to_string()));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(invalid(format!("latitude {} out of range", self.latitude)));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(invalid(format!("longitude {} out of range", self.longitude)));
        }

        Ok((
            self.location,
            ReferenceEntry {
                latitude: self.latitude,
                longitude: self.longitude,
                building: self.building,
                floor: self.floor,
                url: self.url,
            },
        ))
    }
}

/// Immutable map from location text to reference entry
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: HashMap<String, ReferenceEntry>,
    duplicates: Vec<String>,
}

impl ReferenceTable {
    /// Builds a table from `(location, entry)` pairs
    ///
    /// Duplicate locations are a data-authoring defect: each one is logged
    /// and recorded, and the later entry replaces the earlier one.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, ReferenceEntry)>,
    {
        let mut table = Self::default();

        for (location, entry) in entries {
            if table.entries.insert(location.clone(), entry).is_some() {
                tracing::warn!("Reference table contains duplicate key: \"{}\"", location);
                table.duplicates.push(location);
            }
        }

        table
    }

    /// Parses a table from TOML text
    pub fn from_toml_str(content: &str) -> ReferenceResult<Self> {
        let file: TableFile = toml::from_str(content)?;
        let entries = file
            .rooms
            .into_iter()
            .map(RoomRecord::into_entry)
            .collect::<ReferenceResult<Vec<_>>>()?;

        Ok(Self::from_entries(entries))
    }

    /// Loads the table embedded in the crate
    pub fn builtin() -> ReferenceResult<Self> {
        Self::from_toml_str(BUILTIN_TABLE)
    }

    /// Loads a table from a TOML file
    pub fn load(path: &Path) -> ReferenceResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Loads the configured table, falling back to the embedded one
    pub fn from_config(config: &ReferenceConfig) -> ReferenceResult<Self> {
        match &config.path {
            Some(path) => {
                tracing::info!("Loading reference table from {}", path);
                Self::load(Path::new(path))
            }
            None => Self::builtin(),
        }
    }

    /// Exact lookup of a location text
    pub fn get(&self, location_text: &str) -> Option<&ReferenceEntry> {
        self.entries.get(location_text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys that appeared more than once while building the table
    pub fn duplicate_keys(&self) -> &[String] {
        &self.duplicates
    }

    /// Every room inside the mapped complex as a place of category `Room`
    ///
    /// The location text doubles as the place name. Sorted by name so
    /// repeated runs store rooms in the same order.
    pub fn room_places(&self) -> Vec<Place> {
        let mut places: Vec<Place> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_extern())
            .map(|(location, entry)| Place {
                name: location.clone(),
                latitude: entry.latitude,
                longitude: entry.longitude,
                category: Category::Room,
                floor: entry.floor,
                url: Some(entry.url.clone()).filter(|url| !url.is_empty()),
                building: entry.building.clone(),
            })
            .collect();

        places.sort_by(|a, b| a.name.cmp(&b.name));
        places
    }
}
