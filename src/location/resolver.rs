use crate::location::table::{ReferenceEntry, ReferenceTable};
use std::sync::Arc;

/// Concrete location of a resolved location text
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub latitude: f64,
    pub longitude: f64,
    pub building: String,
    pub floor: i16,
    pub url: String,
}

impl Resolution {
    pub fn is_extern(&self) -> bool {
        self.building == crate::output::EXTERN_BUILDING
    }
}

impl From<&ReferenceEntry> for Resolution {
    fn from(entry: &ReferenceEntry) -> Self {
        Self {
            latitude: entry.latitude,
            longitude: entry.longitude,
            building: entry.building.clone(),
            floor: entry.floor,
            url: entry.url.clone(),
        }
    }
}

/// Resolves extracted location texts against a reference table
///
/// Lookups are exact; a text that is not a key of the table does not resolve.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    table: Arc<ReferenceTable>,
}

impl LocationResolver {
    pub fn new(table: ReferenceTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    pub fn resolve(&self, location_text: &str) -> Option<Resolution> {
        self.table.get(location_text).map(Resolution::from)
    }

    pub fn table(&self) -> &ReferenceTable {
        &self.table
    }
}
