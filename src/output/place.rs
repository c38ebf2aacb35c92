//! Located entities produced by a crawl
//!
//! A place is anything a visitor can be routed to: a room from the reference
//! table, a chair (unit) or a person (lecturer).

use std::fmt;

/// Building identifier for locations outside the mapped complex
pub const EXTERN_BUILDING: &str = "Extern";

/// Kind of a located entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// A room taken from the reference table
    Room,

    /// An organizational unit
    Chair,

    /// A lecturer or staff member
    Person,
}

impl Category {
    /// Converts the category to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Room => "Room",
            Self::Chair => "Chair",
            Self::Person => "Person",
        }
    }

    /// Parses a category from its database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "Room" => Some(Self::Room),
            "Chair" => Some(Self::Chair),
            "Person" => Some(Self::Person),
            _ => None,
        }
    }

    /// Returns all categories
    pub fn all() -> [Self; 3] {
        [Self::Room, Self::Chair, Self::Person]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_string())
    }
}

/// A named entity with a resolved location
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// Display name; the natural key when persisted
    pub name: String,

    /// Latitude in decimal degrees
    pub latitude: f64,

    /// Longitude in decimal degrees
    pub longitude: f64,

    pub category: Category,

    /// Floor number: -1 is the basement, 0 the ground floor
    pub floor: i16,

    /// Reference URL (directory page or room page)
    pub url: Option<String>,

    /// Canonical building identifier, e.g. "Hauptbau" or "E3"
    pub building: String,
}

impl Place {
    /// Returns true if the place lies outside the mapped complex
    pub fn is_extern(&self) -> bool {
        self.building == EXTERN_BUILDING
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for category in Category::all() {
            let parsed = Category::from_db_string(category.to_db_string());
            assert_eq!(Some(category), parsed);
        }
        assert_eq!(Category::from_db_string("room"), None);
    }

    #[test]
    fn test_is_extern() {
        let mut place = Place {
            name: "Seminar room".to_string(),
            latitude: 50.7791,
            longitude: 6.0590,
            category: Category::Room,
            floor: 2,
            url: None,
            building: "Hauptbau".to_string(),
        };
        assert!(!place.is_extern());

        place.building = EXTERN_BUILDING.to_string();
        assert!(place.is_extern());
    }
}
