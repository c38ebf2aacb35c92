/// Identity of crawlable directory entries
///
/// The directory site addresses every entry by an opaque `gguid` parameter;
/// the same identifier may in principle appear for both page types, so the
/// type is part of the identity.
use std::fmt;

/// The two kinds of pages served by the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    /// An organizational unit (chair, institute, department)
    Unit,

    /// A staff member or lecturer
    Lecturer,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Lecturer => "lecturer",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a crawlable entity
///
/// Two keys are equal iff both the key string and the item type match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey {
    key_string: String,
    item_type: ItemType,
}

impl ItemKey {
    pub fn new(key_string: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            key_string: key_string.into(),
            item_type,
        }
    }

    /// Shorthand for a unit key
    pub fn unit(key_string: impl Into<String>) -> Self {
        Self::new(key_string, ItemType::Unit)
    }

    /// Shorthand for a lecturer key
    pub fn lecturer(key_string: impl Into<String>) -> Self {
        Self::new(key_string, ItemType::Lecturer)
    }

    /// The opaque identifier taken from the site's `gguid` parameter
    pub fn key_string(&self) -> &str {
        &self.key_string
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.item_type, self.key_string)
    }
}

/// Result of processing one item
///
/// Created once, when extraction of the item's page completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemBody {
    location_text: Option<String>,
}

impl ItemBody {
    pub fn new(location_text: Option<String>) -> Self {
        Self { location_text }
    }

    /// A body without location information
    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalized `"<building> : <room>"` text, if the page had one
    pub fn location_text(&self) -> Option<&str> {
        self.location_text.as_deref()
    }
}
