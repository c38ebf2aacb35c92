//! Pattern-based extraction from directory pages
//!
//! This module handles scanning page text for:
//! - Links to sub-units and lecturers (`unit.asp?gguid=` / `lecturer.asp?gguid=`)
//! - The building and room fields of a unit or lecturer page
//!
//! The directory serves loosely structured legacy HTML, so extraction is done
//! with regular expressions pinned to the site's markup. Everything is behind
//! the [`Extractor`] trait so a tree-based parser can replace it.

use crate::location::compose_location;
use crate::state::{ItemBody, ItemKey, ItemType};
use crate::AtlasError;
use regex::Regex;
use scraper::Html;

const UNIT_LINK_PATTERN: &str =
    r#"<a href="unit\.asp\?gguid=(.*?)&amp;tguid=.*?"[^>]*?>(.*?)</a>"#;

const LECTURER_LINK_PATTERN: &str =
    r#"<a href="lecturer\.asp\?gguid=(.*?)&amp;tguid=.*?"[^>]*?>(.*?)</a>"#;

const UNIT_ROOM_PATTERN: &str = concat!(
    r#"<td class="default">Gebäude:</td><td class="default"><span>(.*?)</span></td>"#,
    r#".*?"#,
    r#"<td class="default">Raum:</td><td class="default"><span>(.*?)</span></td>"#,
);

const LECTURER_ROOM_PATTERN: &str =
    r#"<p class="address">Gebäude<img.*?>(.*?)</p><p class="address">Raum<img.*?>(.*?)</p>"#;

/// An item referenced by a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredItem {
    pub key: ItemKey,

    /// Text of the anchor that referenced the item
    pub name: String,
}

/// Everything extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Items referenced by the page, in document order
    pub subitems: Vec<DiscoveredItem>,

    pub body: ItemBody,
}

/// Extraction of sub-items and locations from page text
pub trait Extractor: Send + Sync {
    /// Finds all links of the given type on a page
    fn find_subitems(&self, page: &str, item_type: ItemType) -> Vec<DiscoveredItem>;

    /// Extracts the location of the item a page describes
    ///
    /// Pages without location fields yield an empty body.
    fn find_item_location(&self, page: &str, key: &ItemKey) -> ItemBody;

    /// Runs the extraction variant for the item's page type
    ///
    /// Unit pages yield sub-units, lecturers and a location; lecturer pages
    /// only yield a location.
    fn parse_page(&self, page: &str, key: &ItemKey) -> ParsedPage {
        let subitems = match key.item_type() {
            ItemType::Unit => {
                let mut subitems = self.find_subitems(page, ItemType::Unit);
                subitems.extend(self.find_subitems(page, ItemType::Lecturer));
                subitems
            }
            ItemType::Lecturer => Vec::new(),
        };

        ParsedPage {
            subitems,
            body: self.find_item_location(page, key),
        }
    }
}

/// Regex-based extractor for the directory's page markup
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    unit_link: Regex,
    lecturer_link: Regex,
    unit_room: Regex,
    lecturer_room: Regex,
}

impl PatternExtractor {
    /// Compiles the extraction patterns
    pub fn new() -> Result<Self, AtlasError> {
        Ok(Self {
            unit_link: Regex::new(UNIT_LINK_PATTERN)?,
            lecturer_link: Regex::new(LECTURER_LINK_PATTERN)?,
            unit_room: Regex::new(UNIT_ROOM_PATTERN)?,
            lecturer_room: Regex::new(LECTURER_ROOM_PATTERN)?,
        })
    }

    fn link_pattern(&self, item_type: ItemType) -> &Regex {
        match item_type {
            ItemType::Unit => &self.unit_link,
            ItemType::Lecturer => &self.lecturer_link,
        }
    }

    fn room_pattern(&self, item_type: ItemType) -> &Regex {
        match item_type {
            ItemType::Unit => &self.unit_room,
            ItemType::Lecturer => &self.lecturer_room,
        }
    }
}

impl Extractor for PatternExtractor {
    fn find_subitems(&self, page: &str, item_type: ItemType) -> Vec<DiscoveredItem> {
        self.link_pattern(item_type)
            .captures_iter(page)
            .filter_map(|caps| {
                let key_string = caps.get(1)?.as_str().trim();
                if key_string.is_empty() {
                    return None;
                }

                let name = caps.get(2).map(|m| clean_text(m.as_str())).unwrap_or_default();
                let name = if name.is_empty() {
                    key_string.to_string()
                } else {
                    name
                };

                Some(DiscoveredItem {
                    key: ItemKey::new(key_string, item_type),
                    name,
                })
            })
            .collect()
    }

    fn find_item_location(&self, page: &str, key: &ItemKey) -> ItemBody {
        let Some(caps) = self.room_pattern(key.item_type()).captures(page) else {
            tracing::trace!("No location fields on {}", key);
            return ItemBody::empty();
        };

        let building = caps.get(1).map(|m| field_text(m.as_str())).unwrap_or_default();
        let room = caps.get(2).map(|m| field_text(m.as_str())).unwrap_or_default();

        let location = compose_location(&building, &room);
        tracing::trace!("Location of {}: {:?}", key, location);
        ItemBody::new(location)
    }
}

/// Decodes a location field without touching its whitespace
///
/// Reference keys are matched exactly and some carry trailing spaces, so
/// the captured label is kept as served apart from markup and entities.
fn field_text(snippet: &str) -> String {
    if !snippet.contains(['<', '&']) {
        return snippet.to_string();
    }

    let fragment = Html::parse_fragment(snippet);
    fragment.root_element().text().collect()
}

/// Reduces an anchor's HTML to a display name
///
/// Inner markup is dropped, entities are decoded and runs of whitespace are
/// collapsed to single spaces.
fn clean_text(snippet: &str) -> String {
    if !snippet.contains(['<', '&']) {
        return snippet.split_whitespace().collect::<Vec<_>>().join(" ");
    }

    let fragment = Html::parse_fragment(snippet);
    let text: String = fragment.root_element().text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
