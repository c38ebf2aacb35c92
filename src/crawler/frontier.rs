//! Frontier and visited-set tracking
//!
//! This module handles:
//! - The set of discovered items waiting to be visited
//! - The set of items already visited
//! - Display names recorded when items are discovered
//! - The cap on the total number of visits

use crate::state::ItemKey;
use std::collections::{HashMap, HashSet};

/// Tracks which items are queued and which were visited
///
/// The two sets are always disjoint, and an item that was visited is never
/// queued again. At most `max_items_to_visit` items are ever moved into the
/// visited set.
#[derive(Debug, Clone)]
pub struct Frontier {
    /// Discovered but not yet visited
    frontier: HashSet<ItemKey>,

    /// Items handed to the fetcher
    visited: HashSet<ItemKey>,

    /// Display names from the anchors the items were discovered by
    names: HashMap<ItemKey, String>,

    max_items_to_visit: usize,
}

impl Frontier {
    /// Creates a frontier seeded with the root item
    ///
    /// # Arguments
    ///
    /// * `root` - The item the crawl starts from
    /// * `root_name` - Display name of the root item
    /// * `max_items_to_visit` - Upper bound on visited items
    pub fn new(root: ItemKey, root_name: impl Into<String>, max_items_to_visit: usize) -> Self {
        let mut names = HashMap::new();
        names.insert(root.clone(), root_name.into());

        Self {
            frontier: HashSet::from([root]),
            visited: HashSet::new(),
            names,
            max_items_to_visit,
        }
    }

    /// Removes and returns an arbitrary queued item
    ///
    /// No ordering between items is guaranteed.
    pub fn next(&mut self) -> Option<ItemKey> {
        let key = self.frontier.iter().next().cloned()?;
        self.frontier.remove(&key);
        Some(key)
    }

    /// Moves an item into the visited set
    pub fn mark_visited(&mut self, key: ItemKey) {
        self.frontier.remove(&key);
        self.visited.insert(key);
    }

    /// Queues an item unless it is already queued or visited
    ///
    /// The display name is only recorded when the item is queued, so the
    /// first anchor an item is discovered by names it.
    ///
    /// # Returns
    ///
    /// `true` if the item was newly queued
    pub fn enqueue_if_new(&mut self, key: ItemKey, name: impl Into<String>) -> bool {
        if self.contains(&key) {
            return false;
        }

        self.names.insert(key.clone(), name.into());
        self.frontier.insert(key);
        true
    }

    /// Returns true when the cap is reached or nothing is left to visit
    pub fn should_stop(&self) -> bool {
        self.cap_reached() || self.frontier.is_empty()
    }

    /// Returns true when the visited set has reached the cap
    pub fn cap_reached(&self) -> bool {
        self.visited.len() >= self.max_items_to_visit
    }

    /// Returns true if the item is queued or visited
    pub fn contains(&self, key: &ItemKey) -> bool {
        self.visited.contains(key) || self.frontier.contains(key)
    }

    pub fn is_visited(&self, key: &ItemKey) -> bool {
        self.visited.contains(key)
    }

    pub fn is_queued(&self, key: &ItemKey) -> bool {
        self.frontier.contains(key)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn max_items_to_visit(&self) -> usize {
        self.max_items_to_visit
    }

    /// Display name recorded for an item
    pub fn name_of(&self, key: &ItemKey) -> Option<&str> {
        self.names.get(key).map(String::as_str)
    }

    /// Iterates over all visited items
    pub fn visited(&self) -> impl Iterator<Item = &ItemKey> {
        self.visited.iter()
    }
}
